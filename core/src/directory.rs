use crate::model::{Coordinate, Intersection};
use crate::prelude::{FetchResult, TelemetryBackend};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;

/// Intersections known to the session. Ids are fixed once installed; only traffic levels move.
#[derive(Debug, Default)]
pub struct IntersectionDirectory {
    intersections: Vec<Intersection>,
    seeded: bool,
}

impl IntersectionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot fetch of the intersections around `center`.
    pub async fn seed(
        backend: &dyn TelemetryBackend,
        center: Coordinate,
        radius: u32,
    ) -> FetchResult<Vec<Intersection>> {
        backend.intersections(center, radius).await
    }

    /// Installs the seed result. Later calls are ignored so the id set stays stable.
    /// Duplicate ids keep their first occurrence. Returns the number of intersections held.
    pub fn install(&mut self, intersections: Vec<Intersection>) -> usize {
        if self.seeded {
            return self.intersections.len();
        }
        let mut seen = HashSet::new();
        self.intersections = intersections
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .map(|mut item| {
                item.traffic_level = item.traffic_level.clamp(0.0, 1.0);
                item
            })
            .collect();
        self.seeded = true;
        self.intersections.len()
    }

    /// Resamples every traffic level independently into `[0, 1]`.
    /// A directory that has not been seeded yet is left untouched.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        for intersection in &mut self.intersections {
            intersection.traffic_level = rng.gen_range(0.0..=1.0);
        }
        self.intersections.len()
    }

    pub fn snapshot(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn contains(&self, id: &str) -> bool {
        self.intersections.iter().any(|item| item.id == id)
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }
}

/// Random source driving the live traffic-level feed.
pub struct SimulationFeed {
    rng: StdRng,
}

impl SimulationFeed {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn tick(&mut self, directory: &mut IntersectionDirectory) -> usize {
        directory.tick(&mut self.rng)
    }
}
