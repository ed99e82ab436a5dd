use trafficcore::model::{Coordinate, Intersection};

const JUNCTIONS: [&str; 12] = [
    "Kimihurura Roundabout",
    "Sonatubes",
    "Kacyiru",
    "Gishushu",
    "Nyabugogo",
    "Remera",
    "Kisimenti",
    "Rwandex",
    "Kicukiro Centre",
    "Giporoso",
    "Chez Lando",
    "Poids Lourds",
];

const METRES_PER_DEGREE: f64 = 111_320.0;

pub fn intersection_id(index: usize) -> String {
    format!("INT-{:03}", index + 1)
}

/// Lays `count` intersections on a spiral inside `radius` metres of `center`.
/// Ids depend only on position in the list, so they are the same for every centre.
pub fn layout(center: Coordinate, radius: u32, count: usize) -> Vec<Intersection> {
    let radius_deg = f64::from(radius.max(1)) / METRES_PER_DEGREE;
    (0..count)
        .map(|index| {
            let fraction = (index as f64 + 1.0) / (count as f64 + 1.0);
            let angle = index as f64 * 2.399_963; // golden angle
            let distance = radius_deg * fraction.sqrt();
            let name = match JUNCTIONS.get(index) {
                Some(name) => name.to_string(),
                None => format!("Junction {}", index + 1),
            };
            Intersection::new(
                intersection_id(index),
                name,
                center.lat + distance * angle.sin(),
                center.lon + distance * angle.cos(),
            )
        })
        .collect()
}
