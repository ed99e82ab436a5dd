use crate::model::Coordinate;
use crate::prelude::{GeolocationError, LocationProvider};
use crate::telemetry::LogManager;
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves the coordinate a session is centred on.
pub struct GeolocationResolver {
    provider: Arc<dyn LocationProvider>,
    fallback: Coordinate,
    logger: LogManager,
}

impl GeolocationResolver {
    pub fn new(provider: Arc<dyn LocationProvider>, fallback: Coordinate) -> Self {
        Self {
            provider,
            fallback,
            logger: LogManager::new("geolocation"),
        }
    }

    /// Device position when available, the fallback otherwise. Never fails.
    pub async fn resolve(&self) -> Coordinate {
        match self.provider.locate().await {
            Ok(coordinate) => {
                self.logger.trace(&format!(
                    "device position {:.4}, {:.4}",
                    coordinate.lat, coordinate.lon
                ));
                coordinate
            }
            Err(err) => {
                self.logger
                    .trace(&format!("{err}; using fallback coordinate"));
                self.fallback
            }
        }
    }
}

/// A position known up front, such as one given on the command line.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<Coordinate, GeolocationError> {
        Ok(self.0)
    }
}

/// Provider for hosts without positioning hardware.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationProvider for NoLocation {
    async fn locate(&self) -> Result<Coordinate, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Provider that always fails with the given reason.
#[derive(Debug, Clone, Copy)]
pub struct FailingLocation(pub GeolocationError);

#[async_trait]
impl LocationProvider for FailingLocation {
    async fn locate(&self) -> Result<Coordinate, GeolocationError> {
        Err(self.0)
    }
}
