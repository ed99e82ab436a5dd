//! Client-side state synchronization for the traffic-signal monitoring network.
//!
//! The modules reconcile device location, the intersection directory and its simulated live
//! feed, and five independent per-intersection data streams into a single view model that the
//! presentation layer renders from. Any single stream may fail without affecting the others.

pub mod aggregator;
pub mod config;
pub mod directory;
pub mod geolocation;
pub mod model;
pub mod optimizer;
pub mod prelude;
pub mod selection;
pub mod session;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use config::SessionConfig;
pub use prelude::{Endpoint, FetchError, FetchResult, LocationProvider, TelemetryBackend};
pub use session::{Session, SessionHandle};
