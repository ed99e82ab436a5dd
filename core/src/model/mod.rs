pub mod intersection;
pub mod metrics;
pub mod view;

pub use intersection::{CongestionLevel, Coordinate, Intersection};
pub use metrics::{
    AlertRecord, ConfidenceReply, EnvironmentalImpact, OptimizationReply, PredictionReply,
    TrafficSample,
};
pub use view::{Slot, SlotValue, ViewModel};
