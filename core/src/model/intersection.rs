use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A monitored junction. Only `traffic_level` changes after the directory is seeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intersection {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub traffic_level: f64,
}

impl Intersection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
            traffic_level: 0.0,
        }
    }

    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    pub fn congestion(&self) -> CongestionLevel {
        CongestionLevel::from_level(self.traffic_level)
    }
}

/// Coarse band of a traffic level, used for map marker colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Moderate,
    High,
}

impl CongestionLevel {
    pub fn from_level(level: f64) -> Self {
        if level < 0.3 {
            CongestionLevel::Low
        } else if level < 0.7 {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CongestionLevel::Low => "low",
            CongestionLevel::Moderate => "moderate",
            CongestionLevel::High => "high",
        }
    }
}
