use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite and inside the valid ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn short(&self) -> String {
        format!("{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// A known office site, loaded from the `offices` list of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeSite {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub location: GeoPoint,
    #[serde(default = "default_radius")]
    pub radius_meters: u32,
}

fn default_radius() -> u32 {
    100
}

/// Result of one geolocation refresh. A reading without `point` is the
/// unusable reading produced when the platform query fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationReading {
    pub point: Option<GeoPoint>,
    pub address: String,
    pub verified: bool,
    pub captured_at: NaiveDateTime,
}

impl LocationReading {
    pub fn unavailable(captured_at: NaiveDateTime) -> Self {
        Self {
            point: None,
            address: String::new(),
            verified: false,
            captured_at,
        }
    }

    pub fn has_point(&self) -> bool {
        self.point.is_some_and(|p| p.is_valid())
    }
}
