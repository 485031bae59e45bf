//! Geographic and catalog value types.
//!
//! Coordinates are plain WGS84 degrees. There is no geocoding: an address is
//! a display label, and the booking flow places pickup and dropoff at fixed
//! mock coordinates.

use serde::{Deserialize, Serialize};

/// Latitude of the mock pickup point.
pub const MOCK_PICKUP_LATITUDE: f64 = 40.7128;

/// Longitude of the mock pickup point.
pub const MOCK_PICKUP_LONGITUDE: f64 = -74.006;

/// Latitude of the mock dropoff point.
pub const MOCK_DROPOFF_LATITUDE: f64 = 40.7328;

/// Longitude of the mock dropoff point.
pub const MOCK_DROPOFF_LONGITUDE: f64 = -73.986;

/// A point on the map with a display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Human readable address label.
    pub address: String,
}

impl Location {
    /// Create a location.
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self { latitude, longitude, address: address.into() }
    }

    /// Pickup point for `address` at the mock pickup coordinates.
    pub fn mock_pickup(address: impl Into<String>) -> Self {
        Self::new(MOCK_PICKUP_LATITUDE, MOCK_PICKUP_LONGITUDE, address)
    }

    /// Dropoff point for `address` at the mock dropoff coordinates.
    pub fn mock_dropoff(address: impl Into<String>) -> Self {
        Self::new(MOCK_DROPOFF_LATITUDE, MOCK_DROPOFF_LONGITUDE, address)
    }

    /// Move by `delta` degrees on both axes.
    pub fn shift(&mut self, delta: f64) {
        self.latitude += delta;
        self.longitude += delta;
    }

    /// Both coordinates are finite and the address is not blank.
    pub fn is_complete(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && !self.address.trim().is_empty()
    }
}

/// A bookable ride tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOption {
    /// Stable tier identifier (`"economy"`, `"xl"`, ...).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Fare in dollars.
    pub price: f64,
    /// Estimated trip duration in minutes.
    pub estimated_minutes: u32,
    /// Maximum passengers.
    pub capacity: u8,
}

impl RideOption {
    /// Create a ride option.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        estimated_minutes: u32,
        capacity: u8,
    ) -> Self {
        Self { id: id.into(), name: name.into(), price, estimated_minutes, capacity }
    }

    /// Fare formatted with two decimals and a dollar sign.
    pub fn price_label(&self) -> String {
        format!("${:.2}", self.price)
    }
}

/// Vehicle driven by the assigned driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Make and model.
    pub model: String,
    /// Paint color.
    pub color: String,
    /// License plate.
    pub license_plate: String,
}

/// The driver assigned to a ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverProfile {
    /// Driver identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Average rating out of five.
    pub rating: f32,
    /// Vehicle details.
    pub vehicle: Vehicle,
    /// Minutes until pickup, as shown while the driver is arriving.
    pub eta_minutes: u32,
}

impl DriverProfile {
    /// The single mock driver every ride is assigned to.
    pub fn mock() -> Self {
        Self {
            id: "driver-1".to_string(),
            name: "Jason Miller".to_string(),
            rating: 4.9,
            vehicle: Vehicle {
                model: "Honda Civic".to_string(),
                color: "Blue".to_string(),
                license_plate: "ABC 123".to_string(),
            },
            eta_minutes: 3,
        }
    }
}
