//! Ordered ride lifecycle stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a ride.
///
/// Ordered: the derived `Ord` follows the index, so `status < Arrived` reads
/// as "the driver has not arrived yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RideStatus {
    /// Booking accepted.
    Confirmed,
    /// A driver took the ride.
    DriverAssigned,
    /// Driver is approaching the pickup point.
    Arriving,
    /// Driver is waiting at the pickup point.
    Arrived,
    /// Rider is on board.
    InProgress,
    /// Rider dropped off.
    Completed,
}

impl RideStatus {
    /// Every stage in lifecycle order.
    pub const ALL: [RideStatus; 6] = [
        RideStatus::Confirmed,
        RideStatus::DriverAssigned,
        RideStatus::Arriving,
        RideStatus::Arrived,
        RideStatus::InProgress,
        RideStatus::Completed,
    ];

    /// Position in the lifecycle, 0 through 5.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Stage at `index`. `None` past [`RideStatus::Completed`].
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// Following stage. `None` at [`RideStatus::Completed`].
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Stable kebab-case identifier.
    pub fn id(self) -> &'static str {
        match self {
            RideStatus::Confirmed => "confirmed",
            RideStatus::DriverAssigned => "driver-assigned",
            RideStatus::Arriving => "arriving",
            RideStatus::Arrived => "arrived",
            RideStatus::InProgress => "in-progress",
            RideStatus::Completed => "completed",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            RideStatus::Confirmed => "Ride Confirmed",
            RideStatus::DriverAssigned => "Driver Assigned",
            RideStatus::Arriving => "Driver Arriving",
            RideStatus::Arrived => "Driver Arrived",
            RideStatus::InProgress => "Ride in Progress",
            RideStatus::Completed => "Ride Completed",
        }
    }

    /// Driver is still on the way to the pickup point.
    ///
    /// Cancellation is only possible and the driver marker only shown while
    /// this holds.
    pub fn driver_en_route(self) -> bool {
        self < RideStatus::Arrived
    }

    /// Last stage.
    pub fn is_final(self) -> bool {
        self == RideStatus::Completed
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_order() {
        for (i, status) in RideStatus::ALL.iter().enumerate() {
            assert_eq!(usize::from(status.index()), i);
            assert_eq!(RideStatus::from_index(status.index()), Some(*status));
        }
        assert_eq!(RideStatus::from_index(6), None);
    }

    #[test]
    fn next_stops_at_completed() {
        assert_eq!(RideStatus::Arriving.next(), Some(RideStatus::Arrived));
        assert_eq!(RideStatus::Completed.next(), None);
    }

    #[test]
    fn en_route_until_arrival() {
        assert!(RideStatus::Arriving.driver_en_route());
        assert!(!RideStatus::Arrived.driver_en_route());
        assert!(!RideStatus::Completed.driver_en_route());
    }

    #[test]
    fn completed_label() {
        assert_eq!(RideStatus::Completed.to_string(), "Ride Completed");
    }
}
