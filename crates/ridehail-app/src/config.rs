//! Application configuration.

use ridehail_core::{NavigationConfig, RideConfig};

/// Configuration for an [`App`](crate::App).
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Ride simulation timing and driver start point.
    pub ride: RideConfig,
    /// Navigation parameter policy.
    pub navigation: NavigationConfig,
}
