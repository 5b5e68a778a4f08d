//! Fleet-wide statistics for the admin overview.

use serde::{Deserialize, Serialize};

use crate::device::Device;

/// Aggregate counts across all users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetStats {
    pub user_count: usize,
    pub device_count: usize,
    pub active_devices: usize,
    pub average_devices_per_user: f64,
}

impl FleetStats {
    /// Compute statistics from the user count and the full device list.
    ///
    /// The average is `0.0` when there are no users.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(user_count: usize, devices: &[Device]) -> Self {
        let device_count = devices.len();
        let active_devices = devices.iter().filter(|d| d.is_on()).count();
        let average_devices_per_user = if user_count == 0 {
            0.0
        } else {
            device_count as f64 / user_count as f64
        };
        Self {
            user_count,
            device_count,
            active_devices,
            average_devices_per_user,
        }
    }
}
