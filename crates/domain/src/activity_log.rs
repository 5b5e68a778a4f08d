//! Activity log: an append-only record of what a user did to their devices.

use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::id::{ActivityLogId, DeviceId, UserId};
use crate::time::Timestamp;

/// A single user action, e.g. `Toggled device "Desk Lamp"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: ActivityLogId,
    pub user_id: UserId,
    pub device_id: Option<DeviceId>,
    pub action: String,
    pub timestamp: Timestamp,
}

impl ActivityLog {
    /// Create a new log entry with a fresh id.
    #[must_use]
    pub fn new(
        user_id: UserId,
        device_id: Option<DeviceId>,
        action: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: ActivityLogId::new(),
            user_id,
            device_id,
            action: action.into(),
            timestamp,
        }
    }

    #[must_use]
    pub fn device_added(device: &Device, timestamp: Timestamp) -> Self {
        Self::new(
            device.user_id,
            Some(device.id),
            format!("Added device \"{}\"", device.name),
            timestamp,
        )
    }

    #[must_use]
    pub fn device_toggled(device: &Device, timestamp: Timestamp) -> Self {
        Self::new(
            device.user_id,
            Some(device.id),
            format!("Toggled device \"{}\"", device.name),
            timestamp,
        )
    }

    #[must_use]
    pub fn device_updated(device: &Device, timestamp: Timestamp) -> Self {
        Self::new(
            device.user_id,
            Some(device.id),
            format!("Updated device \"{}\"", device.name),
            timestamp,
        )
    }

    #[must_use]
    pub fn device_deleted(device: &Device, timestamp: Timestamp) -> Self {
        Self::new(
            device.user_id,
            Some(device.id),
            format!("Deleted device \"{}\"", device.name),
            timestamp,
        )
    }

    #[must_use]
    pub fn devices_cleared(user_id: UserId, count: usize, timestamp: Timestamp) -> Self {
        Self::new(user_id, None, format!("Removed all {count} devices"), timestamp)
    }
}
