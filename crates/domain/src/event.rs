//! Device events: in-process notifications that a user's fleet changed.
//!
//! Events are published by the device service after every mutation and
//! consumed by the suggestion hub, which re-evaluates that user's devices.

use serde::{Deserialize, Serialize};

use crate::id::{DeviceId, UserId};
use crate::time::Timestamp;

/// What happened to the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceEventKind {
    Added,
    Toggled,
    Updated,
    Deleted,
    Cleared,
}

/// A change to one user's device set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    pub kind: DeviceEventKind,
    pub user_id: UserId,
    pub device_id: Option<DeviceId>,
    pub timestamp: Timestamp,
}

impl DeviceEvent {
    #[must_use]
    pub fn new(
        kind: DeviceEventKind,
        user_id: UserId,
        device_id: Option<DeviceId>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind,
            user_id,
            device_id,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    #[test]
    fn should_serialize_kind_in_snake_case() {
        let event = DeviceEvent::new(DeviceEventKind::Toggled, UserId::new(), None, now());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "toggled");
        assert!(json["device_id"].is_null());
    }
}
