//! Activation tracking: since when has each device been continuously on.

use std::collections::HashMap;

use chrono::TimeDelta;

use crate::device::Device;
use crate::id::DeviceId;
use crate::time::Timestamp;

/// Maps each device that was last observed on to the instant it turned on.
///
/// A device id is present iff its last observed status was on. The instant
/// is never refreshed while the device stays on, so a device that goes off
/// and on again between two observations restarts its timer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationTracker {
    since: HashMap<DeviceId, Timestamp>,
}

impl ActivationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a new snapshot into the record.
    ///
    /// Devices that are on and unknown get `now`; devices that are on and
    /// already tracked keep their instant; devices that are off or missing
    /// from the snapshot are dropped.
    pub fn update(&mut self, snapshot: &[Device], now: Timestamp) {
        let mut next = HashMap::with_capacity(self.since.len());
        for device in snapshot.iter().filter(|d| d.is_on()) {
            let since = self.since.get(&device.id).copied().unwrap_or(now);
            next.entry(device.id).or_insert(since);
        }
        self.since = next;
    }

    /// Instant the device turned on, if it is currently tracked as on.
    #[must_use]
    pub fn activated_at(&self, id: DeviceId) -> Option<Timestamp> {
        self.since.get(&id).copied()
    }

    /// How long the device has been on at `now`; zero when not tracked.
    #[must_use]
    pub fn elapsed_on(&self, id: DeviceId, now: Timestamp) -> TimeDelta {
        self.activated_at(id)
            .map_or(TimeDelta::zero(), |since| (now - since).max(TimeDelta::zero()))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.since.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.since.is_empty()
    }
}
