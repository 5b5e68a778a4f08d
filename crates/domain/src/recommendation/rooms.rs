//! Per-room aggregation of a device snapshot.

use std::collections::HashMap;

use crate::device::Device;

/// On/off flags of each room's devices, rooms in first-appearance order.
///
/// Only rooms that hold at least one device are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomStatus {
    rooms: Vec<(String, Vec<bool>)>,
    index: HashMap<String, usize>,
}

impl RoomStatus {
    /// Group the snapshot by exact room label.
    ///
    /// Devices with a blank room label are skipped.
    #[must_use]
    pub fn aggregate(snapshot: &[Device]) -> Self {
        let mut status = Self::default();
        for device in snapshot {
            if device.room.trim().is_empty() {
                continue;
            }
            let slot = match status.index.get(&device.room) {
                Some(&slot) => slot,
                None => {
                    status.rooms.push((device.room.clone(), Vec::new()));
                    let slot = status.rooms.len() - 1;
                    status.index.insert(device.room.clone(), slot);
                    slot
                }
            };
            status.rooms[slot].1.push(device.is_on());
        }
        status
    }

    /// Whether every device in `room` is off. False for unknown rooms.
    #[must_use]
    pub fn all_off(&self, room: &str) -> bool {
        self.flags(room)
            .is_some_and(|flags| !flags.is_empty() && flags.iter().all(|on| !on))
    }

    /// The on/off flags of `room`, in snapshot order.
    fn flags(&self, room: &str) -> Option<&[bool]> {
        self.index
            .get(room)
            .map(|&slot| self.rooms[slot].1.as_slice())
    }

    /// Room labels in aggregation order.
    pub fn rooms(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(|(room, _)| room.as_str())
    }

    /// First room, in aggregation order, whose devices are all off.
    #[must_use]
    pub fn first_all_off(&self) -> Option<&str> {
        self.rooms().find(|room| self.all_off(room))
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
