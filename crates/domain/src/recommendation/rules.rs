//! The prioritised rule set.

use std::ops::RangeInclusive;

use chrono::{DateTime, TimeDelta, TimeZone, Timelike, Utc};

use super::{ActivationTracker, RoomStatus, Suggestion};
use crate::device::{Device, DeviceKind};
use crate::time::Timestamp;

const AC_LOW_TEMPERATURE: f64 = 20.0;
const AC_MAX_RUNTIME_HOURS: i64 = 2;
const FAN_HIGH_SPEED: u8 = 4;
const FAN_MAX_HIGH_SPEED_HOURS: i64 = 1;
const TV_MAX_RUNTIME_HOURS: i64 = 3;
const PURIFIER_MAX_RUNTIME_HOURS: i64 = 2;
const DAYTIME_HOURS: RangeInclusive<u32> = 8..=18;

/// Pick the single most relevant suggestion for a snapshot.
///
/// Per-device rules run first, in snapshot order; for each device the first
/// matching rule wins. Only when no device matches is the first all-off room
/// reported. The hour-of-day check reads the wall clock of `now` in its own
/// timezone, so callers pass local time.
///
/// Devices with missing attributes or a blank room never fail evaluation;
/// the affected rule simply does not apply.
#[must_use]
pub fn evaluate<Tz: TimeZone>(
    snapshot: &[Device],
    tracker: &ActivationTracker,
    rooms: &RoomStatus,
    now: &DateTime<Tz>,
) -> Option<Suggestion> {
    let instant = now.with_timezone(&Utc);
    let hour = now.hour();

    snapshot
        .iter()
        .filter(|device| device.is_on())
        .find_map(|device| device_rule(device, snapshot, tracker, instant, hour))
        .or_else(|| {
            rooms.first_all_off().map(|room| Suggestion::RoomAllOff {
                room: room.to_string(),
            })
        })
}

fn device_rule(
    device: &Device,
    snapshot: &[Device],
    tracker: &ActivationTracker,
    now: Timestamp,
    hour: u32,
) -> Option<Suggestion> {
    let device_id = device.id;
    let device_name = device.name.clone();
    let elapsed = tracker.elapsed_on(device.id, now);

    match device.kind {
        DeviceKind::Ac => {
            if let Some(temperature) = device.temperature.filter(|t| *t < AC_LOW_TEMPERATURE) {
                Some(Suggestion::AcLowTemperature {
                    device_id,
                    device_name,
                    temperature,
                })
            } else if elapsed > TimeDelta::hours(AC_MAX_RUNTIME_HOURS) {
                Some(Suggestion::AcLongRuntime {
                    device_id,
                    device_name,
                })
            } else {
                None
            }
        }
        DeviceKind::Fan => {
            let long_runtime = elapsed > TimeDelta::hours(FAN_MAX_HIGH_SPEED_HOURS);
            if let Some(speed) = device
                .speed
                .filter(|s| *s >= FAN_HIGH_SPEED && long_runtime)
            {
                Some(Suggestion::FanHighSpeed {
                    device_id,
                    device_name,
                    speed,
                })
            } else if alone_in_room(device, snapshot) {
                Some(Suggestion::FanEmptyRoom {
                    device_id,
                    device_name,
                })
            } else {
                None
            }
        }
        DeviceKind::Tv => {
            (elapsed > TimeDelta::hours(TV_MAX_RUNTIME_HOURS)).then_some(Suggestion::TvLongRuntime {
                device_id,
                device_name,
            })
        }
        DeviceKind::Light => {
            if DAYTIME_HOURS.contains(&hour) {
                Some(Suggestion::LightDaytime {
                    device_id,
                    device_name,
                })
            } else if alone_in_room(device, snapshot) {
                Some(Suggestion::LightEmptyRoom {
                    device_id,
                    device_name,
                })
            } else {
                None
            }
        }
        DeviceKind::Purifier => {
            let long_runtime = elapsed > TimeDelta::hours(PURIFIER_MAX_RUNTIME_HOURS);
            long_runtime.then_some(Suggestion::PurifierLongRuntime {
                device_id,
                device_name,
            })
        }
        DeviceKind::Other(_) => None,
    }
}

/// No other device in the same room is on. False for a blank room.
fn alone_in_room(device: &Device, snapshot: &[Device]) -> bool {
    if device.room.trim().is_empty() {
        return false;
    }
    !snapshot
        .iter()
        .any(|other| other.id != device.id && other.room == device.room && other.is_on())
}
