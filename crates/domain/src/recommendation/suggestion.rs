use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::id::DeviceId;

/// One actionable recommendation.
///
/// The [`Display`](fmt::Display) impl renders the message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    AcLowTemperature {
        device_id: DeviceId,
        device_name: String,
        temperature: f64,
    },
    AcLongRuntime {
        device_id: DeviceId,
        device_name: String,
    },
    FanHighSpeed {
        device_id: DeviceId,
        device_name: String,
        speed: u8,
    },
    FanEmptyRoom {
        device_id: DeviceId,
        device_name: String,
    },
    TvLongRuntime {
        device_id: DeviceId,
        device_name: String,
    },
    LightDaytime {
        device_id: DeviceId,
        device_name: String,
    },
    LightEmptyRoom {
        device_id: DeviceId,
        device_name: String,
    },
    PurifierLongRuntime {
        device_id: DeviceId,
        device_name: String,
    },
    RoomAllOff {
        room: String,
    },
}

impl Suggestion {
    /// Stable machine-readable rule name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AcLowTemperature { .. } => "ac_low_temperature",
            Self::AcLongRuntime { .. } => "ac_long_runtime",
            Self::FanHighSpeed { .. } => "fan_high_speed",
            Self::FanEmptyRoom { .. } => "fan_empty_room",
            Self::TvLongRuntime { .. } => "tv_long_runtime",
            Self::LightDaytime { .. } => "light_daytime",
            Self::LightEmptyRoom { .. } => "light_empty_room",
            Self::PurifierLongRuntime { .. } => "purifier_long_runtime",
            Self::RoomAllOff { .. } => "room_all_off",
        }
    }

    /// The device the suggestion is about, if any.
    #[must_use]
    pub fn device_id(&self) -> Option<DeviceId> {
        match self {
            Self::AcLowTemperature { device_id, .. }
            | Self::AcLongRuntime { device_id, .. }
            | Self::FanHighSpeed { device_id, .. }
            | Self::FanEmptyRoom { device_id, .. }
            | Self::TvLongRuntime { device_id, .. }
            | Self::LightDaytime { device_id, .. }
            | Self::LightEmptyRoom { device_id, .. }
            | Self::PurifierLongRuntime { device_id, .. } => Some(*device_id),
            Self::RoomAllOff { .. } => None,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AcLowTemperature {
                device_name,
                temperature,
                ..
            } => write!(
                f,
                "AC \"{device_name}\" is set to a low temperature ({temperature}°C). \
                 Consider increasing the temperature or turning it off to save electricity."
            ),
            Self::AcLongRuntime { device_name, .. } => write!(
                f,
                "AC \"{device_name}\" has been on for over 2 hours. \
                 Consider turning it off to save energy."
            ),
            Self::FanHighSpeed { device_name, .. } => write!(
                f,
                "Fan \"{device_name}\" has been running at high speed for over 1 hour. \
                 Lower the speed to save power."
            ),
            Self::FanEmptyRoom { device_name, .. } => write!(
                f,
                "Fan \"{device_name}\" is on in an empty room. Consider turning it off."
            ),
            Self::TvLongRuntime { device_name, .. } => write!(
                f,
                "TV \"{device_name}\" has been on for over 3 hours. \
                 Consider turning it off if not in use."
            ),
            Self::LightDaytime { device_name, .. } => write!(
                f,
                "Light \"{device_name}\" is on during the day. \
                 Consider turning it off to save energy."
            ),
            Self::LightEmptyRoom { device_name, .. } => write!(
                f,
                "Light \"{device_name}\" is on in an empty room. Consider turning it off."
            ),
            Self::PurifierLongRuntime { device_name, .. } => write!(
                f,
                "Purifier \"{device_name}\" has been on for over 2 hours. \
                 Consider turning it off to save energy."
            ),
            Self::RoomAllOff { room } => write!(
                f,
                "All devices in \"{room}\" are off. You can close the room to save energy."
            ),
        }
    }
}

/// Serialized as `{ "kind", "device_id", "message" }`.
impl Serialize for Suggestion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Suggestion", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("device_id", &self.device_id())?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}
