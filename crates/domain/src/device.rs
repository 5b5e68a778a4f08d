//! Device: a controllable appliance that belongs to one user and sits in a room.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HomewiseError, ValidationError};
use crate::id::{DeviceId, UserId};
use crate::time::{Timestamp, now};

/// Room assigned to devices created without one.
pub const DEFAULT_ROOM: &str = "Living Room";

/// Default AC set-point in °C.
pub const DEFAULT_AC_TEMPERATURE: f64 = 24.0;

/// Default fan speed step.
pub const DEFAULT_FAN_SPEED: u8 = 1;

/// Supported AC set-point range in °C.
pub const AC_TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 16.0..=30.0;

/// Supported fan speed steps.
pub const FAN_SPEED_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// The closed set of device types the recommendation rules know about.
///
/// Anything else is kept verbatim as [`DeviceKind::Other`] and never matches a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceKind {
    Ac,
    Fan,
    Light,
    Tv,
    Purifier,
    Other(String),
}

impl DeviceKind {
    /// Canonical label (`"AC"`, `"Fan"`, …).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ac => "AC",
            Self::Fan => "Fan",
            Self::Light => "Light",
            Self::Tv => "TV",
            Self::Purifier => "Purifier",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for DeviceKind {
    fn from(value: String) -> Self {
        match value.trim() {
            "AC" => Self::Ac,
            "Fan" => Self::Fan,
            "Light" => Self::Light,
            "TV" => Self::Tv,
            "Purifier" => Self::Purifier,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<&str> for DeviceKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<DeviceKind> for String {
    fn from(value: DeviceKind) -> Self {
        match value {
            DeviceKind::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On/off status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    #[default]
    Off,
}

impl PowerState {
    #[must_use]
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::On => Self::Off,
            Self::Off => Self::On,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }

    /// Parse the stored representation; anything but `"on"` is off.
    #[must_use]
    pub fn from_str_lossy(raw: &str) -> Self {
        if raw == "on" { Self::On } else { Self::Off }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the device talks to the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionType {
    #[default]
    #[serde(rename = "Wi-Fi")]
    WiFi,
    Bluetooth,
    Zigbee,
}

impl ConnectionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WiFi => "Wi-Fi",
            Self::Bluetooth => "Bluetooth",
            Self::Zigbee => "Zigbee",
        }
    }

    /// Parse the stored representation, falling back to [`ConnectionType::WiFi`].
    #[must_use]
    pub fn from_str_lossy(raw: &str) -> Self {
        match raw {
            "Bluetooth" => Self::Bluetooth,
            "Zigbee" => Self::Zigbee,
            _ => Self::WiFi,
        }
    }
}

/// A device as stored and as seen by the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub user_id: UserId,
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub status: PowerState,
    pub room: String,
    /// Set-point in °C (AC only).
    pub temperature: Option<f64>,
    /// Speed step (Fan only).
    pub speed: Option<u8>,
    pub connection_type: ConnectionType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Partial update of the user-adjustable device settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    pub status: Option<PowerState>,
    pub temperature: Option<f64>,
    pub speed: Option<u8>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.status.is_on()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::Validation`] when:
    /// - `name` is blank ([`ValidationError::EmptyName`])
    /// - `brand` is blank ([`ValidationError::EmptyBrand`])
    /// - `room` is blank ([`ValidationError::EmptyRoom`])
    /// - the temperature or speed is outside its supported range
    pub fn validate(&self) -> Result<(), HomewiseError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if self.brand.trim().is_empty() {
            return Err(ValidationError::EmptyBrand.into());
        }
        if self.room.trim().is_empty() {
            return Err(ValidationError::EmptyRoom.into());
        }
        if let Some(temperature) = self.temperature {
            if !AC_TEMPERATURE_RANGE.contains(&temperature) {
                return Err(ValidationError::TemperatureOutOfRange(temperature.to_string()).into());
            }
        }
        if let Some(speed) = self.speed {
            if !FAN_SPEED_RANGE.contains(&speed) {
                return Err(ValidationError::SpeedOutOfRange(speed).into());
            }
        }
        Ok(())
    }

    /// Flip the power state.
    pub fn toggle(&mut self, ts: Timestamp) {
        self.status = self.status.toggled();
        self.updated_at = ts;
    }

    /// Apply a partial settings update and re-check invariants.
    ///
    /// The device is left untouched when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::Validation`] if the resulting device is invalid.
    pub fn apply_settings(
        &mut self,
        settings: DeviceSettings,
        ts: Timestamp,
    ) -> Result<(), HomewiseError> {
        let mut next = self.clone();
        if let Some(status) = settings.status {
            next.status = status;
        }
        if settings.temperature.is_some() {
            next.temperature = settings.temperature;
        }
        if settings.speed.is_some() {
            next.speed = settings.speed;
        }
        next.validate()?;
        next.updated_at = ts;
        *self = next;
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    user_id: Option<UserId>,
    name: Option<String>,
    brand: Option<String>,
    kind: Option<DeviceKind>,
    status: Option<PowerState>,
    room: Option<String>,
    temperature: Option<f64>,
    speed: Option<u8>,
    connection_type: Option<ConnectionType>,
    created_at: Option<Timestamp>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<DeviceKind>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: PowerState) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn speed(mut self, speed: u8) -> Self {
        self.speed = Some(speed);
        self
    }

    #[must_use]
    pub fn connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = Some(connection_type);
        self
    }

    #[must_use]
    pub fn created_at(mut self, ts: Timestamp) -> Self {
        self.created_at = Some(ts);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// ACs default to [`DEFAULT_AC_TEMPERATURE`] and fans to
    /// [`DEFAULT_FAN_SPEED`]; other kinds carry neither attribute unless set.
    ///
    /// # Errors
    ///
    /// Returns [`HomewiseError::Validation`] if the owner is missing or any
    /// invariant checked by [`Device::validate`] fails.
    pub fn build(self) -> Result<Device, HomewiseError> {
        let user_id = self.user_id.ok_or(ValidationError::MissingOwner)?;
        let kind = self.kind.unwrap_or_else(|| DeviceKind::Other(String::new()));
        let temperature = self
            .temperature
            .or_else(|| (kind == DeviceKind::Ac).then_some(DEFAULT_AC_TEMPERATURE));
        let speed = self
            .speed
            .or_else(|| (kind == DeviceKind::Fan).then_some(DEFAULT_FAN_SPEED));
        let created_at = self.created_at.unwrap_or_else(now);
        let device = Device {
            id: self.id.unwrap_or_default(),
            user_id,
            name: self.name.unwrap_or_default().trim().to_string(),
            brand: self.brand.unwrap_or_default().trim().to_string(),
            kind,
            status: self.status.unwrap_or_default(),
            room: self
                .room
                .map_or_else(|| DEFAULT_ROOM.to_string(), |r| r.trim().to_string()),
            temperature,
            speed,
            connection_type: self.connection_type.unwrap_or_default(),
            created_at,
            updated_at: created_at,
        };
        device.validate()?;
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> DeviceBuilder {
        Device::builder()
            .user_id(UserId::new())
            .name("Bedroom AC")
            .brand("Daikin")
    }

    #[test]
    fn should_default_ac_temperature_and_living_room() {
        let device = builder().kind(DeviceKind::Ac).build().unwrap();
        assert_eq!(device.temperature, Some(DEFAULT_AC_TEMPERATURE));
        assert_eq!(device.speed, None);
        assert_eq!(device.room, DEFAULT_ROOM);
        assert_eq!(device.status, PowerState::Off);
        assert_eq!(device.connection_type, ConnectionType::WiFi);
    }

    #[test]
    fn should_default_fan_speed() {
        let device = builder().kind("Fan").build().unwrap();
        assert_eq!(device.speed, Some(DEFAULT_FAN_SPEED));
        assert_eq!(device.temperature, None);
    }

    #[test]
    fn should_reject_missing_owner() {
        let result = Device::builder().name("Lamp").brand("Ikea").build();
        assert!(matches!(
            result,
            Err(HomewiseError::Validation(ValidationError::MissingOwner))
        ));
    }

    #[test]
    fn should_reject_blank_name() {
        let result = builder().name("   ").build();
        assert!(matches!(
            result,
            Err(HomewiseError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_reject_blank_room() {
        let result = builder().room("").build();
        assert!(matches!(
            result,
            Err(HomewiseError::Validation(ValidationError::EmptyRoom))
        ));
    }

    #[test]
    fn should_reject_out_of_range_speed() {
        let result = builder().kind(DeviceKind::Fan).speed(9).build();
        assert!(matches!(
            result,
            Err(HomewiseError::Validation(ValidationError::SpeedOutOfRange(9)))
        ));
    }

    #[test]
    fn should_toggle_status() {
        let mut device = builder().build().unwrap();
        device.toggle(now());
        assert!(device.is_on());
        device.toggle(now());
        assert!(!device.is_on());
    }

    #[test]
    fn should_apply_partial_settings() {
        let mut device = builder().kind(DeviceKind::Ac).build().unwrap();
        device
            .apply_settings(
                DeviceSettings {
                    temperature: Some(18.0),
                    ..DeviceSettings::default()
                },
                now(),
            )
            .unwrap();
        assert_eq!(device.temperature, Some(18.0));
        assert_eq!(device.status, PowerState::Off);
    }

    #[test]
    fn should_leave_device_untouched_when_settings_invalid() {
        let mut device = builder().kind(DeviceKind::Ac).build().unwrap();
        let result = device.apply_settings(
            DeviceSettings {
                status: Some(PowerState::On),
                temperature: Some(5.0),
                speed: None,
            },
            now(),
        );
        assert!(result.is_err());
        assert_eq!(device.temperature, Some(DEFAULT_AC_TEMPERATURE));
        assert_eq!(device.status, PowerState::Off);
    }

    #[test]
    fn should_parse_known_and_unknown_kinds() {
        assert_eq!(DeviceKind::from("TV"), DeviceKind::Tv);
        assert_eq!(DeviceKind::from("AC"), DeviceKind::Ac);
        assert_eq!(
            DeviceKind::from("Lock"),
            DeviceKind::Other("Lock".to_string())
        );
        assert_eq!(String::from(DeviceKind::Purifier), "Purifier");
    }

    #[test]
    fn should_serialize_with_type_field_and_wire_labels() {
        let device = builder()
            .kind(DeviceKind::Tv)
            .connection_type(ConnectionType::WiFi)
            .build()
            .unwrap();
        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["type"], "TV");
        assert_eq!(json["status"], "off");
        assert_eq!(json["connection_type"], "Wi-Fi");
    }
}
