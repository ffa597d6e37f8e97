//! Persisted rotator settings
//!
//! The host stores plugin state as a flat key/value object. Every key is
//! optional on load so settings written by older plugin versions (which had
//! no offsets or pause flag) still load.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

use crate::offset::Offset;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Setting {key} is not a finite angle: {value}")]
    InvalidAngle { key: &'static str, value: f32 },
}

/// Everything a rotator persists between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Controller of the host object that gets rotated
    #[serde(rename = "LocalController", default, skip_serializing_if = "Option::is_none")]
    pub local_controller: Option<String>,
    /// Object owning the controller to look at
    #[serde(rename = "RemoteAtom", default, skip_serializing_if = "Option::is_none")]
    pub remote_object: Option<String>,
    /// Controller to look at
    #[serde(rename = "RemoteController", default, skip_serializing_if = "Option::is_none")]
    pub remote_controller: Option<String>,
    #[serde(rename = "OffsetX", default)]
    pub offset_x: f32,
    #[serde(rename = "OffsetY", default)]
    pub offset_y: f32,
    #[serde(rename = "OffsetZ", default)]
    pub offset_z: f32,
    #[serde(rename = "Paused", default)]
    pub paused: bool,
}

impl Settings {
    pub fn offset(&self) -> Offset {
        Offset::new(self.offset_x, self.offset_y, self.offset_z)
    }

    pub fn set_offset(&mut self, offset: Offset) {
        let offset = offset.clamped();
        self.offset_x = offset.x;
        self.offset_y = offset.y;
        self.offset_z = offset.z;
    }

    /// Serialize into the host's key/value form
    pub fn to_json(&self) -> Result<Value, SettingsError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Load from the host's key/value form.
    ///
    /// Missing keys take their defaults and offsets are clamped into range.
    pub fn from_json(value: &Value) -> Result<Self, SettingsError> {
        let settings: Settings = Settings::deserialize(value)?;
        settings.validated()
    }

    /// Load settings from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validated()
    }

    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject non-finite angles and clamp the rest into range
    pub fn validated(mut self) -> Result<Self, SettingsError> {
        for (key, value) in [
            ("OffsetX", self.offset_x),
            ("OffsetY", self.offset_y),
            ("OffsetZ", self.offset_z),
        ] {
            if !value.is_finite() {
                return Err(SettingsError::InvalidAngle { key, value });
            }
        }
        let offset = self.offset();
        self.set_offset(offset);
        Ok(self)
    }
}
