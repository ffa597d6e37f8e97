//! Configuration loading and saving

use anyhow::Result;
use rotator_core::Settings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Rotator settings for the turret
    #[serde(default = "default_settings")]
    pub settings: Settings,
    #[serde(default)]
    pub target: TargetConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            settings: default_settings(),
            target: TargetConfig::default(),
        }
    }
}

fn default_settings() -> Settings {
    Settings {
        local_controller: Some("Head".to_string()),
        remote_object: Some("Target".to_string()),
        remote_controller: Some("Core".to_string()),
        ..Default::default()
    }
}

/// Orbit of the target controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Orbit radius in meters
    #[serde(default = "default_radius")]
    pub radius: f32,
    /// Orbit height in meters
    #[serde(default = "default_height")]
    pub height: f32,
    /// Angular speed in radians per second
    #[serde(default = "default_speed")]
    pub speed: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            height: default_height(),
            speed: default_speed(),
        }
    }
}

fn default_radius() -> f32 {
    2.0
}

fn default_height() -> f32 {
    1.0
}

fn default_speed() -> f32 {
    0.6
}

impl ViewerConfig {
    fn validated(self) -> Result<Self> {
        let ViewerConfig { settings, target } = self;
        Ok(ViewerConfig {
            settings: settings.validated()?,
            target,
        })
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<ViewerConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: ViewerConfig = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        config.validated()
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(ViewerConfig::default())
    }
}

/// Save configuration to file
pub fn save_config(config: &ViewerConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
