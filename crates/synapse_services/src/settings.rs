//! Settings management

use crate::input::Viewport;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use synapse_core::{ConfigError, FieldConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid field settings: {0}")]
    Invalid(#[from] ConfigError),
}

/// Canvas and camera used to map pointer pixels into the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub width_px: u32,
    pub height_px: u32,
    pub fov_y_degrees: f32,
    pub camera_distance: f32,
    /// Upper bound on device pixel ratio the surface should use.
    pub max_pixel_ratio: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            width_px: 1280,
            height_px: 720,
            fov_y_degrees: 60.0,
            camera_distance: 5.0,
            max_pixel_ratio: 1.5,
        }
    }
}

impl DisplaySettings {
    pub fn viewport(&self) -> Viewport {
        Viewport::from_camera(
            self.width_px as f32,
            self.height_px as f32,
            self.fov_y_degrees,
            self.camera_distance,
        )
    }
}

/// Everything a host needs to start the field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub field: FieldConfig,
}

impl Settings {
    /// Parse and validate JSON settings. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.field.validate()?;
        Ok(settings)
    }

    pub fn to_json_pretty(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), particles = settings.field.particle_count, "settings loaded");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
