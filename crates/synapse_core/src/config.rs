//! Field configuration

use crate::adjacency::EdgeTint;
use crate::motion::MotionParams;
use crate::palette::PaletteConfig;
use crate::particle::SpawnConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`FieldConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("connection distance must be positive and finite, got {0}")]
    ConnectionDistance(f32),

    #[error("pointer influence radius must be positive and finite, got {0}")]
    InfluenceRadius(f32),

    #[error("connection interval must be at least 1")]
    ZeroInterval,

    #[error("speed range is inverted: min {min} > max {max}")]
    SpeedRange { min: f32, max: f32 },

    #[error("{field} must be finite and non-negative, got {value}")]
    NonFinite { field: &'static str, value: f32 },
}

/// Everything needed to build a [`FrameDriver`](crate::FrameDriver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub spawn: SpawnConfig,
    /// Pairs closer than this are connected. Also the grid cell size.
    pub connection_distance: f32,
    /// Maximum edges per build. `None` means three per particle.
    pub edge_capacity: Option<usize>,
    /// Rebuild edges every this many frames.
    pub connection_interval: u32,
    pub motion: MotionParams,
    pub tint: EdgeTint,
    pub palette: PaletteConfig,
    /// Fixed RNG seed for the initial sampling. Random when absent.
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 400,
            spawn: SpawnConfig::default(),
            connection_distance: 2.0,
            edge_capacity: None,
            connection_interval: 2,
            motion: MotionParams::default(),
            tint: EdgeTint::default(),
            palette: PaletteConfig::default(),
            seed: None,
        }
    }
}

impl FieldConfig {
    pub fn with_particle_count(mut self, particle_count: usize) -> Self {
        self.particle_count = particle_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Edge buffer capacity for a field of `particles` points, defaulting
    /// to three edges per point.
    pub fn resolved_edge_capacity(&self, particles: usize) -> usize {
        self.edge_capacity.unwrap_or(particles * 3)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = self.connection_distance;
        if !(d.is_finite() && d > 0.0) {
            return Err(ConfigError::ConnectionDistance(d));
        }
        let r = self.motion.influence_radius;
        if !(r.is_finite() && r > 0.0) {
            return Err(ConfigError::InfluenceRadius(r));
        }
        if self.connection_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.spawn.speed_min > self.spawn.speed_max {
            return Err(ConfigError::SpeedRange {
                min: self.spawn.speed_min,
                max: self.spawn.speed_max,
            });
        }

        let checks = [
            ("spawn.half_extents.x", self.spawn.half_extents[0]),
            ("spawn.half_extents.y", self.spawn.half_extents[1]),
            ("spawn.half_extents.z", self.spawn.half_extents[2]),
            ("spawn.velocity_range", self.spawn.velocity_range),
            ("motion.repel_strength", self.motion.repel_strength),
            ("tint.intensity", self.tint.intensity),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        Ok(())
    }
}
