//! Synapse Core
//!
//! The particle-field simulation behind the animated background:
//! - Entity store (fixed particle array)
//! - Uniform spatial grid for neighbour lookups
//! - Analytic motion model (drift, scroll parallax, pointer repulsion)
//! - Adjacency builder writing line geometry into reused buffers
//! - Frame driver orchestrating the per-frame ticks

pub mod adjacency;
pub mod config;
pub mod driver;
pub mod grid;
pub mod input;
pub mod math;
pub mod motion;
pub mod palette;
pub mod particle;
pub mod time;

pub use adjacency::{build_edges, AdjacencyBuilder, EdgeBuffers, EdgeBuild, EdgeTint};
pub use config::{ConfigError, FieldConfig};
pub use driver::{DirtyFlags, FrameDriver, StopHandle, TickReport};
pub use grid::SpatialGrid;
pub use input::{InputSnapshot, PointerState, ScrollState};
pub use motion::MotionParams;
pub use particle::{create_entities, Particle, ParticleStore, SpawnConfig};

pub use glam;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
