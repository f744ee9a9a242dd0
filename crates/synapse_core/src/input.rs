//! Pointer and scroll state as seen by the motion model

use glam::{Vec2, Vec3};

/// Normalised pointer position and its projection onto the z = 0 plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Device-independent position, roughly [-1, 1] on each axis, y up.
    pub ndc: Vec2,
    /// `ndc` projected into world space at z = 0.
    pub world: Vec3,
}

impl PointerState {
    pub fn at_world(world: Vec3) -> Self {
        Self {
            ndc: Vec2::ZERO,
            world,
        }
    }
}

/// Vertical page scroll offset in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    pub offset: f32,
}

impl ScrollState {
    pub fn new(offset: f32) -> Self {
        Self { offset }
    }
}

/// Inputs read once per frame by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    pub pointer: PointerState,
    pub scroll: ScrollState,
}
