//! Pointer and scroll input
//!
//! Signals arrive from the host's event callbacks and are stored in shared
//! cells; the frame driver reads a snapshot once per frame. Each field is a
//! single value, so no further synchronisation is needed on one thread.

use crate::signals::Signal;
use std::cell::Cell;
use std::rc::Rc;
use synapse_core::glam::{Vec2, Vec3};
use synapse_core::{InputSnapshot, PointerState, ScrollState};

/// Canvas size in pixels and the world extent it shows at z = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_px: f32,
    pub height_px: f32,
    pub world_width: f32,
    pub world_height: f32,
}

impl Viewport {
    pub fn new(width_px: f32, height_px: f32, world_width: f32, world_height: f32) -> Self {
        Self {
            width_px,
            height_px,
            world_width,
            world_height,
        }
    }

    /// Viewport of a perspective camera looking down -z at the origin from
    /// `distance`, with vertical field of view `fov_y_degrees`.
    pub fn from_camera(width_px: f32, height_px: f32, fov_y_degrees: f32, distance: f32) -> Self {
        let world_height = 2.0 * distance * (fov_y_degrees.to_radians() * 0.5).tan();
        let aspect = if height_px > 0.0 { width_px / height_px } else { 1.0 };
        Self::new(width_px, height_px, world_height * aspect, world_height)
    }

    /// Pixel coordinates (origin top-left, y down) to normalised
    /// coordinates in [-1, 1], y up. `None` for a zero-sized viewport.
    pub fn normalize(&self, client_x: f32, client_y: f32) -> Option<Vec2> {
        if self.width_px <= 0.0 || self.height_px <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            client_x / self.width_px * 2.0 - 1.0,
            -(client_y / self.height_px) * 2.0 + 1.0,
        ))
    }

    /// Normalised coordinates onto the z = 0 plane.
    pub fn project(&self, ndc: Vec2) -> Vec3 {
        Vec3::new(ndc.x * self.world_width * 0.5, ndc.y * self.world_height * 0.5, 0.0)
    }

    pub fn pointer_state(&self, client_x: f32, client_y: f32) -> Option<PointerState> {
        self.normalize(client_x, client_y).map(|ndc| PointerState {
            ndc,
            world: self.project(ndc),
        })
    }
}

#[derive(Debug, Default)]
struct InputCells {
    viewport: Cell<Option<Viewport>>,
    pointer: Cell<PointerState>,
    scroll: Cell<ScrollState>,
}

/// Shared pointer/scroll state. Clones refer to the same cells.
#[derive(Debug, Clone, Default)]
pub struct InputChannel {
    cells: Rc<InputCells>,
}

impl InputChannel {
    pub fn new(viewport: Viewport) -> Self {
        let channel = Self::default();
        channel.set_viewport(viewport);
        channel
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.cells.viewport.get()
    }

    /// Replace the viewport. The stored pointer keeps its world position
    /// until the next move.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.cells.viewport.set(Some(viewport));
    }

    /// Pointer moved to `(client_x, client_y)` pixels. Ignored until a
    /// non-empty viewport is known.
    pub fn pointer_moved(&self, client_x: f32, client_y: f32) {
        if let Some(state) = self.viewport().and_then(|vp| vp.pointer_state(client_x, client_y)) {
            self.cells.pointer.set(state);
        }
    }

    pub fn scrolled(&self, offset: f32) {
        self.cells.scroll.set(ScrollState::new(offset));
    }

    /// Route a host signal to the matching setter.
    pub fn apply(&self, signal: &Signal) {
        match *signal {
            Signal::PointerMove { client_x, client_y } => self.pointer_moved(client_x, client_y),
            Signal::Scroll { offset } => self.scrolled(offset),
            Signal::Resize { viewport } => self.set_viewport(viewport),
        }
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            pointer: self.cells.pointer.get(),
            scroll: self.cells.scroll.get(),
        }
    }
}
