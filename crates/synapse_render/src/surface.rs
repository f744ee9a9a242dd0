//! Render surface abstraction
//!
//! The canvas, camera and draw calls live behind this trait. Surfaces only
//! ever borrow the driver's buffers for the duration of an upload.

use crate::batch::{LineBatch, PointBatch};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The graphics context could not be created. The page has to render
    /// without the field.
    #[error("render surface unavailable: {reason}")]
    Unavailable { reason: String },
}

impl SurfaceError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Consumer of the field's geometry.
pub trait RenderSurface {
    /// Point positions changed.
    fn upload_points(&mut self, points: &PointBatch<'_>);

    /// Line geometry or its draw range changed.
    fn upload_lines(&mut self, lines: &LineBatch<'_>);

    /// Draw the current buffer contents.
    fn present(&mut self) {}

    /// Free retained GPU buffers. Called once on teardown.
    fn release(&mut self);
}
