//! Surface that keeps the drawn geometry in memory instead of on a GPU.

use crate::batch::{LineBatch, PointBatch, Vec3Attr};
use crate::surface::{RenderSurface, SurfaceError};
use synapse_services::DisplaySettings;

/// Records what a real surface would draw. Its vectors are reused between
/// uploads, so steady-state frames do not allocate.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    width_px: u32,
    height_px: u32,
    points: Vec<Vec3Attr>,
    line_vertices: Vec<Vec3Attr>,
    point_uploads: u64,
    line_uploads: u64,
    presents: u64,
    released: bool,
}

impl HeadlessSurface {
    /// Fails for an empty canvas, mirroring a context that cannot be made.
    pub fn create(display: &DisplaySettings) -> Result<Self, SurfaceError> {
        if display.width_px == 0 || display.height_px == 0 {
            return Err(SurfaceError::unavailable(format!(
                "canvas is {}x{}",
                display.width_px, display.height_px
            )));
        }
        Ok(Self {
            width_px: display.width_px,
            height_px: display.height_px,
            ..Self::default()
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width_px, self.height_px)
    }

    /// Point positions from the latest upload.
    pub fn points(&self) -> &[Vec3Attr] {
        &self.points
    }

    /// Line vertices inside the latest draw range.
    pub fn line_vertices(&self) -> &[Vec3Attr] {
        &self.line_vertices
    }

    pub fn drawn_lines(&self) -> usize {
        self.line_vertices.len() / 2
    }

    pub fn point_uploads(&self) -> u64 {
        self.point_uploads
    }

    pub fn line_uploads(&self) -> u64 {
        self.line_uploads
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl RenderSurface for HeadlessSurface {
    fn upload_points(&mut self, points: &PointBatch<'_>) {
        self.points.clear();
        self.points.extend_from_slice(points.position_attrs());
        self.point_uploads += 1;
    }

    fn upload_lines(&mut self, lines: &LineBatch<'_>) {
        self.line_vertices.clear();
        self.line_vertices.extend_from_slice(lines.drawn_positions());
        self.line_uploads += 1;
    }

    fn present(&mut self) {
        self.presents += 1;
    }

    fn release(&mut self) {
        self.points = Vec::new();
        self.line_vertices = Vec::new();
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_canvas_is_unavailable() {
        let display = DisplaySettings {
            width_px: 0,
            ..DisplaySettings::default()
        };
        let err = HeadlessSurface::create(&display).unwrap_err();
        assert_eq!(err, SurfaceError::unavailable("canvas is 0x720"));
        assert_eq!(err.to_string(), "render surface unavailable: canvas is 0x720");
    }

    #[test]
    fn release_drops_retained_geometry() {
        let mut surface = HeadlessSurface::create(&DisplaySettings::default()).unwrap();
        let positions = [1.0, 2.0, 3.0];
        let colors = [0.5, 0.5, 0.5];
        surface.upload_points(&PointBatch {
            positions: &positions,
            colors: &colors,
        });
        assert_eq!(surface.points(), &[[1.0f32, 2.0, 3.0]]);

        surface.release();
        assert!(surface.is_released());
        assert!(surface.points().is_empty());
    }
}
