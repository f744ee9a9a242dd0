//! Read-only views over the driver's buffers, shaped for GPU upload.

use synapse_core::FrameDriver;

/// xyz or rgb triple as laid out in the flat buffers.
pub type Vec3Attr = [f32; 3];

/// Point cloud: one position and one color per particle.
#[derive(Debug, Clone, Copy)]
pub struct PointBatch<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
}

impl<'a> PointBatch<'a> {
    pub fn from_driver(driver: &'a FrameDriver) -> Self {
        Self {
            positions: driver.point_positions(),
            colors: driver.point_colors(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position_attrs(&self) -> &'a [Vec3Attr] {
        bytemuck::cast_slice(self.positions)
    }

    pub fn color_attrs(&self) -> &'a [Vec3Attr] {
        bytemuck::cast_slice(self.colors)
    }

    pub fn position_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.positions)
    }

    pub fn color_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.colors)
    }
}

/// Line segments: two vertices per edge. The buffers span the full edge
/// capacity; only the first `draw_vertices` vertices are valid.
#[derive(Debug, Clone, Copy)]
pub struct LineBatch<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub draw_vertices: usize,
}

impl<'a> LineBatch<'a> {
    pub fn from_driver(driver: &'a FrameDriver) -> Self {
        let edges = driver.edges();
        Self {
            positions: edges.positions(),
            colors: edges.colors(),
            draw_vertices: edges.draw_count(),
        }
    }

    /// Vertices the buffers could hold.
    pub fn capacity_vertices(&self) -> usize {
        self.positions.len() / 3
    }

    /// Valid vertex positions only.
    pub fn drawn_positions(&self) -> &'a [Vec3Attr] {
        &bytemuck::cast_slice::<f32, Vec3Attr>(self.positions)[..self.draw_vertices]
    }

    /// Valid vertex colors only.
    pub fn drawn_colors(&self) -> &'a [Vec3Attr] {
        &bytemuck::cast_slice::<f32, Vec3Attr>(self.colors)[..self.draw_vertices]
    }

    pub fn position_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.positions)
    }

    pub fn color_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.colors)
    }
}
