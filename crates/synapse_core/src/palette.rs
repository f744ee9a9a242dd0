//! Static per-point colors, sampled once at startup.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub primary: [f32; 3],
    pub secondary: [f32; 3],
    pub highlight: [f32; 3],
    /// Share of points drawn in `primary`.
    pub primary_share: f32,
    /// Share of points drawn in `secondary`; the rest get a random blend.
    pub secondary_share: f32,
    /// Chance that a point is overridden with `highlight`.
    pub highlight_chance: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            primary: rgb(0xa855f7),
            secondary: rgb(0x3b82f6),
            highlight: rgb(0xffffff),
            primary_share: 0.4,
            secondary_share: 0.3,
            highlight_chance: 0.1,
        }
    }
}

/// `0xRRGGBB` to normalised RGB.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

impl PaletteConfig {
    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let primary = Vec3::from_array(self.primary);
        let secondary = Vec3::from_array(self.secondary);

        let t: f32 = rng.gen();
        let mut color = if t < self.primary_share {
            primary
        } else if t < self.primary_share + self.secondary_share {
            secondary
        } else {
            primary.lerp(secondary, rng.gen())
        };
        if rng.gen::<f32>() < self.highlight_chance {
            color = Vec3::from_array(self.highlight);
        }
        color
    }
}

/// Flat RGB buffer with one color per point.
pub fn point_colors<R: Rng + ?Sized>(n: usize, palette: &PaletteConfig, rng: &mut R) -> Box<[f32]> {
    let mut colors = vec![0.0; n * 3].into_boxed_slice();
    for chunk in colors.chunks_exact_mut(3) {
        chunk.copy_from_slice(&palette.pick(rng).to_array());
    }
    colors
}
