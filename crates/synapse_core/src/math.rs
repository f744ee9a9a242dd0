//! Math utilities
//!
//! Re-exports glam with the few helpers the field needs

pub use glam::*;

use rand::Rng;

/// Integer grid cell containing `position`, `floor(position / cell_size)` per axis.
#[inline]
pub fn cell_coord(position: Vec3, cell_size: f32) -> IVec3 {
    (position / cell_size).floor().as_ivec3()
}

/// Uniform sample in `[-half, half)`. A non-positive `half` yields 0.
#[inline]
pub fn sample_symmetric<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    if half <= 0.0 {
        return 0.0;
    }
    (rng.gen::<f32>() - 0.5) * 2.0 * half
}

/// Uniform sample inside the box `[-half_extents, half_extents)`.
#[inline]
pub fn sample_in_box<R: Rng + ?Sized>(rng: &mut R, half_extents: Vec3) -> Vec3 {
    Vec3::new(
        sample_symmetric(rng, half_extents.x),
        sample_symmetric(rng, half_extents.y),
        sample_symmetric(rng, half_extents.z),
    )
}
