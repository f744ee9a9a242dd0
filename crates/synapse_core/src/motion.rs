//! Motion model
//!
//! A particle's position is an analytic function of time: oscillation around
//! its anchor, a slow linear drift, a scroll-driven z offset and an
//! instantaneous push away from the pointer. Nothing accumulates between
//! frames, so the repulsion never builds momentum.

use crate::input::{PointerState, ScrollState};
use crate::particle::Particle;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Below this planar distance the pointer is treated as coincident and
/// applies no force.
const REPEL_EPSILON: f32 = 1e-6;

/// Per-axis oscillation constants. Axes use different frequencies so
/// particles do not move in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisWave {
    pub frequency: f32,
    pub phase_scale: f32,
    pub amplitude: f32,
}

impl AxisWave {
    pub const fn new(frequency: f32, phase_scale: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            phase_scale,
            amplitude,
        }
    }

    #[inline]
    fn argument(&self, time: f32, speed: f32, phase: f32) -> f32 {
        time * speed * self.frequency + phase * self.phase_scale
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// x uses `sin`.
    pub wave_x: AxisWave,
    /// y uses `cos`.
    pub wave_y: AxisWave,
    /// z uses `sin`.
    pub wave_z: AxisWave,
    /// Multiplier on `velocity_seed * time` for the planar drift.
    pub drift_scale: f32,
    /// Pixels of scroll to world units.
    pub scroll_scale: f32,
    /// Extra depth multiplier on the scroll offset.
    pub scroll_depth: f32,
    pub influence_radius: f32,
    pub repel_strength: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            wave_x: AxisWave::new(0.5, 1.0, 0.3),
            wave_y: AxisWave::new(0.4, 1.3, 0.25),
            wave_z: AxisWave::new(0.3, 0.7, 0.2),
            drift_scale: 10.0,
            scroll_scale: 0.001,
            scroll_depth: 2.0,
            influence_radius: 2.5,
            repel_strength: 0.6,
        }
    }
}

/// Position of `particle` at `time`. Pure: equal inputs give bit-identical
/// output.
pub fn advance(
    particle: &Particle,
    time: f32,
    pointer: &PointerState,
    scroll: &ScrollState,
    params: &MotionParams,
) -> Vec3 {
    let Particle {
        base_position: base,
        velocity_seed: seed,
        phase,
        speed,
        ..
    } = *particle;

    let oscillation = Vec3::new(
        params.wave_x.argument(time, speed, phase).sin() * params.wave_x.amplitude,
        params.wave_y.argument(time, speed, phase).cos() * params.wave_y.amplitude,
        params.wave_z.argument(time, speed, phase).sin() * params.wave_z.amplitude,
    );
    let drift = Vec3::new(seed.x, seed.y, 0.0) * time * params.drift_scale;
    let parallax = Vec3::new(0.0, 0.0, scroll.offset * params.scroll_scale * params.scroll_depth);

    let position = base + oscillation + drift - parallax;
    repel(position, pointer.world, params.influence_radius, params.repel_strength)
}

/// Advance `particle` in place.
#[inline]
pub fn apply(
    particle: &mut Particle,
    time: f32,
    pointer: &PointerState,
    scroll: &ScrollState,
    params: &MotionParams,
) {
    particle.position = advance(particle, time, pointer, scroll, params);
}

/// Push `position` away from `pointer` in the xy plane.
///
/// Inside `radius` the nudge is `(1 - dist / radius) * strength` along the
/// separation. Outside the radius, or when the two coincide, `position` is
/// returned unchanged.
pub fn repel(position: Vec3, pointer: Vec3, radius: f32, strength: f32) -> Vec3 {
    let delta = Vec2::new(position.x - pointer.x, position.y - pointer.y);
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return position;
    }

    let dist = dist_sq.sqrt();
    if dist <= REPEL_EPSILON {
        return position;
    }

    let force = (1.0 - dist / radius) * strength;
    let push = delta / dist * force;
    Vec3::new(position.x + push.x, position.y + push.y, position.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_particle() -> Particle {
        Particle {
            position: Vec3::ZERO,
            base_position: Vec3::new(1.0, -2.0, 0.5),
            velocity_seed: Vec3::new(0.001, -0.0015, 0.002),
            phase: 1.1,
            speed: 0.7,
        }
    }

    fn far_pointer() -> PointerState {
        PointerState::at_world(Vec3::new(100.0, 100.0, 0.0))
    }

    #[test]
    fn advance_is_bit_identical_for_equal_inputs() {
        let particle = seeded_particle();
        let pointer = PointerState::at_world(Vec3::new(1.2, -1.8, 0.0));
        let scroll = ScrollState::new(340.0);
        let params = MotionParams::default();

        let a = advance(&particle, 12.345, &pointer, &scroll, &params);
        let b = advance(&particle, 12.345, &pointer, &scroll, &params);
        assert_eq!(a.to_array().map(f32::to_bits), b.to_array().map(f32::to_bits));
    }

    #[test]
    fn time_zero_without_inputs_is_base_plus_phase_offset() {
        let particle = Particle::at(Vec3::new(3.0, 1.0, -1.0));
        let params = MotionParams::default();
        let pos = advance(&particle, 0.0, &far_pointer(), &ScrollState::default(), &params);

        // phase 0: sin(0) = 0 on x and z, cos(0) = 1 on y
        assert_eq!(pos.x, 3.0);
        assert!((pos.y - (1.0 + params.wave_y.amplitude)).abs() < 1e-6);
        assert_eq!(pos.z, -1.0);
    }

    #[test]
    fn scroll_only_moves_z() {
        let particle = seeded_particle();
        let params = MotionParams::default();
        let still = advance(&particle, 3.0, &far_pointer(), &ScrollState::new(0.0), &params);
        let scrolled = advance(&particle, 3.0, &far_pointer(), &ScrollState::new(500.0), &params);

        assert_eq!(still.x, scrolled.x);
        assert_eq!(still.y, scrolled.y);
        assert!((still.z - scrolled.z - 1.0).abs() < 1e-5); // 500 * 0.001 * 2
    }

    #[test]
    fn drift_grows_with_time_on_the_plane() {
        let mut particle = Particle::at(Vec3::ZERO);
        particle.velocity_seed = Vec3::new(0.002, 0.0, 0.002);
        let params = MotionParams {
            wave_x: AxisWave::new(0.0, 0.0, 0.0),
            wave_y: AxisWave::new(0.0, 0.0, 0.0),
            wave_z: AxisWave::new(0.0, 0.0, 0.0),
            ..MotionParams::default()
        };
        let pos = advance(&particle, 100.0, &far_pointer(), &ScrollState::default(), &params);
        assert!((pos.x - 2.0).abs() < 1e-5);
        assert_eq!(pos.z, 0.0);
    }

    #[test]
    fn pointer_pushes_nearby_particle_away() {
        let pre = Vec3::new(0.1, 0.0, 0.0);
        let post = repel(pre, Vec3::ZERO, 2.5, 0.6);
        assert!(post.x > pre.x);
        assert_eq!(post.y, 0.0);
        assert_eq!(post.z, 0.0);
        // (1 - 0.1 / 2.5) * 0.6
        assert!((post.x - (0.1 + 0.576)).abs() < 1e-6);
    }

    #[test]
    fn repulsion_ignores_z_and_far_particles() {
        let far = Vec3::new(3.0, 0.0, 0.0);
        assert_eq!(repel(far, Vec3::ZERO, 2.5, 0.6), far);

        let deep = Vec3::new(0.0, 1.0, -50.0);
        let pushed = repel(deep, Vec3::ZERO, 2.5, 0.6);
        assert!(pushed.y > 1.0);
        assert_eq!(pushed.z, -50.0);
    }

    #[test]
    fn coincident_pointer_applies_no_force() {
        let p = Vec3::new(0.4, -0.2, 1.0);
        let out = repel(p, Vec3::new(0.4, -0.2, 0.0), 2.5, 0.6);
        assert_eq!(out, p);
        assert!(out.is_finite());
    }

    #[test]
    fn apply_writes_position_only() {
        let mut particle = seeded_particle();
        let before = particle;
        let params = MotionParams::default();
        apply(&mut particle, 2.0, &far_pointer(), &ScrollState::default(), &params);

        assert_eq!(particle.position, advance(&before, 2.0, &far_pointer(), &ScrollState::default(), &params));
        assert_eq!(particle.base_position, before.base_position);
        assert_eq!(particle.velocity_seed, before.velocity_seed);
    }
}
