//! Entity store: the fixed particle array
//!
//! Particles are sampled once at startup and never added or removed. Only
//! `position` changes afterwards, written by the motion model each frame.

use crate::math::{sample_in_box, sample_symmetric};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::ops::Index;

/// One node of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position, rewritten every frame.
    pub position: Vec3,
    /// Anchor the oscillation is centred on.
    pub base_position: Vec3,
    /// Small constant drift direction.
    pub velocity_seed: Vec3,
    /// Oscillation phase offset in radians.
    pub phase: f32,
    /// Oscillation speed multiplier.
    pub speed: f32,
}

impl Particle {
    /// Particle at rest on `base_position` with no drift.
    pub fn at(base_position: Vec3) -> Self {
        Self {
            position: base_position,
            base_position,
            velocity_seed: Vec3::ZERO,
            phase: 0.0,
            speed: 1.0,
        }
    }
}

/// Sampling ranges for [`create_entities`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Base positions are drawn from `[-half_extents, half_extents)`.
    pub half_extents: [f32; 3],
    /// Per-axis bound of the drift seed.
    pub velocity_range: f32,
    pub speed_min: f32,
    pub speed_max: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            half_extents: [7.0, 5.0, 4.0],
            velocity_range: 0.002,
            speed_min: 0.3,
            speed_max: 1.0,
        }
    }
}

impl SpawnConfig {
    pub fn half_extents(&self) -> Vec3 {
        Vec3::from_array(self.half_extents)
    }

    /// Whether `point` lies inside the sampling box.
    pub fn contains(&self, point: Vec3) -> bool {
        let half = self.half_extents().abs();
        point.abs().cmple(half).all()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        let base_position = sample_in_box(rng, self.half_extents());
        let velocity_seed = Vec3::new(
            sample_symmetric(rng, self.velocity_range),
            sample_symmetric(rng, self.velocity_range),
            sample_symmetric(rng, self.velocity_range),
        );
        let phase = rng.gen::<f32>() * TAU;
        let speed = self.speed_min + rng.gen::<f32>() * (self.speed_max - self.speed_min);

        Particle {
            position: base_position,
            base_position,
            velocity_seed,
            phase,
            speed,
        }
    }
}

/// Fixed-length particle array. There is no API to grow or shrink it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleStore {
    particles: Box<[Particle]>,
}

impl ParticleStore {
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self {
            particles: particles.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}

impl Index<usize> for ParticleStore {
    type Output = Particle;

    fn index(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
}

/// Sample `n` independent particles. Each starts at its base position.
pub fn create_entities<R: Rng + ?Sized>(n: usize, config: &SpawnConfig, rng: &mut R) -> ParticleStore {
    let particles: Vec<Particle> = (0..n).map(|_| config.sample(rng)).collect();
    tracing::debug!(count = n, half_extents = ?config.half_extents, "spawned particle field");
    ParticleStore::from_particles(particles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn creates_exact_count_inside_bounds() {
        let config = SpawnConfig::default();
        let mut rng = StdRng::seed_from_u64(1);

        for n in [0usize, 1, 7, 400] {
            let store = create_entities(n, &config, &mut rng);
            assert_eq!(store.len(), n);
            assert_eq!(store.is_empty(), n == 0);
            for p in store.iter() {
                assert!(config.contains(p.base_position), "{:?} outside bounds", p.base_position);
                assert_eq!(p.position, p.base_position);
            }
        }
    }

    #[test]
    fn seeds_stay_in_their_ranges() {
        let config = SpawnConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        let store = create_entities(256, &config, &mut rng);

        for p in store.iter() {
            assert!(p.velocity_seed.abs().max_element() <= config.velocity_range);
            assert!((0.0..TAU).contains(&p.phase));
            assert!(p.speed >= config.speed_min && p.speed <= config.speed_max);
        }
    }

    #[test]
    fn custom_bounds_are_respected() {
        let config = SpawnConfig {
            half_extents: [1.0, 0.5, 0.0],
            ..SpawnConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let store = create_entities(64, &config, &mut rng);
        assert!(store.iter().all(|p| config.contains(p.base_position)));
        assert!(store.iter().all(|p| p.base_position.z == 0.0));
    }
}
