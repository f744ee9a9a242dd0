//! Frame driver
//!
//! Every frame moves all particles and rewrites the point buffer. Every
//! `connection_interval` frames it also rebuilds the spatial grid and the
//! edge buffers. All buffers are allocated once in the constructor.

use crate::adjacency::{AdjacencyBuilder, EdgeBuffers, EdgeBuild};
use crate::config::{ConfigError, FieldConfig};
use crate::grid::SpatialGrid;
use crate::input::InputSnapshot;
use crate::motion::{self, MotionParams};
use crate::palette::point_colors;
use crate::particle::{create_entities, Particle, ParticleStore};
use crate::time::SimulationTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use synapse_metrics::{FrameTimer, Stage, StageProfiler};

/// Buffers changed since the renderer last looked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    pub points: bool,
    pub edges: bool,
}

impl DirtyFlags {
    pub fn any(&self) -> bool {
        self.points || self.edges
    }
}

/// Outcome of a single [`FrameDriver::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Frame number, starting at 1. Unchanged when stopped.
    pub frame: u64,
    /// Present when this frame rebuilt the edges.
    pub edges: Option<EdgeBuild>,
    pub stopped: bool,
}

/// Shared stop flag. Once set, the driver ignores further ticks.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

pub struct FrameDriver {
    particles: ParticleStore,
    grid: SpatialGrid,
    builder: AdjacencyBuilder,
    edges: EdgeBuffers,
    point_positions: Box<[f32]>,
    point_colors: Box<[f32]>,
    motion: MotionParams,
    connection_interval: u64,
    time: SimulationTime,
    dirty: DirtyFlags,
    stop: StopHandle,
    profiler: StageProfiler,
    frame_timer: FrameTimer,
}

impl FrameDriver {
    /// Sample a fresh field from `config`.
    pub fn new(config: &FieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let particles = create_entities(config.particle_count, &config.spawn, &mut rng);
        let colors = point_colors(particles.len(), &config.palette, &mut rng);
        Self::assemble(particles, colors, config)
    }

    /// Drive an existing particle set. Points are colored with the palette
    /// primary.
    pub fn from_particles(particles: ParticleStore, config: &FieldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let colors: Box<[f32]> = std::iter::repeat(config.palette.primary)
            .take(particles.len())
            .flatten()
            .collect();
        Self::assemble(particles, colors, config)
    }

    fn assemble(particles: ParticleStore, point_colors: Box<[f32]>, config: &FieldConfig) -> Result<Self, ConfigError> {
        let mut point_positions = vec![0.0; particles.len() * 3].into_boxed_slice();
        write_points(particles.as_slice(), &mut point_positions);

        let capacity = config.resolved_edge_capacity(particles.len());
        tracing::debug!(
            particles = particles.len(),
            edge_capacity = capacity,
            connection_distance = config.connection_distance,
            interval = config.connection_interval,
            "frame driver ready"
        );

        Ok(Self {
            grid: SpatialGrid::new(config.connection_distance),
            builder: AdjacencyBuilder::new(config.connection_distance, config.tint),
            edges: EdgeBuffers::with_capacity(capacity),
            point_positions,
            point_colors,
            motion: config.motion,
            connection_interval: u64::from(config.connection_interval),
            time: SimulationTime::new(),
            dirty: DirtyFlags::default(),
            stop: StopHandle::default(),
            profiler: StageProfiler::new(),
            frame_timer: FrameTimer::new(120),
            particles,
        })
    }

    /// Advance to `elapsed` since start.
    pub fn tick(&mut self, elapsed: Duration, input: &InputSnapshot) -> TickReport {
        if self.stop.is_stopped() {
            return TickReport {
                frame: self.time.frame_count(),
                edges: None,
                stopped: true,
            };
        }

        self.frame_timer.begin();
        let frame = self.time.advance_to(elapsed);
        let t = self.time.seconds();

        synapse_metrics::time_stage!(self.profiler, Stage::Motion, {
            let motion = &self.motion;
            let particles = self.particles.as_mut_slice();
            for (p, out) in particles.iter_mut().zip(self.point_positions.chunks_exact_mut(3)) {
                motion::apply(p, t, &input.pointer, &input.scroll, motion);
                out.copy_from_slice(&p.position.to_array());
            }
        });
        self.dirty.points = true;

        let edges = if frame % self.connection_interval == 0 {
            Some(self.rebuild_edges())
        } else {
            None
        };

        self.frame_timer.end();
        TickReport {
            frame,
            edges,
            stopped: false,
        }
    }

    /// Rebuild grid and edges from current positions regardless of the
    /// frame interval.
    pub fn rebuild_edges(&mut self) -> EdgeBuild {
        synapse_metrics::time_stage!(self.profiler, Stage::GridRebuild, {
            self.grid.rebuild(self.particles.as_slice());
        });
        let build = synapse_metrics::time_stage!(self.profiler, Stage::Adjacency, {
            self.builder.build(self.particles.as_slice(), &self.grid, &mut self.edges)
        });
        self.dirty.edges = true;
        tracing::trace!(edges = build.count, saturated = build.saturated, "edges rebuilt");
        build
    }

    /// Return and clear the dirty flags.
    pub fn take_dirty(&mut self) -> DirtyFlags {
        std::mem::take(&mut self.dirty)
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    /// Flat xyz per particle.
    pub fn point_positions(&self) -> &[f32] {
        &self.point_positions
    }

    /// Flat rgb per particle.
    pub fn point_colors(&self) -> &[f32] {
        &self.point_colors
    }

    pub fn edges(&self) -> &EdgeBuffers {
        &self.edges
    }

    /// Vertices of the edge buffer to draw.
    pub fn edge_draw_count(&self) -> usize {
        self.edges.draw_count()
    }

    pub fn frame(&self) -> u64 {
        self.time.frame_count()
    }

    pub fn simulation_seconds(&self) -> f32 {
        self.time.seconds()
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn profiler(&self) -> &StageProfiler {
        &self.profiler
    }

    pub fn frame_timer(&self) -> &FrameTimer {
        &self.frame_timer
    }
}

fn write_points(particles: &[Particle], out: &mut [f32]) {
    for (p, slot) in particles.iter().zip(out.chunks_exact_mut(3)) {
        slot.copy_from_slice(&p.position.to_array());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerState;
    use glam::Vec3;

    fn far_input() -> InputSnapshot {
        InputSnapshot {
            pointer: PointerState::at_world(Vec3::splat(1000.0)),
            ..InputSnapshot::default()
        }
    }

    fn frame(n: u64) -> Duration {
        Duration::from_micros(16_666 * n)
    }

    fn small_config() -> FieldConfig {
        FieldConfig::default().with_particle_count(120).with_seed(17)
    }

    #[test]
    fn starts_at_base_positions_with_no_edges() {
        let driver = FrameDriver::new(&small_config()).unwrap();
        assert_eq!(driver.frame(), 0);
        assert_eq!(driver.simulation_seconds(), 0.0);
        assert_eq!(driver.edge_draw_count(), 0);
        assert_eq!(driver.dirty(), DirtyFlags::default());
        assert_eq!(driver.point_positions().len(), 360);
        assert_eq!(driver.point_colors().len(), 360);
        for (p, xyz) in driver.particles().iter().zip(driver.point_positions().chunks_exact(3)) {
            assert_eq!(p.position, p.base_position);
            assert_eq!(xyz, &p.base_position.to_array());
        }
    }

    #[test]
    fn edges_rebuild_every_other_frame() {
        let mut driver = FrameDriver::new(&small_config()).unwrap();
        let input = far_input();

        let first = driver.tick(frame(1), &input);
        assert_eq!(first.frame, 1);
        assert!(first.edges.is_none());
        assert_eq!(driver.take_dirty(), DirtyFlags { points: true, edges: false });

        let second = driver.tick(frame(2), &input);
        assert!(second.edges.is_some());
        assert_eq!(driver.take_dirty(), DirtyFlags { points: true, edges: true });
        assert_eq!(driver.take_dirty(), DirtyFlags::default());

        let third = driver.tick(frame(3), &input);
        assert!(third.edges.is_none());
        assert!(driver.tick(frame(4), &input).edges.is_some());
    }

    #[test]
    fn point_buffer_mirrors_particle_positions() {
        let mut driver = FrameDriver::new(&small_config()).unwrap();
        driver.tick(Duration::from_secs(3), &far_input());
        assert_eq!(driver.simulation_seconds(), 3.0);
        for (p, xyz) in driver.particles().iter().zip(driver.point_positions().chunks_exact(3)) {
            assert_eq!(xyz, &p.position.to_array());
            assert_ne!(p.position, p.base_position);
        }
    }

    #[test]
    fn edge_count_matches_brute_force_after_rebuild() {
        let config = small_config();
        let mut driver = FrameDriver::new(&config).unwrap();
        let input = far_input();
        driver.tick(frame(1), &input);
        let report = driver.tick(frame(2), &input).edges.unwrap();

        let d2 = config.connection_distance * config.connection_distance;
        let ps = driver.particles();
        let mut pairs = 0;
        for i in 0..ps.len() {
            for j in i + 1..ps.len() {
                if ps[i].position.distance_squared(ps[j].position) < d2 {
                    pairs += 1;
                }
            }
        }
        assert_eq!(report.count, pairs.min(config.resolved_edge_capacity(ps.len())));
        assert_eq!(driver.edge_draw_count(), report.count * 2);
    }

    #[test]
    fn default_edge_capacity_tracks_driven_particles() {
        let store = ParticleStore::from_particles(
            (0..1000).map(|i| Particle::at(Vec3::new(i as f32, 0.0, 0.0))).collect(),
        );
        let driver = FrameDriver::from_particles(store, &FieldConfig::default()).unwrap();
        assert_eq!(driver.edges().capacity(), 3000);

        let store = ParticleStore::from_particles(vec![Particle::at(Vec3::ZERO); 4]);
        let driver = FrameDriver::from_particles(store, &FieldConfig::default()).unwrap();
        assert_eq!(driver.edges().capacity(), 12);
    }

    #[test]
    fn scenario_pairs_follow_particle_moves() {
        let store = ParticleStore::from_particles(vec![
            Particle::at(Vec3::new(0.0, 0.0, 0.0)),
            Particle::at(Vec3::new(0.5, 0.0, 0.0)),
            Particle::at(Vec3::new(5.0, 5.0, 5.0)),
            Particle::at(Vec3::new(5.5, 5.0, 5.0)),
        ]);
        let config = FieldConfig {
            connection_distance: 1.0,
            ..FieldConfig::default()
        };
        let mut driver = FrameDriver::from_particles(store, &config).unwrap();
        assert_eq!(driver.rebuild_edges().count, 2);

        driver.particles.as_mut_slice()[1].position = Vec3::splat(10.0);
        assert_eq!(driver.rebuild_edges().count, 1);
        assert_eq!(driver.edge_draw_count(), 2);
    }

    #[test]
    fn stop_handle_freezes_the_field() {
        let mut driver = FrameDriver::new(&small_config()).unwrap();
        let handle = driver.stop_handle();
        driver.tick(frame(1), &far_input());
        let snapshot = driver.point_positions().to_vec();
        driver.take_dirty();

        handle.stop();
        let report = driver.tick(frame(2), &far_input());
        assert!(report.stopped);
        assert_eq!(report.frame, 1);
        assert!(driver.is_stopped());
        assert_eq!(driver.point_positions(), snapshot.as_slice());
        assert!(!driver.dirty().any());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = FieldConfig {
            connection_interval: 0,
            ..FieldConfig::default()
        };
        assert!(matches!(FrameDriver::new(&config), Err(ConfigError::ZeroInterval)));
    }

    #[test]
    fn empty_field_ticks() {
        let mut driver = FrameDriver::new(&FieldConfig::default().with_particle_count(0)).unwrap();
        driver.tick(frame(1), &far_input());
        let report = driver.tick(frame(2), &far_input());
        assert_eq!(report.edges, Some(EdgeBuild::default()));
        assert!(driver.point_positions().is_empty());
    }

    #[cfg(feature = "metrics")]
    #[test]
    fn stages_are_profiled() {
        let mut driver = FrameDriver::new(&small_config()).unwrap();
        for n in 1..=4 {
            driver.tick(frame(n), &far_input());
        }
        assert_eq!(driver.profiler().timing(Stage::Motion).calls, 4);
        assert_eq!(driver.profiler().timing(Stage::Adjacency).calls, 2);
        assert_eq!(driver.frame_timer().frames(), 4);
    }
}
