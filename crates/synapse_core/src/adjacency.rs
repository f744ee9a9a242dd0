//! Adjacency builder: turns close particle pairs into line geometry.
//!
//! Edges are written into two fixed-capacity float buffers (endpoint
//! positions and endpoint colors) that the renderer uploads as-is. When more
//! pairs are in range than the buffers hold, the extra pairs are dropped.

use crate::grid::SpatialGrid;
use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Floats per edge slot: two endpoints of three components.
pub const FLOATS_PER_EDGE: usize = 6;

/// Endpoint colors of an edge before distance fading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeTint {
    /// RGB at the lower-index endpoint.
    pub start: [f32; 3],
    /// RGB at the higher-index endpoint.
    pub end: [f32; 3],
    /// Overall brightness applied on top of the distance fade.
    pub intensity: f32,
}

impl Default for EdgeTint {
    fn default() -> Self {
        Self {
            start: [0.66, 0.33, 0.97],
            end: [0.23, 0.51, 0.96],
            intensity: 0.15,
        }
    }
}

/// Pre-allocated edge geometry plus the number of valid edges.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeBuffers {
    positions: Box<[f32]>,
    colors: Box<[f32]>,
    capacity: usize,
    count: usize,
}

impl EdgeBuffers {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: vec![0.0; capacity * FLOATS_PER_EDGE].into_boxed_slice(),
            colors: vec![0.0; capacity * FLOATS_PER_EDGE].into_boxed_slice(),
            capacity,
            count: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Edges written by the last build.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Vertices to draw: two per valid edge.
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.count * 2
    }

    /// Full position buffer, including zeroed slots past [`count`](Self::count).
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Full color buffer, including zeroed slots past [`count`](Self::count).
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Endpoints of edge `slot`, if it is valid.
    pub fn edge(&self, slot: usize) -> Option<(Vec3, Vec3)> {
        if slot >= self.count {
            return None;
        }
        let s = &self.positions[slot * FLOATS_PER_EDGE..(slot + 1) * FLOATS_PER_EDGE];
        Some((Vec3::new(s[0], s[1], s[2]), Vec3::new(s[3], s[4], s[5])))
    }

    #[inline]
    fn is_full(&self, written: usize) -> bool {
        written >= self.capacity
    }

    #[inline]
    fn write(&mut self, slot: usize, a: Vec3, b: Vec3, fade: f32, tint: &EdgeTint) {
        let idx = slot * FLOATS_PER_EDGE;
        self.positions[idx..idx + 3].copy_from_slice(&a.to_array());
        self.positions[idx + 3..idx + 6].copy_from_slice(&b.to_array());

        let c = fade * tint.intensity;
        let start = Vec3::from_array(tint.start) * c;
        let end = Vec3::from_array(tint.end) * c;
        self.colors[idx..idx + 3].copy_from_slice(&start.to_array());
        self.colors[idx + 3..idx + 6].copy_from_slice(&end.to_array());
    }

    /// Zero every slot from `count` on and record `count` as valid.
    fn truncate(&mut self, count: usize) {
        let start = count * FLOATS_PER_EDGE;
        self.positions[start..].fill(0.0);
        self.colors[start..].fill(0.0);
        self.count = count;
    }
}

/// Result of one adjacency pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeBuild {
    pub count: usize,
    /// Capacity was reached and the scan stopped early.
    pub saturated: bool,
}

/// Scans the grid for pairs closer than `connection_distance`.
///
/// Holds the neighbourhood scratch list so repeated builds do not allocate.
#[derive(Debug, Clone)]
pub struct AdjacencyBuilder {
    connection_distance: f32,
    tint: EdgeTint,
    scratch: Vec<u32>,
}

impl AdjacencyBuilder {
    pub fn new(connection_distance: f32, tint: EdgeTint) -> Self {
        Self {
            connection_distance,
            tint,
            scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn connection_distance(&self) -> f32 {
        self.connection_distance
    }

    /// Write one edge per unordered pair `(i, j)`, `i < j`, closer than the
    /// connection distance, stopping at the buffer capacity. `grid` must have
    /// been rebuilt from `particles` with a cell size of at least the
    /// connection distance.
    pub fn build(&mut self, particles: &[Particle], grid: &SpatialGrid, edges: &mut EdgeBuffers) -> EdgeBuild {
        debug_assert!(
            grid.cell_size() >= self.connection_distance,
            "grid cells ({}) smaller than connection distance ({})",
            grid.cell_size(),
            self.connection_distance
        );

        let max_dist = self.connection_distance;
        let max_dist_sq = max_dist * max_dist;
        let mut written = 0;
        let mut saturated = false;

        'scan: for (i, pi) in particles.iter().enumerate() {
            if edges.is_full(written) {
                saturated = true;
                break;
            }
            grid.query_neighborhood_into(pi.position, &mut self.scratch);

            for &j in &self.scratch {
                let j = j as usize;
                if j <= i {
                    continue;
                }
                let pj = &particles[j];
                let dist_sq = pi.position.distance_squared(pj.position);
                if dist_sq >= max_dist_sq {
                    continue;
                }

                let fade = 1.0 - dist_sq.sqrt() / max_dist;
                edges.write(written, pi.position, pj.position, fade, &self.tint);
                written += 1;

                if edges.is_full(written) {
                    saturated = true;
                    break 'scan;
                }
            }
        }

        edges.truncate(written);
        if saturated {
            tracing::trace!(capacity = edges.capacity(), "edge buffer saturated");
        }
        EdgeBuild {
            count: written,
            saturated,
        }
    }
}

/// One-shot build with the default tint.
pub fn build_edges(
    particles: &[Particle],
    grid: &SpatialGrid,
    connection_distance: f32,
    edges: &mut EdgeBuffers,
) -> EdgeBuild {
    AdjacencyBuilder::new(connection_distance, EdgeTint::default()).build(particles, grid, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{create_entities, SpawnConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn field(points: &[Vec3]) -> Vec<Particle> {
        points.iter().copied().map(Particle::at).collect()
    }

    fn build(particles: &[Particle], distance: f32, capacity: usize) -> (EdgeBuffers, EdgeBuild) {
        let mut grid = SpatialGrid::new(distance);
        grid.rebuild(particles);
        let mut edges = EdgeBuffers::with_capacity(capacity);
        let report = build_edges(particles, &grid, distance, &mut edges);
        (edges, report)
    }

    fn brute_force_pairs(particles: &[Particle], distance: f32) -> usize {
        let mut n = 0;
        for i in 0..particles.len() {
            for j in i + 1..particles.len() {
                if particles[i].position.distance_squared(particles[j].position) < distance * distance {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn two_separated_pairs_then_one() {
        let mut particles = field(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(5.0, 5.0, 5.0),
            Vec3::new(5.5, 5.0, 5.0),
        ]);
        let mut grid = SpatialGrid::new(1.0);
        let mut builder = AdjacencyBuilder::new(1.0, EdgeTint::default());
        let mut edges = EdgeBuffers::with_capacity(12);

        grid.rebuild(&particles);
        let report = builder.build(&particles, &grid, &mut edges);
        assert_eq!(report, EdgeBuild { count: 2, saturated: false });
        assert_eq!(edges.edge(0), Some((Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0))));
        assert_eq!(edges.edge(1), Some((Vec3::splat(5.0), Vec3::new(5.5, 5.0, 5.0))));

        particles[1].position = Vec3::splat(10.0);
        grid.rebuild(&particles);
        let report = builder.build(&particles, &grid, &mut edges);
        assert_eq!(report.count, 1);
        assert_eq!(edges.edge(0), Some((Vec3::splat(5.0), Vec3::new(5.5, 5.0, 5.0))));
        assert_eq!(edges.edge(1), None);
        assert!(edges.positions()[FLOATS_PER_EDGE..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn each_unordered_pair_is_emitted_once() {
        let config = SpawnConfig {
            half_extents: [3.0, 3.0, 3.0],
            ..SpawnConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2024);
        let store = create_entities(150, &config, &mut rng);
        let distance = 1.2;
        let (edges, report) = build(store.as_slice(), distance, 100_000);

        assert!(!report.saturated);
        assert_eq!(report.count, brute_force_pairs(store.as_slice(), distance));

        let mut seen = HashSet::new();
        for slot in 0..edges.count() {
            let (a, b) = edges.edge(slot).unwrap();
            let key = |v: Vec3| v.to_array().map(f32::to_bits);
            let (ka, kb) = (key(a), key(b));
            assert!(seen.insert((ka, kb)));
            assert!(!seen.contains(&(kb, ka)));
        }
    }

    #[test]
    fn saturates_at_capacity_and_zeroes_tail() {
        // Nine particles within 1 unit of each other: 36 pairs.
        let points: Vec<Vec3> = (0..9).map(|i| Vec3::new(i as f32 * 0.05, 0.0, 0.0)).collect();
        let particles = field(&points);
        assert_eq!(brute_force_pairs(&particles, 1.0), 36);

        let (edges, report) = build(&particles, 1.0, 10);
        assert_eq!(report, EdgeBuild { count: 10, saturated: true });
        assert_eq!(edges.draw_count(), 20);
        assert!(edges.positions().iter().all(|v| v.is_finite()));

        // Shrink the field so the same buffers end up mostly unused.
        let mut grid = SpatialGrid::new(1.0);
        let mut edges = edges;
        grid.rebuild(&particles[..3]);
        let report = build_edges(&particles[..3], &grid, 1.0, &mut edges);
        assert_eq!(report.count, 3);
        let tail = 3 * FLOATS_PER_EDGE;
        assert!(edges.positions()[tail..].iter().all(|&v| v == 0.0));
        assert!(edges.colors()[tail..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn closer_pairs_are_brighter() {
        let particles = field(&[
            Vec3::ZERO,
            Vec3::new(0.1, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(5.9, 0.0, 0.0),
        ]);
        let (edges, report) = build(&particles, 1.0, 4);
        assert_eq!(report.count, 2);

        let near = &edges.colors()[0..6];
        let far = &edges.colors()[6..12];
        assert!(near[0] > far[0]);

        let tint = EdgeTint::default();
        let expected = (1.0 - 0.1) * tint.intensity * tint.start[0];
        assert!((near[0] - expected).abs() < 1e-5);
        let expected_end = (1.0 - 0.1) * tint.intensity * tint.end[2];
        assert!((near[5] - expected_end).abs() < 1e-5);
    }

    #[test]
    fn pair_at_exact_distance_is_not_connected() {
        let particles = field(&[Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
        let (_, report) = build(&particles, 1.0, 4);
        assert_eq!(report.count, 0);
    }

    #[test]
    fn zero_capacity_and_empty_field() {
        let particles = field(&[Vec3::ZERO, Vec3::new(0.2, 0.0, 0.0)]);
        let (edges, report) = build(&particles, 1.0, 0);
        assert_eq!(report, EdgeBuild { count: 0, saturated: true });
        assert!(edges.positions().is_empty());

        let (_, report) = build(&[], 1.0, 8);
        assert_eq!(report, EdgeBuild::default());
    }
}
