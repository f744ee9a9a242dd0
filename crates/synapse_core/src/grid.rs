//! Uniform spatial grid for neighbour lookups.
//!
//! Particles are bucketed by `floor(position / cell_size)`. With the cell
//! size equal to the connection distance, the 3×3×3 block of cells around a
//! point holds every particle closer than that distance, so a neighbourhood
//! query replaces an all-pairs scan.

use crate::math::cell_coord;
use crate::particle::Particle;
use glam::{IVec3, Vec3};
use std::collections::HashMap;

/// Offsets of the 27 cells around (and including) a centre cell.
const NEIGHBORHOOD: [IVec3; 27] = {
    let mut offsets = [IVec3::ZERO; 27];
    let mut i = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                offsets[i] = IVec3::new(dx, dy, dz);
                i += 1;
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    offsets
};

/// Hash grid from integer cell coordinates to particle indices.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    /// Map from cell coordinates to the particles in that cell.
    cells: HashMap<IVec3, Vec<u32>>,
    /// Emptied cell lists kept for reuse so rebuilds stop allocating once warm.
    spare: Vec<Vec<u32>>,
    len: usize,
}

impl SpatialGrid {
    /// Create an empty grid. `cell_size` must be positive and finite.
    pub fn new(cell_size: f32) -> Self {
        debug_assert!(cell_size.is_finite() && cell_size > 0.0, "invalid cell size {cell_size}");
        Self {
            cell_size,
            cells: HashMap::new(),
            spare: Vec::new(),
            len: 0,
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of indexed entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Cell containing `position`.
    #[inline]
    pub fn cell_of(&self, position: Vec3) -> IVec3 {
        cell_coord(position, self.cell_size)
    }

    /// Indices stored in one cell.
    pub fn cell(&self, coord: IVec3) -> &[u32] {
        self.cells.get(&coord).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove every entry. Cell lists are recycled, not freed.
    pub fn clear(&mut self) {
        for (_, mut list) in self.cells.drain() {
            list.clear();
            self.spare.push(list);
        }
        self.len = 0;
    }

    /// Append `index` to the cell containing `position`.
    pub fn insert(&mut self, index: u32, position: Vec3) {
        let coord = self.cell_of(position);
        let spare = &mut self.spare;
        self.cells
            .entry(coord)
            .or_insert_with(|| spare.pop().unwrap_or_default())
            .push(index);
        self.len += 1;
    }

    /// Clear and re-insert all particles in index order.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        self.clear();
        for (i, p) in particles.iter().enumerate() {
            self.insert(i as u32, p.position);
        }
    }

    /// Write the union of the 27 cells around `position` into `out`.
    ///
    /// `out` is cleared first. Order follows cell offsets, then insertion
    /// order within each cell.
    pub fn query_neighborhood_into(&self, position: Vec3, out: &mut Vec<u32>) {
        out.clear();
        let center = self.cell_of(position);
        for offset in NEIGHBORHOOD {
            let Some(cell) = offset_cell(center, offset) else {
                continue;
            };
            if let Some(list) = self.cells.get(&cell) {
                out.extend_from_slice(list);
            }
        }
    }

    /// Allocating variant of [`query_neighborhood_into`](Self::query_neighborhood_into).
    pub fn query_neighborhood(&self, position: Vec3) -> Vec<u32> {
        let mut out = Vec::new();
        self.query_neighborhood_into(position, &mut out);
        out
    }
}

/// `center + offset`, or `None` past the edge of the `i32` cell range.
/// Far-out positions saturate into the boundary cells, which have no
/// neighbours beyond them.
#[inline]
fn offset_cell(center: IVec3, offset: IVec3) -> Option<IVec3> {
    Some(IVec3::new(
        center.x.checked_add(offset.x)?,
        center.y.checked_add(offset.y)?,
        center.z.checked_add(offset.z)?,
    ))
}
