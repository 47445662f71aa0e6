/// Uniform bucket grid over the simulation domain
///
/// Cell edge equals the smoothing length, so every particle within `h` of
/// another sits in the same cell or in one of the immediately adjacent cells.
/// Buckets hold particle indices and are cleared and refilled once per step.
///
/// Neighbour cells are visited through a fixed half-stencil: 4 offsets in 2D,
/// 13 in 3D, chosen so that every adjacent cell pair is covered exactly once
/// over the whole grid. Cells on the domain edge disable the offsets that
/// would leave the grid through a per-cell bitmask.

use crate::constants::limits::MAX_GRID_CELLS;
use crate::error::{invalid_parameter, SphResult};
use crate::math::SphVector;

const MAX_AXES: usize = 3;

/// One entry of the half-stencil
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NeighbourOffset {
    delta: [i32; MAX_AXES],
    linear: isize,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid<V> {
    extents: V,
    cell_size: f32,
    dims: [usize; MAX_AXES],
    buckets: Vec<Vec<usize>>,
    offsets: Vec<NeighbourOffset>,
    /// Per axis, the offsets stepping to the lower neighbour on that axis
    low_edge_masks: [u32; MAX_AXES],
    /// Per axis, the offsets stepping to the upper neighbour on that axis
    high_edge_masks: [u32; MAX_AXES],
    len: usize,
    generation: u64,
}

impl<V: SphVector> SpatialGrid<V> {
    /// Fails if the domain would need more than `MAX_GRID_CELLS` cells
    pub fn new(extents: V, cell_size: f32) -> SphResult<Self> {
        let dims = Self::compute_dims(extents, cell_size)?;
        let offsets = Self::half_stencil(dims);

        let mut low_edge_masks = [0u32; MAX_AXES];
        let mut high_edge_masks = [0u32; MAX_AXES];
        for (bit, offset) in offsets.iter().enumerate() {
            for axis in 0..MAX_AXES {
                match offset.delta[axis] {
                    -1 => low_edge_masks[axis] |= 1 << bit,
                    1 => high_edge_masks[axis] |= 1 << bit,
                    _ => {}
                }
            }
        }

        Ok(Self {
            extents,
            cell_size,
            dims,
            buckets: vec![Vec::new(); dims.iter().product()],
            offsets,
            low_edge_masks,
            high_edge_masks,
            len: 0,
            generation: 0,
        })
    }

    /// `ceil(extent / cell_size)` cells on every used axis, at least one.
    /// The total is bounded by `MAX_GRID_CELLS`.
    fn compute_dims(extents: V, cell_size: f32) -> SphResult<[usize; MAX_AXES]> {
        let too_many = || {
            invalid_parameter(
                "grid",
                format!(
                    "{:?} with cell size {} needs more than {} cells",
                    extents, cell_size, MAX_GRID_CELLS
                ),
            )
        };

        let mut dims = [1usize; MAX_AXES];
        for (axis, dim) in dims.iter_mut().enumerate().take(V::DIM) {
            let cells = (extents.component(axis) / cell_size).ceil();
            if cells > MAX_GRID_CELLS as f32 {
                return Err(too_many());
            }
            *dim = if cells.is_finite() && cells >= 1.0 { cells as usize } else { 1 };
        }

        let total = dims.iter().try_fold(1usize, |acc, &dim| acc.checked_mul(dim));
        match total {
            Some(total) if total <= MAX_GRID_CELLS => Ok(dims),
            _ => Err(too_many()),
        }
    }

    /// Offsets whose first non-zero component (x, then y, then z) is +1
    fn half_stencil(dims: [usize; MAX_AXES]) -> Vec<NeighbourOffset> {
        let range = |axis: usize| if axis < V::DIM { -1..=1 } else { 0..=0 };
        let mut offsets = Vec::with_capacity(13);
        for dx in range(0) {
            for dy in range(1) {
                for dz in range(2) {
                    let delta = [dx, dy, dz];
                    let leading = delta.iter().copied().find(|d| *d != 0);
                    if leading == Some(1) {
                        offsets.push(NeighbourOffset {
                            delta,
                            linear: Self::linear_offset(dims, delta),
                        });
                    }
                }
            }
        }
        offsets
    }

    fn linear_offset(dims: [usize; MAX_AXES], delta: [i32; MAX_AXES]) -> isize {
        delta[0] as isize
            + delta[1] as isize * dims[0] as isize
            + delta[2] as isize * (dims[0] * dims[1]) as isize
    }

    /// Recompute the layout for new extents or cell size.
    ///
    /// Buckets are reallocated when the dimensions change and emptied either
    /// way; the caller refills them. Returns true if the dimensions changed.
    /// On error the grid is left untouched.
    pub fn resize(&mut self, extents: V, cell_size: f32) -> SphResult<bool> {
        let dims = Self::compute_dims(extents, cell_size)?;
        self.extents = extents;
        self.cell_size = cell_size;
        let changed = dims != self.dims;
        if changed {
            log::debug!("Resizing spatial grid from {:?} to {:?} cells", self.dims, dims);
            self.dims = dims;
            self.buckets = vec![Vec::new(); dims.iter().product()];
            for offset in &mut self.offsets {
                offset.linear = Self::linear_offset(dims, offset.delta);
            }
            self.len = 0;
        } else {
            self.clear_buckets();
        }
        self.generation += 1;
        Ok(changed)
    }

    fn clear_buckets(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Empty every bucket, keeping their allocations
    pub fn clear(&mut self) {
        self.clear_buckets();
        self.generation += 1;
    }

    /// Clear and refill from the current particle positions
    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = V>,
    {
        self.clear_buckets();
        for (index, position) in positions.into_iter().enumerate() {
            let cell = self.cell_index(self.cell_coords(position));
            self.buckets[cell].push(index);
            self.len += 1;
        }
        self.generation += 1;
    }

    pub fn insert(&mut self, index: usize, position: V) {
        let cell = self.cell_index(self.cell_coords(position));
        self.buckets[cell].push(index);
        self.len += 1;
        self.generation += 1;
    }

    /// Cell coordinates of a position. Out-of-domain positions land in the
    /// nearest edge cell; the clamp is monotone so adjacency is preserved.
    pub fn cell_coords(&self, position: V) -> [usize; MAX_AXES] {
        let mut coords = [0usize; MAX_AXES];
        for (axis, coord) in coords.iter_mut().enumerate().take(V::DIM) {
            let cell = (position.component(axis) / self.cell_size).floor();
            let max = (self.dims[axis] - 1) as f32;
            // NaN fails both comparisons and ends up in cell 0
            *coord = if cell >= max {
                self.dims[axis] - 1
            } else if cell > 0.0 {
                cell as usize
            } else {
                0
            };
        }
        coords
    }

    pub fn cell_index(&self, coords: [usize; MAX_AXES]) -> usize {
        (coords[2] * self.dims[1] + coords[1]) * self.dims[0] + coords[0]
    }

    fn coords_of(&self, index: usize) -> [usize; MAX_AXES] {
        let x = index % self.dims[0];
        let y = (index / self.dims[0]) % self.dims[1];
        let z = index / (self.dims[0] * self.dims[1]);
        [x, y, z]
    }

    /// Bitmask over the half-stencil with out-of-grid offsets cleared
    fn edge_mask(&self, coords: [usize; MAX_AXES]) -> u32 {
        let mut mask = (1u32 << self.offsets.len()) - 1;
        for axis in 0..MAX_AXES {
            if coords[axis] == 0 {
                mask &= !self.low_edge_masks[axis];
            }
            if coords[axis] + 1 == self.dims[axis] {
                mask &= !self.high_edge_masks[axis];
            }
        }
        mask
    }

    /// Visit every unordered pair of particles sharing a cell or sitting in
    /// adjacent cells, each exactly once. No distance test is applied.
    pub fn for_each_candidate_pair<F>(&self, mut visit: F)
    where
        F: FnMut(usize, usize),
    {
        for (cell_index, bucket) in self.buckets.iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            let mask = self.edge_mask(self.coords_of(cell_index));

            for (j, &particle) in bucket.iter().enumerate() {
                for &other in &bucket[j + 1..] {
                    visit(particle, other);
                }

                for (bit, offset) in self.offsets.iter().enumerate() {
                    if mask & (1 << bit) == 0 {
                        continue;
                    }
                    let neighbour = (cell_index as isize + offset.linear) as usize;
                    for &other in &self.buckets[neighbour] {
                        visit(particle, other);
                    }
                }
            }
        }
    }

    pub fn dims(&self) -> [usize; MAX_AXES] {
        self.dims
    }

    pub fn cell_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn extents(&self) -> V {
        self.extents
    }

    /// Number of entries across all buckets
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Particle indices stored in one cell; empty past the last cell
    pub fn bucket(&self, cell_index: usize) -> &[usize] {
        self.buckets.get(cell_index).map_or(&[], Vec::as_slice)
    }

    /// Size of the half-stencil (4 in 2D, 13 in 3D)
    pub fn stencil_len(&self) -> usize {
        self.offsets.len()
    }

    /// Incremented by every mutation (insert, clear, rebuild, resize)
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_stencil_sizes() {
        assert_eq!(SpatialGrid::new(Vec2::splat(4.0), 1.0).expect("valid grid").stencil_len(), 4);
        assert_eq!(SpatialGrid::new(Vec3::splat(4.0), 1.0).expect("valid grid").stencil_len(), 13);
    }

    #[test]
    fn test_dims_round_up() {
        let grid = SpatialGrid::new(Vec3::new(2.5, 1.0, 0.2), 1.0).expect("valid grid");
        assert_eq!(grid.dims(), [3, 1, 1]);
        assert_eq!(grid.cell_count(), 3);

        let flat = SpatialGrid::new(Vec2::new(3.0, 2.0), 0.5).expect("valid grid");
        assert_eq!(flat.dims(), [6, 4, 1]);
    }

    #[test]
    fn test_out_of_domain_positions_clamp_to_edge_cells() {
        let grid = SpatialGrid::new(Vec2::new(3.0, 3.0), 1.0).expect("valid grid");
        assert_eq!(grid.cell_coords(Vec2::new(-5.0, 1.5)), [0, 1, 0]);
        assert_eq!(grid.cell_coords(Vec2::new(3.0, 100.0)), [2, 2, 0]);
        assert_eq!(grid.cell_coords(Vec2::new(f32::NAN, 0.5)), [0, 0, 0]);
    }

    #[test]
    fn test_every_adjacent_cell_pair_visited_once() {
        // One particle per cell: candidate pairs are exactly the adjacent cell pairs
        let grid_extent = Vec3::new(4.0, 3.0, 2.0);
        let mut grid = SpatialGrid::new(grid_extent, 1.0).expect("valid grid");
        let [nx, ny, nz] = grid.dims();
        let mut positions = Vec::new();
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    positions.push(Vec3::new(x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5));
                }
            }
        }
        grid.rebuild(positions.iter().copied());

        let mut visited = std::collections::HashSet::new();
        grid.for_each_candidate_pair(|a, b| {
            let key = (a.min(b), a.max(b));
            assert!(visited.insert(key), "pair {:?} visited twice", key);
        });

        let mut expected = 0;
        for a in 0..positions.len() {
            for b in a + 1..positions.len() {
                let d = positions[a] - positions[b];
                if d.abs().max_element() <= 1.0 {
                    expected += 1;
                    assert!(visited.contains(&(a, b)), "missing pair ({}, {})", a, b);
                }
            }
        }
        assert_eq!(visited.len(), expected);
    }

    #[test]
    fn test_resize_reallocates_only_on_dimension_change() {
        let mut grid = SpatialGrid::new(Vec2::splat(4.0), 1.0).expect("valid grid");
        grid.insert(0, Vec2::new(0.5, 0.5));
        assert_eq!(grid.len(), 1);

        assert!(!grid.resize(Vec2::splat(4.0), 1.0).expect("valid grid"));
        assert!(grid.is_empty());

        assert!(grid.resize(Vec2::splat(4.0), 0.5).expect("valid grid"));
        assert_eq!(grid.dims(), [8, 8, 1]);
        assert_eq!(grid.cell_count(), 64);
    }

    #[test]
    fn test_rejects_oversized_grid() {
        assert!(SpatialGrid::new(Vec3::splat(1.0e7), 0.5).is_err());
        assert!(SpatialGrid::new(Vec3::splat(1000.0), 0.5).is_err());
        assert!(SpatialGrid::new(Vec2::new(1.0e9, 1.0), 0.1).is_err());
        assert_eq!(SpatialGrid::new(Vec3::splat(10.0), 0.5).expect("valid grid").cell_count(), 8000);
    }

    #[test]
    fn test_failed_resize_leaves_grid_untouched() {
        let mut grid = SpatialGrid::new(Vec3::splat(100.0), 1.0).expect("valid grid");
        grid.insert(0, Vec3::splat(50.0));
        let generation = grid.generation();

        assert!(grid.resize(Vec3::splat(100.0), 0.001).is_err());
        assert_eq!(grid.dims(), [100, 100, 100]);
        assert_eq!(grid.cell_size(), 1.0);
        assert_eq!(grid.extents(), Vec3::splat(100.0));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.generation(), generation);
    }

    #[test]
    fn test_rebuild_fills_expected_buckets() {
        let mut grid = SpatialGrid::new(Vec2::new(3.0, 2.0), 1.0).expect("valid grid");
        assert_eq!(grid.extents(), Vec2::new(3.0, 2.0));

        let positions = [Vec2::new(0.5, 0.5), Vec2::new(2.5, 1.5), Vec2::new(0.2, 0.9)];
        grid.rebuild(positions.iter().copied());

        for (index, &position) in positions.iter().enumerate() {
            let cell = grid.cell_index(grid.cell_coords(position));
            assert!(grid.bucket(cell).contains(&index));
        }
        assert_eq!(grid.bucket(grid.cell_index([0, 0, 0])), &[0, 2]);
        assert!(grid.bucket(grid.cell_index([1, 0, 0])).is_empty());
        assert!(grid.bucket(grid.cell_count()).is_empty());
    }

    #[test]
    fn test_generation_tracks_mutations() {
        let mut grid = SpatialGrid::new(Vec2::splat(2.0), 1.0).expect("valid grid");
        let start = grid.generation();
        grid.insert(0, Vec2::ZERO);
        grid.rebuild([Vec2::ZERO, Vec2::ONE]);
        assert_eq!(grid.generation(), start + 2);
        assert_eq!(grid.len(), 2);
    }
}
