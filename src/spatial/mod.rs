//! Neighbour search for the density pass
//!
//! `SpatialGrid` buckets particles by cell; `grid_pairs` walks it with a
//! half-stencil and `brute_force_pairs` is the all-pairs reference. Both
//! return the same canonical, sorted pair list.

mod grid;
mod neighbours;

pub use grid::SpatialGrid;
pub use neighbours::{brute_force_pairs, grid_pairs, NeighbourPair, NeighbourStrategy};
