use serde::{Deserialize, Serialize};

use super::SpatialGrid;
use crate::math::SphVector;
use crate::particle::Particle;

/// Two particles closer than the smoothing length.
///
/// Always stored with `first < second` and `rvec = x_first − x_second`, so the
/// force pass can reuse the separation without another subtraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighbourPair<V> {
    pub first: usize,
    pub second: usize,
    pub rvec: V,
    pub r_sq: f32,
}

/// How the density pass finds neighbour pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighbourStrategy {
    /// Uniform grid with half-stencil traversal
    #[default]
    Grid,
    /// All-pairs O(n²) scan
    BruteForce,
}

#[inline]
fn make_pair<V: SphVector>(particles: &[Particle<V>], a: usize, b: usize, h_sq: f32) -> Option<NeighbourPair<V>> {
    let (first, second) = if a < b { (a, b) } else { (b, a) };
    let rvec = particles[first].position - particles[second].position;
    let r_sq = rvec.length_squared();
    (r_sq < h_sq).then_some(NeighbourPair {
        first,
        second,
        rvec,
        r_sq,
    })
}

/// Collect all pairs within `h` using the grid.
///
/// The grid must have been rebuilt from these particles. Output is sorted by
/// `(first, second)`, the same order `brute_force_pairs` produces, so sums
/// over either list accumulate identically.
pub fn grid_pairs<V: SphVector>(
    grid: &SpatialGrid<V>,
    particles: &[Particle<V>],
    h: f32,
    out: &mut Vec<NeighbourPair<V>>,
) {
    out.clear();
    let h_sq = h * h;
    grid.for_each_candidate_pair(|a, b| {
        if let Some(pair) = make_pair(particles, a, b, h_sq) {
            out.push(pair);
        }
    });
    out.sort_unstable_by_key(|pair| (pair.first, pair.second));
}

/// Collect all pairs within `h` by testing every pair
pub fn brute_force_pairs<V: SphVector>(particles: &[Particle<V>], h: f32, out: &mut Vec<NeighbourPair<V>>) {
    out.clear();
    let h_sq = h * h;
    for first in 0..particles.len() {
        for second in first + 1..particles.len() {
            if let Some(pair) = make_pair(particles, first, second, h_sq) {
                out.push(pair);
            }
        }
    }
}
