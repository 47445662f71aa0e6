//! Boundary interactors
//!
//! A boundary is stateless geometry the fluid system queries once per
//! particle per pass. The system only ever talks to the `BoundaryInteractor`
//! trait, so new shapes plug in without touching the force pipeline.

mod box_boundary;
mod factory;

pub use box_boundary::{BoxBoundary, FaceSign};
pub use factory::{build_boundary, BoundaryDescriptor};

use crate::math::SphVector;
use crate::particle::Particle;

pub trait BoundaryInteractor<V: SphVector>: std::fmt::Debug {
    /// Shape name, for logging
    fn name(&self) -> &str;

    /// Separation from the particle to the nearest point of the exclusion
    /// surface. Used directly as `rvec` in kernel evaluation: a length below
    /// the smoothing length means the boundary interacts with the particle.
    fn direction_to(&self, particle: &Particle<V>) -> V;

    /// Push an escaped particle back into the permitted region and reflect
    /// its velocity. Must be idempotent.
    fn enforce(&self, particle: &mut Particle<V>, rvec: V);

    /// Extra density contribution on top of the generic wall term
    fn apply_density(&self, _particle: &mut Particle<V>, _rvec: V) {}

    /// Extra force contribution on top of the generic wall terms
    fn apply_force(&self, _particle: &mut Particle<V>, _rvec: V) {}

    fn is_active(&self) -> bool;

    fn set_active(&mut self, active: bool);
}
