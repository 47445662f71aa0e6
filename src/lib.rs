//! Smoothed Particle Hydrodynamics fluid engine for 2D and 3D.
//!
//! One generic implementation drives both dimensions through the
//! `SphVector` trait (`glam::Vec2` / `glam::Vec3`). Callers spawn particles,
//! attach boundaries, call `FluidSystem::step` once per frame and read back
//! positions and densities.

pub mod boundary;
pub mod config;
pub mod constants;
pub mod error;
pub mod fluid;
pub mod kernel;
pub mod math;
pub mod particle;
pub mod spatial;

pub use boundary::{build_boundary, BoundaryDescriptor, BoundaryInteractor, BoxBoundary, FaceSign};
pub use config::SimulationConfig;
pub use error::{SphError, SphResult};
pub use fluid::{
    FluidParams, FluidSystem, FluidSystem2d, FluidSystem3d, PressureTerm, Quantity, StabilityDiagnostic, StepReport,
};
pub use kernel::{Kernel, KernelConfig, KernelKind, KernelRole, KernelSet, SmoothingKernel};
pub use math::SphVector;
pub use particle::Particle;
pub use spatial::{NeighbourPair, NeighbourStrategy, SpatialGrid};
