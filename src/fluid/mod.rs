//! SPH fluid simulation
//!
//! `FluidSystem` is the only stateful type here. The passes it runs each
//! step live in `forces` and `integration` as free functions over the
//! particle slice, and `diagnostics` checks the result.

pub mod diagnostics;
pub mod forces;
pub mod integration;
mod params;
mod system;

pub use diagnostics::{Quantity, StabilityDiagnostic, StepReport};
pub use params::{FluidParams, PressureTerm};
pub use system::{FluidSystem, FluidSystem2d, FluidSystem3d};
