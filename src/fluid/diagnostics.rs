//! Post-step stability validation
//!
//! A non-finite value after a step means the numerical model went unstable
//! (stiffness too high, smoothing length too small, or time step too large
//! for the kernel support). It is reported, not fatal: boundary clamping in
//! later steps can mask a transient excursion.

use std::fmt;

use crate::constants::stability::MAX_LOGGED_DIAGNOSTICS;
use crate::math::SphVector;
use crate::particle::Particle;

/// Particle quantity that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Density,
    Pressure,
    Force,
    Velocity,
    Position,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::Density => "density",
            Quantity::Pressure => "pressure",
            Quantity::Force => "force",
            Quantity::Velocity => "velocity",
            Quantity::Position => "position",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityDiagnostic {
    pub index: usize,
    pub quantity: Quantity,
}

impl fmt::Display for StabilityDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "particle {} has non-finite {}", self.index, self.quantity)
    }
}

/// Outcome of one call to `FluidSystem::step`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Whether the pipeline ran at all (false for empty systems or bad dt)
    pub advanced: bool,
    /// Neighbour pairs found by the density pass
    pub pairs: usize,
    pub diagnostics: Vec<StabilityDiagnostic>,
}

impl StepReport {
    pub fn skipped() -> Self {
        Self::default()
    }

    pub fn is_stable(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Check every particle for non-finite state
pub fn scan<V: SphVector>(particles: &[Particle<V>]) -> Vec<StabilityDiagnostic> {
    let mut diagnostics = Vec::new();
    for (index, particle) in particles.iter().enumerate() {
        let checks = [
            (Quantity::Density, particle.density.is_finite()),
            (Quantity::Pressure, particle.pressure.is_finite()),
            (Quantity::Force, particle.force.is_finite()),
            (Quantity::Velocity, particle.velocity.is_finite()),
            (Quantity::Position, particle.position.is_finite()),
        ];
        for (quantity, ok) in checks {
            if !ok {
                diagnostics.push(StabilityDiagnostic { index, quantity });
            }
        }
    }
    diagnostics
}

/// Warn about the first few diagnostics of a step
pub fn log_diagnostics(diagnostics: &[StabilityDiagnostic], step: u64) {
    if diagnostics.is_empty() {
        return;
    }
    for diagnostic in diagnostics.iter().take(MAX_LOGGED_DIAGNOSTICS) {
        log::warn!("Step {}: {}", step, diagnostic);
    }
    if diagnostics.len() > MAX_LOGGED_DIAGNOSTICS {
        log::warn!(
            "Step {}: {} more stability diagnostics suppressed",
            step,
            diagnostics.len() - MAX_LOGGED_DIAGNOSTICS
        );
    }
}
