//! SPH smoothing kernels
//!
//! Three radially symmetric kernel families, each with value, gradient and
//! Laplacian, all with compact support of radius `h`:
//! - `Poly6` for density and the colour field
//! - `Spiky` for pressure
//! - `Viscosity` for viscous diffusion
//!
//! Evaluating any of them at `r >= h` yields the additive identity; the
//! force pipeline relies on that hard cutoff and never clamps again.

mod poly6;
mod spiky;
mod viscosity;

pub use poly6::Poly6;
pub use spiky::Spiky;
pub use viscosity::Viscosity;

use serde::{Deserialize, Serialize};

use crate::math::SphVector;

/// Radially symmetric smoothing kernel with compact support
pub trait Kernel<V: SphVector> {
    fn smoothing_length(&self) -> f32;

    /// Recompute the normalisation constants for a new support radius
    fn adjust_smoothing_length(&mut self, h: f32);

    /// Kernel value at distance `r`
    fn base(&self, r: f32) -> f32;

    /// Gradient with respect to the separation vector `rvec = x_i − x_j`
    fn gradient(&self, rvec: V) -> V;

    /// Scalar Laplacian at distance `r`
    fn laplacian(&self, r: f32) -> f32;
}

/// Kernel families available for each role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    Poly6,
    Spiky,
    Viscosity,
}

/// Physical term a kernel is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelRole {
    /// Density and colour field
    Density,
    Pressure,
    Viscous,
}

/// A kernel of any family, dispatched by tag
#[derive(Debug, Clone)]
pub enum SmoothingKernel<V> {
    Poly6(Poly6<V>),
    Spiky(Spiky<V>),
    Viscosity(Viscosity<V>),
}

impl<V: SphVector> SmoothingKernel<V> {
    pub fn new(kind: KernelKind, h: f32) -> Self {
        match kind {
            KernelKind::Poly6 => SmoothingKernel::Poly6(Poly6::new(h)),
            KernelKind::Spiky => SmoothingKernel::Spiky(Spiky::new(h)),
            KernelKind::Viscosity => SmoothingKernel::Viscosity(Viscosity::new(h)),
        }
    }

    pub fn kind(&self) -> KernelKind {
        match self {
            SmoothingKernel::Poly6(_) => KernelKind::Poly6,
            SmoothingKernel::Spiky(_) => KernelKind::Spiky,
            SmoothingKernel::Viscosity(_) => KernelKind::Viscosity,
        }
    }

    /// Kernel value from a squared distance. Poly6 skips the square root.
    #[inline]
    pub fn base_sq(&self, r_sq: f32) -> f32 {
        match self {
            SmoothingKernel::Poly6(k) => k.base_sq(r_sq),
            other => other.base(r_sq.sqrt()),
        }
    }
}

impl<V: SphVector> Kernel<V> for SmoothingKernel<V> {
    fn smoothing_length(&self) -> f32 {
        match self {
            SmoothingKernel::Poly6(k) => k.smoothing_length(),
            SmoothingKernel::Spiky(k) => k.smoothing_length(),
            SmoothingKernel::Viscosity(k) => k.smoothing_length(),
        }
    }

    fn adjust_smoothing_length(&mut self, h: f32) {
        match self {
            SmoothingKernel::Poly6(k) => k.adjust_smoothing_length(h),
            SmoothingKernel::Spiky(k) => k.adjust_smoothing_length(h),
            SmoothingKernel::Viscosity(k) => k.adjust_smoothing_length(h),
        }
    }

    #[inline]
    fn base(&self, r: f32) -> f32 {
        match self {
            SmoothingKernel::Poly6(k) => k.base(r),
            SmoothingKernel::Spiky(k) => k.base(r),
            SmoothingKernel::Viscosity(k) => k.base(r),
        }
    }

    #[inline]
    fn gradient(&self, rvec: V) -> V {
        match self {
            SmoothingKernel::Poly6(k) => k.gradient(rvec),
            SmoothingKernel::Spiky(k) => k.gradient(rvec),
            SmoothingKernel::Viscosity(k) => k.gradient(rvec),
        }
    }

    #[inline]
    fn laplacian(&self, r: f32) -> f32 {
        match self {
            SmoothingKernel::Poly6(k) => k.laplacian(r),
            SmoothingKernel::Spiky(k) => k.laplacian(r),
            SmoothingKernel::Viscosity(k) => k.laplacian(r),
        }
    }
}

/// Kernel selection per role, as read from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub density: KernelKind,
    pub pressure: KernelKind,
    pub viscous: KernelKind,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            density: KernelKind::Poly6,
            pressure: KernelKind::Spiky,
            viscous: KernelKind::Viscosity,
        }
    }
}

/// One kernel per role, always sharing the same smoothing length
#[derive(Debug, Clone)]
pub struct KernelSet<V> {
    pub density: SmoothingKernel<V>,
    pub pressure: SmoothingKernel<V>,
    pub viscous: SmoothingKernel<V>,
}

impl<V: SphVector> KernelSet<V> {
    pub fn new(config: KernelConfig, h: f32) -> Self {
        Self {
            density: SmoothingKernel::new(config.density, h),
            pressure: SmoothingKernel::new(config.pressure, h),
            viscous: SmoothingKernel::new(config.viscous, h),
        }
    }

    /// Resize all three kernels together
    pub fn adjust_smoothing_length(&mut self, h: f32) {
        self.density.adjust_smoothing_length(h);
        self.pressure.adjust_smoothing_length(h);
        self.viscous.adjust_smoothing_length(h);
    }

    pub fn set(&mut self, role: KernelRole, kind: KernelKind) {
        let h = self.density.smoothing_length();
        let kernel = SmoothingKernel::new(kind, h);
        match role {
            KernelRole::Density => self.density = kernel,
            KernelRole::Pressure => self.pressure = kernel,
            KernelRole::Viscous => self.viscous = kernel,
        }
    }

    pub fn get(&self, role: KernelRole) -> &SmoothingKernel<V> {
        match role {
            KernelRole::Density => &self.density,
            KernelRole::Pressure => &self.pressure,
            KernelRole::Viscous => &self.viscous,
        }
    }

    pub fn config(&self) -> KernelConfig {
        KernelConfig {
            density: self.density.kind(),
            pressure: self.pressure.kind(),
            viscous: self.viscous.kind(),
        }
    }
}
