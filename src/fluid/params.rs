use serde::{Deserialize, Serialize};

use crate::constants::{defaults, limits};

/// How the pairwise pressure term combines the two particles' pressures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureTerm {
    /// `(p_i + p_j) / 2 · m² / (ρ_i ρ_j)`
    #[default]
    Averaged,
    /// `m² (p_i / ρ_i² + p_j / ρ_j²)`
    Symmetric,
}

/// Global tunables of one fluid system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidParams {
    pub rest_density: f32,
    /// Pressure stiffness `k` of the linear equation of state
    pub stiffness: f32,
    pub viscosity: f32,
    pub surface_tension: f32,
    /// Colour-field gradient magnitude above which surface tension applies
    pub color_field_threshold: f32,
    /// Uniform particle mass
    pub particle_mass: f32,
    pub smoothing_length: f32,
    /// Per-second velocity decay factor in `[0, 1]`
    pub velocity_decay: f32,
    pub use_gravity: bool,
    /// Divide the equation of state by the rest density
    pub normalize_pressure: bool,
    pub pressure_term: PressureTerm,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            rest_density: defaults::REST_DENSITY,
            stiffness: defaults::STIFFNESS,
            viscosity: defaults::VISCOSITY,
            surface_tension: defaults::SURFACE_TENSION,
            color_field_threshold: defaults::COLOR_FIELD_THRESHOLD,
            particle_mass: defaults::PARTICLE_MASS,
            smoothing_length: defaults::SMOOTHING_LENGTH,
            velocity_decay: defaults::VELOCITY_DECAY,
            use_gravity: true,
            normalize_pressure: false,
            pressure_term: PressureTerm::default(),
        }
    }
}

/// Clamp `value` into `[min, max]`. A non-finite value is rejected and
/// `current` is kept instead.
pub(crate) fn clamp_param(name: &str, value: f32, min: f32, max: f32, current: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("Ignoring non-finite {}: {}", name, value);
        return current;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{} {} out of range [{}, {}], clamped to {}", name, value, min, max, clamped);
    }
    clamped
}

impl FluidParams {
    /// Copy with every tunable clamped into its valid range. Non-finite
    /// values fall back to the defaults.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        Self {
            rest_density: clamp_param(
                "rest density",
                self.rest_density,
                limits::REST_DENSITY_MIN,
                limits::REST_DENSITY_MAX,
                d.rest_density,
            ),
            stiffness: clamp_param("stiffness", self.stiffness, limits::STIFFNESS_MIN, limits::STIFFNESS_MAX, d.stiffness),
            viscosity: clamp_param("viscosity", self.viscosity, limits::VISCOSITY_MIN, limits::VISCOSITY_MAX, d.viscosity),
            surface_tension: clamp_param(
                "surface tension",
                self.surface_tension,
                limits::SURFACE_TENSION_MIN,
                limits::SURFACE_TENSION_MAX,
                d.surface_tension,
            ),
            color_field_threshold: clamp_param(
                "color field threshold",
                self.color_field_threshold,
                limits::COLOR_FIELD_THRESHOLD_MIN,
                limits::COLOR_FIELD_THRESHOLD_MAX,
                d.color_field_threshold,
            ),
            particle_mass: clamp_param(
                "particle mass",
                self.particle_mass,
                limits::PARTICLE_MASS_MIN,
                f32::MAX,
                d.particle_mass,
            ),
            smoothing_length: clamp_param(
                "smoothing length",
                self.smoothing_length,
                limits::SMOOTHING_LENGTH_MIN,
                limits::SMOOTHING_LENGTH_MAX,
                d.smoothing_length,
            ),
            velocity_decay: clamp_param("velocity decay", self.velocity_decay, 0.0, 1.0, d.velocity_decay),
            use_gravity: self.use_gravity,
            normalize_pressure: self.normalize_pressure,
            pressure_term: self.pressure_term,
        }
    }

    /// Linear equation of state. Negative in rarefied regions.
    #[inline]
    pub fn pressure_for(&self, density: f32) -> f32 {
        let pressure = self.stiffness * (density - self.rest_density);
        if self.normalize_pressure {
            pressure / self.rest_density
        } else {
            pressure
        }
    }
}
