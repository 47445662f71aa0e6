/// Fluid system orchestrator
///
/// Owns the particles, the kernel set, the spatial grid and the boundary
/// list, and runs the per-step pipeline in a fixed order:
/// reset → neighbours → density → pressure → pair forces → boundary forces
/// → surface tension → integration → boundary enforcement → re-bucket.
///
/// Tunables are only changed through the clamping setters below. A step
/// never fails; numerical trouble comes back as diagnostics in the report.

use glam::{Vec2, Vec3};

use super::diagnostics::{self, StabilityDiagnostic, StepReport};
use super::forces;
use super::integration;
use super::params::{clamp_param, FluidParams};
use crate::boundary::{build_boundary, BoundaryInteractor};
use crate::config::SimulationConfig;
use crate::constants::{defaults, limits};
use crate::error::{dimension_mismatch, invalid_parameter, SphResult};
use crate::kernel::{KernelConfig, KernelKind, KernelRole, KernelSet};
use crate::math::SphVector;
use crate::particle::Particle;
use crate::spatial::{brute_force_pairs, grid_pairs, NeighbourPair, NeighbourStrategy, SpatialGrid};

pub type FluidSystem2d = FluidSystem<Vec2>;
pub type FluidSystem3d = FluidSystem<Vec3>;

/// Gravity pointing down the last axis (y in 2D, z in 3D)
fn default_gravity<V: SphVector>() -> V {
    let components: &[f32] = if V::DIM == 2 {
        &defaults::GRAVITY_2D
    } else {
        &defaults::GRAVITY_3D
    };
    V::from_slice(components).unwrap_or(V::ZERO)
}

#[derive(Debug)]
pub struct FluidSystem<V: SphVector> {
    params: FluidParams,
    extents: V,
    gravity: V,
    particles: Vec<Particle<V>>,
    kernels: KernelSet<V>,
    grid: SpatialGrid<V>,
    boundaries: Vec<Box<dyn BoundaryInteractor<V>>>,
    /// Neighbour pairs of the last step, reused as scratch
    pairs: Vec<NeighbourPair<V>>,
    strategy: NeighbourStrategy,
    steps: u64,
}

impl<V: SphVector> FluidSystem<V> {
    /// Create an empty system over the domain `[0, extents]`.
    ///
    /// Parameters are clamped into their valid ranges. Fails if any extent
    /// is non-finite or not positive.
    pub fn new(extents: V, params: FluidParams) -> SphResult<Self> {
        if (0..V::DIM).any(|axis| {
            let extent = extents.component(axis);
            !extent.is_finite() || extent <= 0.0
        }) {
            return Err(invalid_parameter(
                "domain extents",
                format!("{:?} must be finite and positive on every axis", extents),
            ));
        }

        let params = params.sanitized();
        let kernels = KernelSet::new(KernelConfig::default(), params.smoothing_length);
        let grid = SpatialGrid::new(extents, params.smoothing_length)?;
        log::info!(
            "Created {}D fluid system over {:?} with {:?} grid cells",
            V::DIM,
            extents,
            grid.dims()
        );

        Ok(Self {
            params,
            extents,
            gravity: default_gravity(),
            particles: Vec::new(),
            kernels,
            grid,
            boundaries: Vec::new(),
            pairs: Vec::new(),
            strategy: NeighbourStrategy::default(),
            steps: 0,
        })
    }

    /// Create an empty system from a loaded configuration, building its
    /// boundaries through the factory
    pub fn from_config(config: &SimulationConfig) -> SphResult<Self> {
        let extents = match &config.domain.extents {
            Some(values) => {
                V::from_slice(values).ok_or_else(|| dimension_mismatch("domain extents", V::DIM, values.len()))?
            }
            None => V::splat(defaults::DOMAIN_EXTENT),
        };

        let mut system = Self::new(extents, config.fluid.clone())?;
        system.kernels = KernelSet::new(config.kernels, system.params.smoothing_length);
        system.strategy = config.neighbour_strategy;

        if let Some(values) = &config.domain.gravity {
            let gravity = V::from_slice(values).ok_or_else(|| dimension_mismatch("gravity", V::DIM, values.len()))?;
            if !gravity.is_finite() {
                return Err(invalid_parameter("gravity", "components must be finite"));
            }
            system.gravity = gravity;
        }

        for descriptor in &config.boundaries {
            system.add_boundary(build_boundary(descriptor)?);
        }
        Ok(system)
    }

    // ---- Particles ----

    /// Add one particle at rest density. The position is clamped into the
    /// domain; a non-finite position or velocity is refused.
    pub fn spawn_particle(&mut self, position: V, velocity: V) -> Option<usize> {
        if !position.is_finite() || !velocity.is_finite() {
            log::warn!("Refusing to spawn particle at {:?} with velocity {:?}", position, velocity);
            return None;
        }
        let position = position.clamp_within(V::ZERO, self.extents);
        let index = self.particles.len();
        self.particles.push(Particle::new(
            position,
            velocity,
            self.params.rest_density,
            self.params.particle_mass,
        ));
        if self.strategy == NeighbourStrategy::Grid {
            self.grid.insert(index, position);
        }
        Some(index)
    }

    /// Fill `[min, max]` with a regular lattice of particles `spacing` apart.
    /// Returns the number spawned.
    pub fn spawn_block(&mut self, min: V, max: V, spacing: f32, velocity: V) -> usize {
        if !spacing.is_finite() || spacing <= 0.0 {
            log::warn!("Ignoring particle block with spacing {}", spacing);
            return 0;
        }

        let mut counts = [1usize; 3];
        for (axis, count) in counts.iter_mut().enumerate().take(V::DIM) {
            let span = max.component(axis) - min.component(axis);
            if !span.is_finite() || span < 0.0 {
                log::warn!("Ignoring particle block {:?} .. {:?}", min, max);
                return 0;
            }
            let cells = (span / spacing + 1e-4).floor();
            if cells >= limits::MAX_BLOCK_PARTICLES as f32 {
                log::warn!("Ignoring particle block {:?} .. {:?} at spacing {}", min, max, spacing);
                return 0;
            }
            *count = cells as usize + 1;
        }

        let total = match counts.iter().try_fold(1usize, |acc, &count| acc.checked_mul(count)) {
            Some(total) if total <= limits::MAX_BLOCK_PARTICLES => total,
            _ => {
                log::warn!("Ignoring particle block {:?} .. {:?} at spacing {}", min, max, spacing);
                return 0;
            }
        };
        self.particles.reserve(total);
        let mut spawned = 0;
        for linear in 0..total {
            let mut position = min;
            let mut rest = linear;
            for (axis, count) in counts.iter().enumerate().take(V::DIM) {
                let step = (rest % count) as f32;
                rest /= count;
                position.set_component(axis, min.component(axis) + step * spacing);
            }
            if self.spawn_particle(position, velocity).is_some() {
                spawned += 1;
            }
        }

        log::info!("Spawned block of {} particles ({} total)", spawned, self.particles.len());
        spawned
    }

    /// Remove every particle
    pub fn clear_particles(&mut self) {
        self.particles.clear();
        self.pairs.clear();
        self.grid.clear();
        log::info!("Cleared all particles");
    }

    // ---- Stepping ----

    /// Advance the simulation by `dt` seconds.
    ///
    /// An empty system, or a non-positive or non-finite `dt`, is a no-op that
    /// touches neither the particles nor the grid.
    pub fn step(&mut self, dt: f32) -> StepReport {
        if self.particles.is_empty() {
            return StepReport::skipped();
        }
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Ignoring step with invalid time step {}", dt);
            return StepReport::skipped();
        }

        let h = self.params.smoothing_length;
        let mass = self.params.particle_mass;

        forces::reset_accumulators(&mut self.particles);
        match self.strategy {
            NeighbourStrategy::Grid => grid_pairs(&self.grid, &self.particles, h, &mut self.pairs),
            NeighbourStrategy::BruteForce => brute_force_pairs(&self.particles, h, &mut self.pairs),
        }

        forces::accumulate_density(&mut self.particles, &self.pairs, &self.kernels, &self.boundaries, mass);
        forces::update_pressure(&mut self.particles, &self.params);
        forces::accumulate_pair_forces(&mut self.particles, &self.pairs, &self.kernels, &self.params);
        forces::apply_boundary_forces(&mut self.particles, &self.kernels, &self.boundaries, &self.params);
        forces::apply_surface_tension(&mut self.particles, &self.params);

        let gravity = if self.params.use_gravity { self.gravity } else { V::ZERO };
        integration::integrate(&mut self.particles, dt, gravity, mass, self.params.velocity_decay);
        integration::enforce_boundaries(&mut self.particles, &self.boundaries);

        if self.strategy == NeighbourStrategy::Grid {
            self.grid.rebuild(self.particles.iter().map(|p| p.position));
        }

        self.steps += 1;
        let diagnostics = diagnostics::scan(&self.particles);
        diagnostics::log_diagnostics(&diagnostics, self.steps);
        log::trace!(
            "Step {}: {} particles, {} pairs, dt {}",
            self.steps,
            self.particles.len(),
            self.pairs.len(),
            dt
        );

        StepReport {
            advanced: true,
            pairs: self.pairs.len(),
            diagnostics,
        }
    }

    /// Check every particle for non-finite state without stepping
    pub fn validate(&self) -> Vec<StabilityDiagnostic> {
        diagnostics::scan(&self.particles)
    }

    // ---- Tunables ----

    pub fn set_rest_density(&mut self, value: f32) {
        let p = &mut self.params;
        p.rest_density = clamp_param(
            "rest density",
            value,
            limits::REST_DENSITY_MIN,
            limits::REST_DENSITY_MAX,
            p.rest_density,
        );
        log::info!("Rest density set to {}", p.rest_density);
    }

    pub fn set_stiffness(&mut self, value: f32) {
        let p = &mut self.params;
        p.stiffness = clamp_param("stiffness", value, limits::STIFFNESS_MIN, limits::STIFFNESS_MAX, p.stiffness);
        log::info!("Stiffness set to {}", p.stiffness);
    }

    pub fn set_viscosity(&mut self, value: f32) {
        let p = &mut self.params;
        p.viscosity = clamp_param("viscosity", value, limits::VISCOSITY_MIN, limits::VISCOSITY_MAX, p.viscosity);
        log::info!("Viscosity set to {}", p.viscosity);
    }

    pub fn set_surface_tension(&mut self, value: f32) {
        let p = &mut self.params;
        p.surface_tension = clamp_param(
            "surface tension",
            value,
            limits::SURFACE_TENSION_MIN,
            limits::SURFACE_TENSION_MAX,
            p.surface_tension,
        );
        log::info!("Surface tension set to {}", p.surface_tension);
    }

    pub fn set_color_field_threshold(&mut self, value: f32) {
        let p = &mut self.params;
        p.color_field_threshold = clamp_param(
            "color field threshold",
            value,
            limits::COLOR_FIELD_THRESHOLD_MIN,
            limits::COLOR_FIELD_THRESHOLD_MAX,
            p.color_field_threshold,
        );
        log::info!("Color field threshold set to {}", p.color_field_threshold);
    }

    /// Change the support radius: reconfigures all kernels, resizes the grid
    /// and re-buckets the particles. A radius whose grid would exceed the
    /// cell limit is refused and the current one kept.
    pub fn set_smoothing_length(&mut self, value: f32) {
        let h = clamp_param(
            "smoothing length",
            value,
            limits::SMOOTHING_LENGTH_MIN,
            limits::SMOOTHING_LENGTH_MAX,
            self.params.smoothing_length,
        );
        if let Err(e) = self.grid.resize(self.extents, h) {
            log::warn!("Keeping smoothing length {}: {}", self.params.smoothing_length, e);
            return;
        }
        self.params.smoothing_length = h;
        self.kernels.adjust_smoothing_length(h);
        if self.strategy == NeighbourStrategy::Grid {
            self.grid.rebuild(self.particles.iter().map(|p| p.position));
        }
        log::info!("Smoothing length set to {} ({:?} grid cells)", h, self.grid.dims());
    }

    pub fn set_use_gravity(&mut self, enabled: bool) {
        self.params.use_gravity = enabled;
        log::info!("Gravity {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn toggle_gravity(&mut self) -> bool {
        self.set_use_gravity(!self.params.use_gravity);
        self.params.use_gravity
    }

    pub fn set_gravity(&mut self, gravity: V) {
        if !gravity.is_finite() {
            log::warn!("Ignoring non-finite gravity {:?}", gravity);
            return;
        }
        self.gravity = gravity;
        log::info!("Gravity set to {:?}", gravity);
    }

    /// Swap the kernel used for one role, keeping the smoothing length
    pub fn set_kernel(&mut self, role: KernelRole, kind: KernelKind) {
        self.kernels.set(role, kind);
        log::debug!("{:?} kernel set to {:?}", role, kind);
    }

    pub fn set_neighbour_strategy(&mut self, strategy: NeighbourStrategy) {
        if strategy == self.strategy {
            return;
        }
        self.strategy = strategy;
        if strategy == NeighbourStrategy::Grid {
            self.grid.rebuild(self.particles.iter().map(|p| p.position));
        }
        log::info!("Neighbour strategy set to {:?}", strategy);
    }

    // ---- Boundaries ----

    pub fn add_boundary(&mut self, boundary: Box<dyn BoundaryInteractor<V>>) {
        log::info!("Added {} boundary", boundary.name());
        self.boundaries.push(boundary);
    }

    /// Flip a boundary between active and inactive. Returns the new state,
    /// or `None` for an unknown index.
    pub fn toggle_boundary(&mut self, index: usize) -> Option<bool> {
        let boundary = self.boundaries.get_mut(index)?;
        let active = !boundary.is_active();
        boundary.set_active(active);
        log::info!(
            "{} boundary {} {}",
            boundary.name(),
            index,
            if active { "activated" } else { "deactivated" }
        );
        Some(active)
    }

    pub fn boundaries(&self) -> &[Box<dyn BoundaryInteractor<V>>] {
        &self.boundaries
    }

    // ---- Read-only views ----

    pub fn particles(&self) -> &[Particle<V>] {
        &self.particles
    }

    pub fn positions(&self) -> impl Iterator<Item = V> + '_ {
        self.particles.iter().map(|p| p.position)
    }

    pub fn densities(&self) -> impl Iterator<Item = f32> + '_ {
        self.particles.iter().map(|p| p.density)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn params(&self) -> &FluidParams {
        &self.params
    }

    pub fn rest_density(&self) -> f32 {
        self.params.rest_density
    }

    pub fn stiffness(&self) -> f32 {
        self.params.stiffness
    }

    pub fn viscosity(&self) -> f32 {
        self.params.viscosity
    }

    pub fn surface_tension(&self) -> f32 {
        self.params.surface_tension
    }

    pub fn color_field_threshold(&self) -> f32 {
        self.params.color_field_threshold
    }

    pub fn smoothing_length(&self) -> f32 {
        self.params.smoothing_length
    }

    pub fn use_gravity(&self) -> bool {
        self.params.use_gravity
    }

    pub fn gravity(&self) -> V {
        self.gravity
    }

    pub fn extents(&self) -> V {
        self.extents
    }

    pub fn kernels(&self) -> &KernelSet<V> {
        &self.kernels
    }

    pub fn neighbour_strategy(&self) -> NeighbourStrategy {
        self.strategy
    }

    /// Pairs found by the last step
    pub fn neighbour_pairs(&self) -> &[NeighbourPair<V>] {
        &self.pairs
    }

    pub fn grid(&self) -> &SpatialGrid<V> {
        &self.grid
    }

    /// Number of steps actually advanced
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Radius of a disc holding one particle's mass at rest density, for
    /// renderers sizing particle sprites
    pub fn unit_radius(&self) -> f32 {
        (self.params.particle_mass / (self.params.rest_density * std::f32::consts::PI)).sqrt()
    }

    pub fn log_parameters(&self) {
        let p = &self.params;
        log::info!("=== Fluid parameters ({}D, {} particles) ===", V::DIM, self.particles.len());
        log::info!("  Rest density: {}", p.rest_density);
        log::info!("  Stiffness: {}", p.stiffness);
        log::info!("  Viscosity: {}", p.viscosity);
        log::info!("  Surface tension: {}", p.surface_tension);
        log::info!("  Color field threshold: {}", p.color_field_threshold);
        log::info!("  Smoothing length: {}", p.smoothing_length);
        log::info!("  Particle mass: {}", p.particle_mass);
        log::info!("  Gravity: {:?} ({})", self.gravity, if p.use_gravity { "on" } else { "off" });
        log::info!("  Kernels: {:?}", self.kernels.config());
        log::info!("  Neighbour search: {:?}", self.strategy);
    }
}
