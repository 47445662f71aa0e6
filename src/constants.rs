//! SPH Engine Constants
//!
//! Numeric constants shared by the kernels, the force pipeline and the
//! parameter setters. Grouped the same way the setters and passes use them.

/// Parameter limits enforced by the `FluidSystem` setters
pub mod limits {
    pub const REST_DENSITY_MIN: f32 = 0.0001;
    pub const REST_DENSITY_MAX: f32 = 100.0;

    pub const STIFFNESS_MIN: f32 = 0.00001;
    pub const STIFFNESS_MAX: f32 = 1000.0;

    pub const VISCOSITY_MIN: f32 = 0.0000001;
    pub const VISCOSITY_MAX: f32 = 10.0;

    pub const SMOOTHING_LENGTH_MIN: f32 = 0.1;
    pub const SMOOTHING_LENGTH_MAX: f32 = 10.0;

    pub const COLOR_FIELD_THRESHOLD_MIN: f32 = 0.005;
    pub const COLOR_FIELD_THRESHOLD_MAX: f32 = 5.0;

    pub const SURFACE_TENSION_MIN: f32 = 0.005;
    pub const SURFACE_TENSION_MAX: f32 = 5.0;

    /// Smallest mass a particle may carry; zero mass would divide the force
    /// accumulator by zero during integration.
    pub const PARTICLE_MASS_MIN: f32 = 0.000001;

    /// Largest number of cells the spatial grid may allocate
    pub const MAX_GRID_CELLS: usize = 1 << 24;

    /// Largest number of particles a single `spawn_block` call may create
    pub const MAX_BLOCK_PARTICLES: usize = 1 << 24;
}

/// Defaults used by `FluidParams::default()`
pub mod defaults {
    pub const REST_DENSITY: f32 = 1.0;
    pub const STIFFNESS: f32 = 3.0;
    pub const VISCOSITY: f32 = 0.5;
    pub const SURFACE_TENSION: f32 = 0.05;
    pub const COLOR_FIELD_THRESHOLD: f32 = 0.075;
    pub const PARTICLE_MASS: f32 = 0.1;
    pub const SMOOTHING_LENGTH: f32 = 0.5;
    /// Per-second velocity decay; 1.0 leaves velocities undamped
    pub const VELOCITY_DECAY: f32 = 1.0;

    /// Domain edge length on every axis when a configuration gives none
    pub const DOMAIN_EXTENT: f32 = 10.0;

    pub const GRAVITY_2D: [f32; 2] = [0.0, -9.81];
    pub const GRAVITY_3D: [f32; 3] = [0.0, 0.0, -9.81];

    pub const BOUNDARY_DISTANCE: f32 = 0.05;
    pub const BOUNDARY_DAMPENING: f32 = 0.5;
}

/// Numerical stabilisation of the force pass
pub mod stability {
    /// Per-axis component of the offset substituted for coincident particles.
    /// Pairs closer than the length of that offset are redirected onto it.
    pub const DEGENERATE_AXIS_OFFSET: f32 = 0.001;

    /// Colour-field gradients shorter than this are treated as this long
    /// when normalising the surface-tension direction.
    pub const MIN_GRADIENT_LENGTH: f32 = 0.000001;

    /// Fraction of the particle's own pressure a wall pushes back with
    /// (walls are pressure-free mirrors, so the pair average halves it).
    pub const BOUNDARY_PRESSURE_SCALE: f32 = 0.5;

    /// Maximum number of stability diagnostics logged after a single step
    pub const MAX_LOGGED_DIAGNOSTICS: usize = 8;
}
