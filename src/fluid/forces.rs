/// Density and force passes
///
/// Pure functions over the particle array, the neighbour pair list and the
/// boundary list, run by `FluidSystem::step` in a fixed order.
///
/// Forces are stored as `m·a` so every pairwise contribution is exactly equal
/// and opposite; integration divides by the uniform mass.

use super::params::{FluidParams, PressureTerm};
use crate::boundary::BoundaryInteractor;
use crate::constants::stability::{BOUNDARY_PRESSURE_SCALE, MIN_GRADIENT_LENGTH};
use crate::kernel::{Kernel, KernelSet};
use crate::math::SphVector;
use crate::particle::Particle;
use crate::spatial::NeighbourPair;

/// Mutable access to both particles of a canonical pair (`first < second`)
#[inline]
fn pair_mut<V>(particles: &mut [Particle<V>], first: usize, second: usize) -> (&mut Particle<V>, &mut Particle<V>) {
    debug_assert!(first < second);
    let (head, tail) = particles.split_at_mut(second);
    (&mut head[first], &mut tail[0])
}

/// Zero force and colour-field accumulators
pub fn reset_accumulators<V: SphVector>(particles: &mut [Particle<V>]) {
    for particle in particles.iter_mut() {
        particle.reset();
    }
}

/// Rebuild densities from scratch: mass baseline, then pairs, then walls
pub fn accumulate_density<V: SphVector>(
    particles: &mut [Particle<V>],
    pairs: &[NeighbourPair<V>],
    kernels: &KernelSet<V>,
    boundaries: &[Box<dyn BoundaryInteractor<V>>],
    mass: f32,
) {
    for particle in particles.iter_mut() {
        particle.density = mass;
    }

    for pair in pairs {
        let contribution = mass * kernels.density.base_sq(pair.r_sq);
        let (first, second) = pair_mut(particles, pair.first, pair.second);
        first.density += contribution;
        second.density += contribution;
    }

    let h_sq = kernels.density.smoothing_length().powi(2);
    for particle in particles.iter_mut() {
        for boundary in boundaries.iter().filter(|b| b.is_active()) {
            let rvec = boundary.direction_to(particle);
            let r_sq = rvec.length_squared();
            if r_sq < h_sq {
                particle.density += mass * kernels.density.base_sq(r_sq);
                boundary.apply_density(particle, rvec);
            }
        }
    }
}

/// Equation of state and derived volume
pub fn update_pressure<V: SphVector>(particles: &mut [Particle<V>], params: &FluidParams) {
    for particle in particles.iter_mut() {
        particle.pressure = params.pressure_for(particle.density);
        particle.volume = params.particle_mass / particle.density;
    }
}

/// Redirect a numerically coincident pair onto the fixed fallback offset.
/// The offset direction is arbitrary; the resulting push is not physical.
#[inline]
fn stabilised_separation<V: SphVector>(rvec: V, r_sq: f32) -> (V, f32) {
    let fallback = V::degenerate_offset();
    let fallback_len = fallback.length();
    let r = r_sq.sqrt();
    if r <= fallback_len {
        (fallback, fallback_len)
    } else {
        (rvec, r)
    }
}

/// Pressure, viscosity and colour-field contributions of every neighbour pair
pub fn accumulate_pair_forces<V: SphVector>(
    particles: &mut [Particle<V>],
    pairs: &[NeighbourPair<V>],
    kernels: &KernelSet<V>,
    params: &FluidParams,
) {
    let mass = params.particle_mass;
    let mass_sq = mass * mass;

    for pair in pairs {
        let (rvec, r) = stabilised_separation(pair.rvec, pair.r_sq);
        let (first, second) = pair_mut(particles, pair.first, pair.second);

        let pressure_scale = match params.pressure_term {
            PressureTerm::Averaged => 0.5 * (first.pressure + second.pressure) / (first.density * second.density),
            PressureTerm::Symmetric => {
                first.pressure / (first.density * first.density) + second.pressure / (second.density * second.density)
            }
        };
        let pressure_force = kernels.pressure.gradient(rvec) * (-mass_sq * pressure_scale);

        let viscous_force = (second.velocity - first.velocity)
            * (params.viscosity * mass_sq * kernels.viscous.laplacian(r) / (first.density * second.density));

        let total = pressure_force + viscous_force;
        first.force += total;
        second.force -= total;

        let color_gradient = kernels.density.gradient(rvec) * mass;
        first.color_gradient += color_gradient / second.density;
        second.color_gradient -= color_gradient / first.density;

        let color_laplacian = kernels.density.laplacian(r) * mass;
        first.color_laplacian += color_laplacian / second.density;
        second.color_laplacian += color_laplacian / first.density;
    }
}

/// Wall pressure and wall friction for every particle near an active boundary.
///
/// The wall acts as a stationary, pressure-free mirror particle with the
/// same density, so the pressure average halves the particle's own pressure
/// and the relative velocity is `−v`.
pub fn apply_boundary_forces<V: SphVector>(
    particles: &mut [Particle<V>],
    kernels: &KernelSet<V>,
    boundaries: &[Box<dyn BoundaryInteractor<V>>],
    params: &FluidParams,
) {
    let mass_sq = params.particle_mass * params.particle_mass;
    let h_sq = kernels.pressure.smoothing_length().powi(2);

    for particle in particles.iter_mut() {
        let density_sq = particle.density * particle.density;
        for boundary in boundaries.iter().filter(|b| b.is_active()) {
            let rvec = boundary.direction_to(particle);
            let r_sq = rvec.length_squared();
            if r_sq >= h_sq {
                continue;
            }
            let r = r_sq.sqrt();

            let pressure_force = kernels.pressure.gradient(rvec)
                * (BOUNDARY_PRESSURE_SCALE * mass_sq * particle.pressure / density_sq);
            let viscous_force =
                -particle.velocity * (params.viscosity * mass_sq * kernels.viscous.laplacian(r) / density_sq);

            particle.force += pressure_force + viscous_force;
            boundary.apply_force(particle, rvec);
        }
    }
}

/// Continuum surface force from the colour field.
///
/// Only particles whose colour gradient is longer than the threshold (i.e.
/// sit near the free surface) receive a force, directed along the gradient
/// and scaled by `−σ ∇²c / |∇c|`.
pub fn apply_surface_tension<V: SphVector>(particles: &mut [Particle<V>], params: &FluidParams) {
    let threshold_sq = params.color_field_threshold * params.color_field_threshold;
    for particle in particles.iter_mut() {
        let gradient_sq = particle.color_gradient.length_squared();
        if gradient_sq <= threshold_sq {
            continue;
        }
        let gradient_len = gradient_sq.sqrt().max(MIN_GRADIENT_LENGTH);
        let force_density =
            particle.color_gradient * (-params.surface_tension * particle.color_laplacian / gradient_len);
        particle.force += force_density * particle.volume;
    }
}
