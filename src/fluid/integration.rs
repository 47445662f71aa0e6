use crate::boundary::BoundaryInteractor;
use crate::math::SphVector;
use crate::particle::Particle;

/// Leapfrog update of every particle.
///
/// `force` holds `m·a`, so acceleration is `force / mass` plus `gravity`
/// (pass `V::ZERO` when gravity is disabled). `decay` is a per-second factor
/// applied to the carried-over velocity before it is used.
pub fn integrate<V: SphVector>(particles: &mut [Particle<V>], dt: f32, gravity: V, mass: f32, decay: f32) {
    let half_dt = 0.5 * dt;
    let half_dt_sq = 0.5 * dt * dt;
    let damping = decay.powf(dt);

    for particle in particles.iter_mut() {
        let acceleration = particle.force / mass + gravity;
        let velocity = particle.velocity * damping;

        particle.position += velocity * dt + particle.old_acceleration * half_dt_sq;
        particle.velocity = velocity + (acceleration + particle.old_acceleration) * half_dt;
        particle.old_acceleration = acceleration;
    }
}

/// Clamp escaped particles back inside every active boundary
pub fn enforce_boundaries<V: SphVector>(particles: &mut [Particle<V>], boundaries: &[Box<dyn BoundaryInteractor<V>>]) {
    for boundary in boundaries.iter().filter(|b| b.is_active()) {
        for particle in particles.iter_mut() {
            let rvec = boundary.direction_to(particle);
            boundary.enforce(particle, rvec);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoxBoundary;
    use crate::fluid::diagnostics::{scan, Quantity};
    use glam::Vec2;

    #[test]
    fn test_first_step_from_rest() {
        let gravity = Vec2::new(0.0, -10.0);
        let mut particles = vec![Particle::new(Vec2::new(1.0, 1.0), Vec2::ZERO, 1.0, 1.0)];

        integrate(&mut particles, 0.1, gravity, 1.0, 1.0);
        let p = &particles[0];
        assert_eq!(p.position, Vec2::new(1.0, 1.0));
        assert!((p.velocity - Vec2::new(0.0, -0.5)).length() < 1e-6);
        assert_eq!(p.old_acceleration, gravity);

        integrate(&mut particles, 0.1, gravity, 1.0, 1.0);
        let p = &particles[0];
        // v₁·dt + g·½dt² = −0.05 − 0.05
        assert!((p.position.y - 0.9).abs() < 1e-6);
        assert!((p.velocity.y + 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_force_divided_by_mass() {
        let mut particles = vec![Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, 2.0)];
        particles[0].force = Vec2::new(4.0, 0.0);

        integrate(&mut particles, 1.0, Vec2::ZERO, 2.0, 1.0);
        assert_eq!(particles[0].old_acceleration, Vec2::new(2.0, 0.0));
        assert_eq!(particles[0].velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_velocity_decay() {
        let mut particles = vec![Particle::new(Vec2::ZERO, Vec2::new(2.0, 0.0), 1.0, 1.0)];
        integrate(&mut particles, 1.0, Vec2::ZERO, 1.0, 0.5);
        assert_eq!(particles[0].velocity, Vec2::new(1.0, 0.0));
        assert_eq!(particles[0].position, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_inactive_boundary_skipped() {
        let mut wall = BoxBoundary::new(Vec2::ZERO, Vec2::ONE);
        wall.set_active(false);
        let boundaries: Vec<Box<dyn BoundaryInteractor<Vec2>>> = vec![Box::new(wall)];
        let mut particles = vec![Particle::new(Vec2::new(3.0, 0.5), Vec2::X, 1.0, 1.0)];

        enforce_boundaries(&mut particles, &boundaries);
        assert_eq!(particles[0].position, Vec2::new(3.0, 0.5));
    }

    #[test]
    fn test_nan_position_survives_enforcement() {
        let boundaries: Vec<Box<dyn BoundaryInteractor<Vec2>>> =
            vec![Box::new(BoxBoundary::new(Vec2::ZERO, Vec2::splat(4.0)))];
        let mut particles = vec![
            Particle::new(Vec2::new(f32::NAN, 2.0), Vec2::ZERO, 1.0, 1.0),
            Particle::new(Vec2::new(1.0, 1.0), Vec2::ZERO, 1.0, 1.0),
        ];

        enforce_boundaries(&mut particles, &boundaries);
        assert!(particles[0].position.x.is_nan());
        assert_eq!(particles[1].position, Vec2::new(1.0, 1.0));

        let diagnostics = scan(&particles);
        assert!(diagnostics.iter().any(|d| d.index == 0 && d.quantity == Quantity::Position));
        assert!(diagnostics.iter().all(|d| d.index == 0));
    }
}
