use crate::math::SphVector;

/// A single fluid sample.
///
/// Mass is uniform across a system and lives in `FluidParams`, not here.
/// `density`, `pressure` and `volume` are rebuilt from scratch every step;
/// only `position`, `velocity` and `old_acceleration` carry over.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle<V> {
    pub position: V,
    pub velocity: V,
    /// Force accumulator, zeroed at the start of every step
    pub force: V,
    /// Acceleration of the previous step, for the leapfrog update
    pub old_acceleration: V,
    pub density: f32,
    /// May be negative in rarefied regions (tensile pressure)
    pub pressure: f32,
    /// `mass / density`
    pub volume: f32,
    pub color_gradient: V,
    pub color_laplacian: f32,
}

impl<V: SphVector> Particle<V> {
    pub fn new(position: V, velocity: V, density: f32, mass: f32) -> Self {
        let volume = if density > 0.0 { mass / density } else { 0.0 };
        Self {
            position,
            velocity,
            force: V::ZERO,
            old_acceleration: V::ZERO,
            density,
            pressure: 0.0,
            volume,
            color_gradient: V::ZERO,
            color_laplacian: 0.0,
        }
    }

    /// Zero the per-step accumulators
    pub fn reset(&mut self) {
        self.force = V::ZERO;
        self.color_gradient = V::ZERO;
        self.color_laplacian = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_reset_keeps_kinematics() {
        let mut particle = Particle::new(Vec2::new(1.0, 2.0), Vec2::new(0.5, 0.0), 1.0, 0.1);
        particle.force = Vec2::new(3.0, 3.0);
        particle.color_gradient = Vec2::ONE;
        particle.color_laplacian = 4.0;
        particle.old_acceleration = Vec2::new(0.0, -9.81);

        particle.reset();

        assert_eq!(particle.force, Vec2::ZERO);
        assert_eq!(particle.color_gradient, Vec2::ZERO);
        assert_eq!(particle.color_laplacian, 0.0);
        assert_eq!(particle.position, Vec2::new(1.0, 2.0));
        assert_eq!(particle.velocity, Vec2::new(0.5, 0.0));
        assert_eq!(particle.old_acceleration, Vec2::new(0.0, -9.81));
    }

    #[test]
    fn test_volume_from_density() {
        let particle = Particle::new(Vec2::ZERO, Vec2::ZERO, 2.0, 0.5);
        assert_eq!(particle.volume, 0.25);
    }
}
