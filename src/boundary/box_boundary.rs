use serde::{Deserialize, Serialize};

use super::BoundaryInteractor;
use crate::constants::defaults::{BOUNDARY_DAMPENING, BOUNDARY_DISTANCE};
use crate::math::SphVector;
use crate::particle::Particle;

/// Sign applied to the vector returned for the maximum-corner faces.
///
/// `AsWritten` yields `wall − particle` on every face, so the wall pressure
/// term pushes particles inward on both sides. `InvertMaxFace` negates the
/// far-face branch (the particle is farther than the stand-off from the
/// nearest max face), pointing that vector away from the wall instead.
/// Containment is enforced identically under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceSign {
    #[default]
    AsWritten,
    InvertMaxFace,
}

/// Axis-aligned box confining particles to `[min, max]`
#[derive(Debug, Clone, PartialEq)]
pub struct BoxBoundary<V> {
    pub min: V,
    pub max: V,
    /// Minimum stand-off reported by `direction_to`
    pub distance: f32,
    /// Restitution applied to reflected velocity components
    pub dampening: f32,
    pub face_sign: FaceSign,
    active: bool,
}

/// Smallest component and its axis
fn min_axis<V: SphVector>(v: V) -> (usize, f32) {
    let mut best = (0, v.component(0));
    for axis in 1..V::DIM {
        let value = v.component(axis);
        if value < best.1 {
            best = (axis, value);
        }
    }
    best
}

impl<V: SphVector> BoxBoundary<V> {
    pub fn new(min: V, max: V) -> Self {
        Self {
            min,
            max,
            distance: BOUNDARY_DISTANCE,
            dampening: BOUNDARY_DAMPENING,
            face_sign: FaceSign::default(),
            active: true,
        }
    }

    /// Box spanning the whole simulation domain `[0, extents]`
    pub fn domain(extents: V) -> Self {
        Self::new(V::ZERO, extents)
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = if distance.is_finite() { distance.max(0.0) } else { BOUNDARY_DISTANCE };
        self
    }

    pub fn with_dampening(mut self, dampening: f32) -> Self {
        self.dampening = if dampening.is_finite() { dampening.clamp(0.0, 1.0) } else { BOUNDARY_DAMPENING };
        self
    }

    pub fn with_face_sign(mut self, face_sign: FaceSign) -> Self {
        self.face_sign = face_sign;
        self
    }
}

impl<V: SphVector> BoundaryInteractor<V> for BoxBoundary<V> {
    fn name(&self) -> &str {
        "box"
    }

    fn direction_to(&self, particle: &Particle<V>) -> V {
        let to_min = particle.position - self.min;
        let to_max = self.max - particle.position;
        let (min_face_axis, min_face_gap) = min_axis(to_min);
        let (max_face_axis, max_face_gap) = min_axis(to_max);

        if min_face_gap < max_face_gap {
            let axis = V::unit_axis(min_face_axis);
            if min_face_gap < self.distance {
                return axis * -self.distance;
            }
            -(axis * min_face_gap)
        } else {
            let axis = V::unit_axis(max_face_axis);
            if max_face_gap < self.distance {
                return axis * self.distance;
            }
            match self.face_sign {
                FaceSign::AsWritten => axis * max_face_gap,
                FaceSign::InvertMaxFace => -(axis * max_face_gap),
            }
        }
    }

    fn enforce(&self, particle: &mut Particle<V>, rvec: V) {
        if particle.position.is_within(self.min, self.max) {
            return;
        }
        particle.position = particle.position.clamp_within(self.min, self.max);
        for axis in 0..V::DIM {
            if rvec.component(axis) != 0.0 {
                let reflected = -particle.velocity.component(axis) * self.dampening;
                particle.velocity.set_component(axis, reflected);
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    fn particle_at(position: Vec2, velocity: Vec2) -> Particle<Vec2> {
        Particle::new(position, velocity, 1.0, 1.0)
    }

    #[test]
    fn test_direction_to_nearest_min_face() {
        let boundary = BoxBoundary::new(Vec2::ZERO, Vec2::splat(10.0)).with_distance(0.1);
        let rvec = boundary.direction_to(&particle_at(Vec2::new(0.5, 5.0), Vec2::ZERO));
        assert_eq!(rvec, Vec2::new(-0.5, 0.0));
    }

    #[test]
    fn test_direction_to_uses_stand_off_when_close() {
        let boundary = BoxBoundary::new(Vec2::ZERO, Vec2::splat(10.0)).with_distance(0.1);
        let near_min = boundary.direction_to(&particle_at(Vec2::new(5.0, 0.01), Vec2::ZERO));
        assert_eq!(near_min, Vec2::new(0.0, -0.1));

        let near_max = boundary.direction_to(&particle_at(Vec2::new(9.95, 5.0), Vec2::ZERO));
        assert_eq!(near_max, Vec2::new(0.1, 0.0));
    }

    #[test]
    fn test_face_sign_conventions() {
        let particle = Particle::new(Vec3::new(5.0, 5.0, 9.0), Vec3::ZERO, 1.0, 1.0);
        let as_written = BoxBoundary::new(Vec3::ZERO, Vec3::splat(10.0));
        let inverted = as_written.clone().with_face_sign(FaceSign::InvertMaxFace);

        assert_eq!(as_written.direction_to(&particle), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(inverted.direction_to(&particle), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_enforce_clamps_and_reflects() {
        let boundary = BoxBoundary::new(Vec2::ZERO, Vec2::splat(10.0)).with_dampening(0.5);
        let mut particle = particle_at(Vec2::new(-0.2, 4.0), Vec2::new(-2.0, 1.0));
        let rvec = boundary.direction_to(&particle);
        boundary.enforce(&mut particle, rvec);

        assert_eq!(particle.position, Vec2::new(0.0, 4.0));
        assert_eq!(particle.velocity, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_enforce_is_idempotent() {
        let boundary = BoxBoundary::new(Vec2::ZERO, Vec2::splat(10.0));
        let mut particle = particle_at(Vec2::new(12.0, 4.0), Vec2::new(3.0, 0.0));
        let rvec = boundary.direction_to(&particle);
        boundary.enforce(&mut particle, rvec);
        let once = particle.clone();

        let rvec = boundary.direction_to(&particle);
        boundary.enforce(&mut particle, rvec);
        assert_eq!(particle, once);
    }

    #[test]
    fn test_inside_particle_untouched() {
        let boundary = BoxBoundary::new(Vec2::ZERO, Vec2::splat(10.0));
        let mut particle = particle_at(Vec2::new(5.0, 5.0), Vec2::new(3.0, -1.0));
        let rvec = boundary.direction_to(&particle);
        boundary.enforce(&mut particle, rvec);
        assert_eq!(particle.velocity, Vec2::new(3.0, -1.0));
    }
}
