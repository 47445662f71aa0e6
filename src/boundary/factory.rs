/// Boundary factory
///
/// Turns named shape descriptors (as read from configuration) into boxed
/// interactors. Corners are plain component lists so one descriptor type
/// serves both the 2D and 3D systems; the dimension is checked here.

use serde::{Deserialize, Serialize};

use super::{BoundaryInteractor, BoxBoundary, FaceSign};
use crate::constants::defaults::{BOUNDARY_DAMPENING, BOUNDARY_DISTANCE};
use crate::error::{dimension_mismatch, invalid_parameter, SphResult};
use crate::math::SphVector;

fn default_distance() -> f32 {
    BOUNDARY_DISTANCE
}

fn default_dampening() -> f32 {
    BOUNDARY_DAMPENING
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryDescriptor {
    Box {
        min: Vec<f32>,
        max: Vec<f32>,
        #[serde(default = "default_distance")]
        distance: f32,
        #[serde(default = "default_dampening")]
        dampening: f32,
        #[serde(default)]
        face_sign: FaceSign,
        #[serde(default = "default_active")]
        active: bool,
    },
}

impl BoundaryDescriptor {
    /// Descriptor for a box covering the whole domain
    pub fn domain_box(extents: &[f32]) -> Self {
        BoundaryDescriptor::Box {
            min: vec![0.0; extents.len()],
            max: extents.to_vec(),
            distance: BOUNDARY_DISTANCE,
            dampening: BOUNDARY_DAMPENING,
            face_sign: FaceSign::AsWritten,
            active: true,
        }
    }
}

fn corner<V: SphVector>(what: &str, values: &[f32]) -> SphResult<V> {
    V::from_slice(values).ok_or_else(|| dimension_mismatch(what, V::DIM, values.len()))
}

/// Build an interactor for a `V`-dimensional system
pub fn build_boundary<V: SphVector>(descriptor: &BoundaryDescriptor) -> SphResult<Box<dyn BoundaryInteractor<V>>> {
    match descriptor {
        BoundaryDescriptor::Box {
            min,
            max,
            distance,
            dampening,
            face_sign,
            active,
        } => {
            let min: V = corner("box min corner", min)?;
            let max: V = corner("box max corner", max)?;
            if !min.is_finite() || !max.is_finite() {
                return Err(invalid_parameter("box", "corners must be finite"));
            }
            if (0..V::DIM).any(|axis| min.component(axis) > max.component(axis)) {
                return Err(invalid_parameter(
                    "box",
                    format!("min corner {:?} exceeds max corner {:?}", min, max),
                ));
            }

            let mut boundary = BoxBoundary::new(min, max)
                .with_distance(*distance)
                .with_dampening(*dampening)
                .with_face_sign(*face_sign);
            boundary.set_active(*active);
            log::debug!("Built box boundary {:?} .. {:?}", min, max);
            Ok(Box::new(boundary))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SphError;
    use glam::{Vec2, Vec3};

    #[test]
    fn test_build_box_from_descriptor() {
        let descriptor = BoundaryDescriptor::domain_box(&[4.0, 2.0]);
        let boundary = build_boundary::<Vec2>(&descriptor).expect("valid descriptor");
        assert_eq!(boundary.name(), "box");
        assert!(boundary.is_active());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let descriptor = BoundaryDescriptor::domain_box(&[4.0, 2.0]);
        match build_boundary::<Vec3>(&descriptor) {
            Err(SphError::DimensionMismatch { expected, found, .. }) => {
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_corners_rejected() {
        let descriptor = BoundaryDescriptor::Box {
            min: vec![5.0, 0.0],
            max: vec![1.0, 1.0],
            distance: 0.1,
            dampening: 0.5,
            face_sign: FaceSign::AsWritten,
            active: true,
        };
        assert!(matches!(
            build_boundary::<Vec2>(&descriptor),
            Err(SphError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_descriptor_from_toml() {
        let descriptor: BoundaryDescriptor = toml::from_str(
            r#"
            kind = "box"
            min = [0.0, 0.0, 0.0]
            max = [1.0, 2.0, 3.0]
            face_sign = "invert_max_face"
            "#,
        )
        .expect("descriptor parses");

        match descriptor {
            BoundaryDescriptor::Box { max, distance, face_sign, active, .. } => {
                assert_eq!(max, vec![1.0, 2.0, 3.0]);
                assert_eq!(distance, BOUNDARY_DISTANCE);
                assert_eq!(face_sign, FaceSign::InvertMaxFace);
                assert!(active);
            }
        }
    }
}
