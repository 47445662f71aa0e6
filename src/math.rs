//! Dimension abstraction for the 2D and 3D simulators.
//!
//! Everything in the engine is generic over `SphVector`, which is implemented
//! for `glam::Vec2` and `glam::Vec3`. Unused grid axes are treated as a single
//! cell, so the 2D path is the 3D path with a flat third axis.

use glam::{Vec2, Vec3};
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::constants::stability::DEGENERATE_AXIS_OFFSET;

/// Vector type a fluid system can be instantiated with
pub trait SphVector:
    Copy
    + Debug
    + PartialEq
    + Default
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign<f32>
    + Send
    + Sync
    + 'static
{
    /// Number of spatial dimensions
    const DIM: usize;

    const ZERO: Self;

    fn splat(value: f32) -> Self;

    fn dot(self, other: Self) -> f32;

    fn length_squared(self) -> f32 {
        self.dot(self)
    }

    fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Component along `axis`; panics if `axis >= DIM`
    fn component(self, axis: usize) -> f32;

    fn set_component(&mut self, axis: usize, value: f32);

    /// Unit vector along `axis`
    fn unit_axis(axis: usize) -> Self {
        let mut v = Self::ZERO;
        v.set_component(axis, 1.0);
        v
    }

    fn is_finite(self) -> bool {
        (0..Self::DIM).all(|axis| self.component(axis).is_finite())
    }

    /// Component-wise clamp. Unlike `glam`'s clamp this never asserts, and a
    /// NaN component is passed through untouched so validation still sees it.
    fn clamp_within(self, min: Self, max: Self) -> Self {
        let mut out = self;
        for axis in 0..Self::DIM {
            let value = self.component(axis);
            if !value.is_nan() {
                out.set_component(axis, value.max(min.component(axis)).min(max.component(axis)));
            }
        }
        out
    }

    /// Returns true when every component lies inside `[min, max]`
    fn is_within(self, min: Self, max: Self) -> bool {
        (0..Self::DIM).all(|axis| {
            let v = self.component(axis);
            v >= min.component(axis) && v <= max.component(axis)
        })
    }

    /// Offset substituted for (numerically) coincident particle pairs
    fn degenerate_offset() -> Self {
        Self::splat(DEGENERATE_AXIS_OFFSET)
    }

    /// Builds a vector from a config slice; `None` on a length mismatch
    fn from_slice(values: &[f32]) -> Option<Self> {
        if values.len() != Self::DIM {
            return None;
        }
        let mut v = Self::ZERO;
        for (axis, value) in values.iter().enumerate() {
            v.set_component(axis, *value);
        }
        Some(v)
    }

    fn to_vec(self) -> Vec<f32> {
        (0..Self::DIM).map(|axis| self.component(axis)).collect()
    }
}

impl SphVector for Vec2 {
    const DIM: usize = 2;
    const ZERO: Self = Vec2::ZERO;

    fn splat(value: f32) -> Self {
        Vec2::splat(value)
    }

    fn dot(self, other: Self) -> f32 {
        Vec2::dot(self, other)
    }

    fn component(self, axis: usize) -> f32 {
        self[axis]
    }

    fn set_component(&mut self, axis: usize, value: f32) {
        self[axis] = value;
    }
}

impl SphVector for Vec3 {
    const DIM: usize = 3;
    const ZERO: Self = Vec3::ZERO;

    fn splat(value: f32) -> Self {
        Vec3::splat(value)
    }

    fn dot(self, other: Self) -> f32 {
        Vec3::dot(self, other)
    }

    fn component(self, axis: usize) -> f32 {
        self[axis]
    }

    fn set_component(&mut self, axis: usize, value: f32) {
        self[axis] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_checks_dimension() {
        assert_eq!(<Vec2 as SphVector>::from_slice(&[1.0, 2.0]), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(<Vec2 as SphVector>::from_slice(&[1.0, 2.0, 3.0]), None);
        assert_eq!(<Vec3 as SphVector>::from_slice(&[1.0, 2.0, 3.0]), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_clamp_within_keeps_nan() {
        let v = Vec2::new(f32::NAN, 5.0).clamp_within(Vec2::ZERO, Vec2::splat(1.0));
        assert!(v.x.is_nan());
        assert_eq!(v.y, 1.0);
        assert!(!SphVector::is_finite(v));
    }

    #[test]
    fn test_degenerate_offset_length() {
        let offset = <Vec3 as SphVector>::degenerate_offset();
        assert!((SphVector::length(offset) - 0.001 * 3f32.sqrt()).abs() < 1e-7);
    }
}
