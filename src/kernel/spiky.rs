use std::f32::consts::PI;
use std::marker::PhantomData;

use super::Kernel;
use crate::math::SphVector;

/// Spiky kernel `c (h − r)³` (Desbrun). The gradient stays finite and
/// non-zero as `r → 0`, so close particles keep repelling each other.
#[derive(Debug, Clone)]
pub struct Spiky<V> {
    h: f32,
    base_factor: f32,
    _dim: PhantomData<V>,
}

impl<V: SphVector> Spiky<V> {
    pub fn new(h: f32) -> Self {
        let mut kernel = Self {
            h: 0.0,
            base_factor: 0.0,
            _dim: PhantomData,
        };
        kernel.adjust_smoothing_length(h);
        kernel
    }
}

impl<V: SphVector> Kernel<V> for Spiky<V> {
    fn smoothing_length(&self) -> f32 {
        self.h
    }

    fn adjust_smoothing_length(&mut self, h: f32) {
        self.h = h;
        self.base_factor = match V::DIM {
            2 => 10.0 / (PI * h.powi(5)),
            _ => 15.0 / (PI * h.powi(6)),
        };
    }

    #[inline]
    fn base(&self, r: f32) -> f32 {
        if r >= self.h {
            return 0.0;
        }
        let diff = self.h - r;
        self.base_factor * diff * diff * diff
    }

    /// Zero vector at `r = 0`: the direction is undefined there and the force
    /// pass never asks (coincident pairs are redirected first).
    #[inline]
    fn gradient(&self, rvec: V) -> V {
        let r = rvec.length();
        if r >= self.h || r <= 0.0 {
            return V::ZERO;
        }
        let diff = self.h - r;
        rvec * (-3.0 * self.base_factor * diff * diff / r)
    }

    /// `W'' + (D − 1) W' / r`. The first-derivative term is dropped at `r = 0`.
    #[inline]
    fn laplacian(&self, r: f32) -> f32 {
        if r >= self.h {
            return 0.0;
        }
        let diff = self.h - r;
        let second = 6.0 * self.base_factor * diff;
        if r <= 0.0 {
            return second;
        }
        second - (V::DIM as f32 - 1.0) * 3.0 * self.base_factor * diff * diff / r
    }
}
