use std::f32::consts::PI;
use std::marker::PhantomData;

use super::Kernel;
use crate::math::SphVector;

/// Smooth polynomial kernel `c (h² − r²)³`, used for density and the colour field.
///
/// Its gradient vanishes at `r = 0`, which makes it a poor choice for pressure
/// (clustered particles feel no repulsion) but ideal for smooth interpolation.
#[derive(Debug, Clone)]
pub struct Poly6<V> {
    h: f32,
    h_sq: f32,
    base_factor: f32,
    _dim: PhantomData<V>,
}

impl<V: SphVector> Poly6<V> {
    pub fn new(h: f32) -> Self {
        let mut kernel = Self {
            h: 0.0,
            h_sq: 0.0,
            base_factor: 0.0,
            _dim: PhantomData,
        };
        kernel.adjust_smoothing_length(h);
        kernel
    }

    /// Kernel value for a squared distance; avoids the square root in the density pass
    #[inline]
    pub fn base_sq(&self, r_sq: f32) -> f32 {
        if r_sq >= self.h_sq {
            return 0.0;
        }
        let diff = self.h_sq - r_sq;
        self.base_factor * diff * diff * diff
    }
}

impl<V: SphVector> Kernel<V> for Poly6<V> {
    fn smoothing_length(&self) -> f32 {
        self.h
    }

    fn adjust_smoothing_length(&mut self, h: f32) {
        self.h = h;
        self.h_sq = h * h;
        self.base_factor = match V::DIM {
            2 => 4.0 / (PI * h.powi(8)),
            _ => 315.0 / (64.0 * PI * h.powi(9)),
        };
    }

    #[inline]
    fn base(&self, r: f32) -> f32 {
        if r >= self.h {
            return 0.0;
        }
        self.base_sq(r * r)
    }

    #[inline]
    fn gradient(&self, rvec: V) -> V {
        let r_sq = rvec.length_squared();
        if r_sq >= self.h_sq {
            return V::ZERO;
        }
        let diff = self.h_sq - r_sq;
        rvec * (-6.0 * self.base_factor * diff * diff)
    }

    #[inline]
    fn laplacian(&self, r: f32) -> f32 {
        if r >= self.h {
            return 0.0;
        }
        let r_sq = r * r;
        let diff = self.h_sq - r_sq;
        -6.0 * self.base_factor * diff * (V::DIM as f32 * diff - 4.0 * r_sq)
    }
}
