//! Second-order IIR section with coefficient smoothing.
//!
//! Every coefficient update blends a small fraction of the new target into
//! the stored values, so the transfer function moves continuously even when
//! the design parameters jump. With one update per sample this settles with
//! a time constant of about 5 ms at 48 kHz.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::{SAMPLE_PERIOD, SAMPLE_RATE};

const COEFFICIENT_SMOOTHING: f32 = 0.999;

/// Fixed Q of the pinna notch filter.
const NOTCH_Q: f32 = 8.0;

#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Biquad {
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    pub fn init(&mut self) {
        self.reset();
    }

    /// Restore the identity filter and clear the delay state.
    pub fn reset(&mut self) {
        self.b0 = 1.0;
        self.b1 = 0.0;
        self.b2 = 0.0;
        self.a1 = 0.0;
        self.a2 = 0.0;
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    /// Transposed direct-form-II section.
    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        let out = self.b0 * in_ + self.z1;
        self.z1 = self.b1 * in_ - self.a1 * out + self.z2;
        self.z2 = self.b2 * in_ - self.a2 * out;
        out
    }

    /// Normalize the target coefficients by `a0` and move the stored
    /// coefficients a small step towards them. Never assigns directly.
    #[inline]
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let k = COEFFICIENT_SMOOTHING;
        self.b0 = k * self.b0 + (1.0 - k) * (b0 / a0);
        self.b1 = k * self.b1 + (1.0 - k) * (b1 / a0);
        self.b2 = k * self.b2 + (1.0 - k) * (b2 / a0);
        self.a1 = k * self.a1 + (1.0 - k) * (a1 / a0);
        self.a2 = k * self.a2 + (1.0 - k) * (a2 / a0);
    }

    /// Notch at `fc` with fixed Q, RBJ cookbook design.
    #[inline]
    pub fn set_notch(&mut self, fc: f32) {
        let fc = fc.clamp(200.0, SAMPLE_RATE * 0.45);
        let w0 = 2.0 * core::f32::consts::PI * fc * SAMPLE_PERIOD;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * NOTCH_Q);

        self.set_coefficients(
            1.0,
            -2.0 * cos_w0,
            1.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        );
    }

    /// High shelf at `fc` with the given gain, RBJ cookbook design with
    /// shelf slope fixed at 1.
    #[inline]
    pub fn set_high_shelf(&mut self, fc: f32, gain_db: f32) {
        let fc = fc.clamp(300.0, SAMPLE_RATE * 0.45);
        let a = f32::powf(10.0, gain_db * 0.05);
        let w0 = 2.0 * core::f32::consts::PI * fc * SAMPLE_PERIOD;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() * core::f32::consts::FRAC_1_SQRT_2;
        let beta = a.sqrt() * alpha;

        self.set_coefficients(
            a * ((a + 1.0) + (a - 1.0) * cos_w0 + 2.0 * beta),
            -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0),
            a * ((a + 1.0) + (a - 1.0) * cos_w0 - 2.0 * beta),
            (a + 1.0) - (a - 1.0) * cos_w0 + 2.0 * beta,
            2.0 * ((a - 1.0) - (a + 1.0) * cos_w0),
            (a + 1.0) - (a - 1.0) * cos_w0 - 2.0 * beta,
        );
    }

    /// Smoothed coefficients as `[b0, b1, b2, a1, a2]`.
    #[inline]
    pub fn coefficients(&self) -> [f32; 5] {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
    }
}
