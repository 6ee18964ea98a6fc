//! One-pole low-pass, used to model air absorption over distance.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::{SAMPLE_PERIOD, SAMPLE_RATE};

#[derive(Debug, Default, Clone)]
pub struct OnePoleLp {
    alpha: f32,
    y1: f32,
}

impl OnePoleLp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        self.y1 = 0.0;
    }

    /// Derive the smoothing coefficient from a cutoff frequency. The cutoff
    /// itself is ramped by the caller; no smoothing happens here.
    #[inline]
    pub fn set_cutoff(&mut self, fc: f32) {
        let fc = fc.clamp(50.0, 0.45 * SAMPLE_RATE);
        let rc = 1.0 / (2.0 * core::f32::consts::PI * fc);
        self.alpha = SAMPLE_PERIOD / (rc + SAMPLE_PERIOD);
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        self.y1 += self.alpha * (in_ - self.y1);
        self.y1
    }
}
