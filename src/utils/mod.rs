//! Utility functions and primitive DSP building blocks.

pub mod biquad;
pub mod delay_line;
pub mod one_pole_lp;
pub mod parameter_interpolator;

#[allow(unused_imports)]
use num_traits::float::Float;

#[inline]
pub fn slew(out: &mut f32, in_: f32, delta: f32) {
    let mut error = (in_) - *out;
    let d = delta;
    if error > d {
        error = d;
    } else if error < -d {
        error = -d;
    }
    *out += error;
}

#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    f32::powf(10.0, db * 0.05)
}
