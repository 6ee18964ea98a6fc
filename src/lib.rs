#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

pub mod emitter;
pub mod spatializer;
pub mod utils;

/// Sample rate in Hz, fixed by the target hardware.
pub const SAMPLE_RATE: f32 = 48000.0;

/// Reciprocal of the sample rate for fast multiplication.
pub const SAMPLE_PERIOD: f32 = 1.0 / SAMPLE_RATE;

/// Speed of sound in m/s, used for reflection path delays.
pub const SPEED_OF_SOUND: f32 = 343.0;
