//! Binaural spatialization of a mono source.
//!
//! Renders a mono input against a 3D source position using parametric
//! localization cues instead of measured head-related impulse responses:
//!
//! - *ITD:* fractional delay on the lagging ear, up to 0.5 ms.
//! - *ILD:* broadband ±3 dB gain tilt between the ears.
//! - *Head shadow:* opposing high-shelf filters at 1.5 kHz.
//! - *Pinna cue:* a narrow notch swept between 5.5 and 10.5 kHz by elevation.
//! - *Air absorption:* a one-pole low-pass closing with distance.
//! - *Early reflection:* one delayed ground bounce at −6 dB.
//!
//! Cue targets are recomputed once per block from the source position and
//! ramped linearly across the block, starting from the values the previous
//! block ended on, so block boundaries are free of steps.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::biquad::Biquad;
use crate::utils::delay_line::DelayLine;
use crate::utils::one_pole_lp::OnePoleLp;
use crate::utils::parameter_interpolator::ParameterInterpolator;
use crate::{SAMPLE_RATE, SPEED_OF_SOUND};

/// Capacity of the ITD and reflection delay lines. The requested delays are
/// bounded by design (ITD ≤ 24 samples, reflection delay capped at
/// `MAX_REFLECTION_DELAY`), so reads never wrap onto fresh data.
const DELAY_LINE_SIZE: usize = 512;

/// Maximum interaural delay in seconds (path difference around the head).
const MAX_ITD_SECONDS: f32 = 0.0005;

/// Longest reflection delay the line can serve, ~3.6 m of source height.
const MAX_REFLECTION_DELAY: f32 = (DELAY_LINE_SIZE - 2) as f32;

/// Reflection level, −6 dB.
const REFLECTION_GAIN: f32 = 0.501187;

/// Shelf and notch targets are re-derived every 8th sample; coefficient
/// smoothing masks the resulting steps.
const COEFFICIENT_REFRESH_MASK: usize = 7;

const SHELF_FREQUENCY: f32 = 1500.0;
const SHELF_RANGE_DB: f32 = 8.0;
const NOTCH_CENTER_FREQUENCY: f32 = 8000.0;
const NOTCH_ELEVATION_RANGE: f32 = 2500.0;

/// Per-emitter spatialization state: filters, delay lines and the smoothed
/// position cues carried across blocks. Constructed once per emitter slot
/// and never reallocated.
#[derive(Debug)]
pub struct SpatialVoice {
    notch_left: Biquad,
    notch_right: Biquad,
    shelf_left: Biquad,
    shelf_right: Biquad,
    air_lp: OnePoleLp,
    itd_left: DelayLine<DELAY_LINE_SIZE>,
    itd_right: DelayLine<DELAY_LINE_SIZE>,
    reflection: DelayLine<DELAY_LINE_SIZE>,

    previous_sin_az: f32,
    previous_elevation: f32,
    previous_distance: f32,
}

impl Default for SpatialVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialVoice {
    pub fn new() -> Self {
        Self {
            notch_left: Biquad::new(),
            notch_right: Biquad::new(),
            shelf_left: Biquad::new(),
            shelf_right: Biquad::new(),
            air_lp: OnePoleLp::new(),
            itd_left: DelayLine::new(),
            itd_right: DelayLine::new(),
            reflection: DelayLine::new(),
            previous_sin_az: 0.0,
            previous_elevation: 0.0,
            previous_distance: 1.0,
        }
    }

    pub fn init(&mut self) {
        self.notch_left.init();
        self.notch_right.init();
        self.shelf_left.init();
        self.shelf_right.init();
        self.air_lp.init();
        self.itd_left.init();
        self.itd_right.init();
        self.reflection.init();
        self.previous_sin_az = 0.0;
        self.previous_elevation = 0.0;
        self.previous_distance = 1.0;
    }

    /// Spatialize one block of mono input against the source position given
    /// in meters. All state lives in `self`, so independent voices can run
    /// back to back within one callback.
    #[inline]
    pub fn render(
        &mut self,
        source_x: f32,
        source_y: f32,
        source_z: f32,
        in_: &[f32],
        out_left: &mut [f32],
        out_right: &mut [f32],
    ) {
        let size = in_.len();

        // Cue targets for this block. Epsilon offsets keep the divisions
        // and asin well-defined for a source at the origin.
        let horizontal_distance = (source_x * source_x + source_z * source_z).sqrt() + 1.0e-6;
        let sin_az_target = (source_x / horizontal_distance).clamp(-1.0, 1.0);
        let distance_target =
            (source_x * source_x + source_y * source_y + source_z * source_z + 1.0e-6).sqrt();
        let elevation_target =
            (source_y / distance_target).asin() * (2.0 / core::f32::consts::PI);

        let sin_az_ramp = ParameterInterpolator::new(self.previous_sin_az, sin_az_target, size);
        let elevation_ramp =
            ParameterInterpolator::new(self.previous_elevation, elevation_target, size);
        let distance_ramp =
            ParameterInterpolator::new(self.previous_distance, distance_target, size);

        let mut sin_az = self.previous_sin_az;
        let mut elevation = self.previous_elevation;
        let mut distance = self.previous_distance;

        // Reflection delay and air absorption are set once per block. The
        // delay is capped just below the line capacity so a tall source
        // cannot make the read wrap onto fresh data.
        let reflection_delay =
            (source_y.abs() / SPEED_OF_SOUND * SAMPLE_RATE).min(MAX_REFLECTION_DELAY);
        let cutoff = 15000.0 - 1000.0 * (distance_target - 0.5);
        self.air_lp.set_cutoff(cutoff.clamp(5000.0, 15000.0));

        for (n, ((in_sample, out_l), out_r)) in in_
            .iter()
            .zip(out_left.iter_mut())
            .zip(out_right.iter_mut())
            .enumerate()
        {
            sin_az_ramp.update(&mut sin_az);
            elevation_ramp.update(&mut elevation);
            distance_ramp.update(&mut distance);

            let itd_samples = MAX_ITD_SECONDS * sin_az.abs() * SAMPLE_RATE;

            let reflected = self.reflection.process(*in_sample, reflection_delay);
            let dry = *in_sample + reflected * REFLECTION_GAIN;
            let absorbed = self.air_lp.process(dry);

            // Delay only the lagging ear; the other channel stays dry.
            let (mut left, mut right) = if sin_az >= 0.0 {
                (self.itd_left.process(absorbed, itd_samples), absorbed)
            } else {
                (absorbed, self.itd_right.process(absorbed, itd_samples))
            };

            let (ild_left, ild_right) = ild_gains(sin_az);
            left *= ild_left;
            right *= ild_right;

            if (n & COEFFICIENT_REFRESH_MASK) == 0 {
                self.shelf_left
                    .set_high_shelf(SHELF_FREQUENCY, SHELF_RANGE_DB * sin_az);
                self.shelf_right
                    .set_high_shelf(SHELF_FREQUENCY, -SHELF_RANGE_DB * sin_az);
                let notch_frequency =
                    NOTCH_CENTER_FREQUENCY + NOTCH_ELEVATION_RANGE * elevation;
                self.notch_left.set_notch(notch_frequency);
                self.notch_right.set_notch(notch_frequency);
            }

            *out_l = self.notch_left.process(self.shelf_left.process(left));
            *out_r = self.notch_right.process(self.shelf_right.process(right));
        }

        self.previous_sin_az = sin_az;
        self.previous_elevation = elevation;
        self.previous_distance = distance;
    }
}

/// Broadband interaural level difference, ±3 dB across the azimuth range.
/// The two gains always sum to 2.
#[inline]
pub fn ild_gains(sin_az: f32) -> (f32, f32) {
    (1.0 + 0.25 * sin_az, 1.0 - 0.25 * sin_az)
}
