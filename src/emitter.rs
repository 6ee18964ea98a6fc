//! Emitter control and mixing layer.
//!
//! Owns up to eight spatial voices and drives them once per processing
//! block: slew-limits the per-emitter controls, converts the spherical
//! control values to a Cartesian source position, renders each voice in
//! bounded chunks and accumulates the weighted results into a shared
//! stereo bus.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::spatializer::SpatialVoice;
use crate::utils::{db_to_gain, slew};

/// Number of emitter slots. The active count is chosen at construction and
/// never changes afterwards.
pub const MAX_EMITTERS: usize = 8;

/// Largest chunk handed to a spatial voice in one call. Longer host blocks
/// are split; the ramp state threads across chunks through the persistent
/// voice state.
pub const MAX_BLOCK_SIZE: usize = 256;

// Maximum control change per block, one tick of the control rate.
const AZIMUTH_SLEW: f32 = 0.001;
const ELEVATION_SLEW: f32 = 0.001;
const DISTANCE_SLEW: f32 = 0.001;
const ATTENUATION_SLEW: f32 = 0.1;

/// How emitter output is combined with the stereo bus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Accumulate onto the existing bus content.
    #[default]
    Add,
    /// Zero the bus once per block, then accumulate.
    Replace,
}

#[derive(Debug)]
struct Emitter {
    target_azimuth: f32,
    target_elevation: f32,
    target_distance: f32,
    target_attenuation: f32,

    current_azimuth: f32,
    current_elevation: f32,
    current_distance: f32,
    current_attenuation: f32,

    voice: SpatialVoice,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            target_azimuth: 0.0,
            target_elevation: 0.0,
            target_distance: 1.0,
            target_attenuation: 0.0,
            current_azimuth: 0.0,
            current_elevation: 0.0,
            current_distance: 1.0,
            current_attenuation: 0.0,
            voice: SpatialVoice::new(),
        }
    }
}

/// Fixed-capacity bank of emitters sharing one stereo output bus.
#[derive(Debug)]
pub struct Mixer {
    emitters: [Emitter; MAX_EMITTERS],
    num_emitters: usize,
    auto_spread: bool,

    chunk_left: [f32; MAX_BLOCK_SIZE],
    chunk_right: [f32; MAX_BLOCK_SIZE],
}

impl Mixer {
    pub fn new(num_emitters: usize) -> Self {
        Self {
            emitters: core::array::from_fn(|_| Emitter::default()),
            num_emitters: num_emitters.clamp(1, MAX_EMITTERS),
            auto_spread: false,
            chunk_left: [0.0; MAX_BLOCK_SIZE],
            chunk_right: [0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn init(&mut self) {
        for emitter in self.emitters.iter_mut() {
            *emitter = Emitter::default();
            emitter.voice.init();
        }
        if self.auto_spread {
            self.update_spread_targets();
        }
    }

    pub fn num_emitters(&self) -> usize {
        self.num_emitters
    }

    /// Azimuth target in degrees, −180 to 180. Ignored while auto-spread
    /// is active.
    pub fn set_azimuth(&mut self, index: usize, degrees: f32) {
        if !self.auto_spread {
            self.emitters[index].target_azimuth = degrees.to_radians();
        }
    }

    /// Elevation target in degrees, −90 to 90.
    pub fn set_elevation(&mut self, index: usize, degrees: f32) {
        self.emitters[index].target_elevation = degrees.to_radians();
    }

    /// Distance target in meters.
    pub fn set_distance(&mut self, index: usize, meters: f32) {
        self.emitters[index].target_distance = meters;
    }

    /// Attenuation target in dB, at most 0.
    pub fn set_attenuation(&mut self, index: usize, db: f32) {
        self.emitters[index].target_attenuation = db.min(0.0);
    }

    /// Fan the emitters evenly across the forward hemisphere instead of
    /// following the individual azimuth controls.
    pub fn set_auto_spread(&mut self, enabled: bool) {
        self.auto_spread = enabled;
        if enabled {
            self.update_spread_targets();
        }
    }

    pub fn auto_spread(&self) -> bool {
        self.auto_spread
    }

    fn update_spread_targets(&mut self) {
        let n = self.num_emitters;
        for (i, emitter) in self.emitters[..n].iter_mut().enumerate() {
            emitter.target_azimuth = spread_azimuth(n, i).to_radians();
        }
    }

    /// Process one block: one input slice per active emitter, one shared
    /// stereo bus. Emitters run in index order on the single audio thread.
    pub fn render(
        &mut self,
        inputs: &[&[f32]],
        out_left: &mut [f32],
        out_right: &mut [f32],
        mode: OutputMode,
    ) {
        let size = out_left.len();

        if mode == OutputMode::Replace {
            out_left.fill(0.0);
            out_right.fill(0.0);
        }

        for (emitter, input) in self.emitters[..self.num_emitters]
            .iter_mut()
            .zip(inputs.iter())
        {
            slew(
                &mut emitter.current_azimuth,
                emitter.target_azimuth,
                AZIMUTH_SLEW,
            );
            slew(
                &mut emitter.current_elevation,
                emitter.target_elevation,
                ELEVATION_SLEW,
            );
            slew(
                &mut emitter.current_distance,
                emitter.target_distance,
                DISTANCE_SLEW,
            );
            slew(
                &mut emitter.current_attenuation,
                emitter.target_attenuation,
                ATTENUATION_SLEW,
            );

            let distance = emitter.current_distance;
            let source_x = distance * emitter.current_azimuth.sin();
            let source_z = distance * emitter.current_azimuth.cos();
            let source_y = distance * emitter.current_elevation.sin();
            let gain = db_to_gain(emitter.current_attenuation);

            let mut offset = 0;
            while offset < size {
                let chunk = (size - offset).min(MAX_BLOCK_SIZE);
                emitter.voice.render(
                    source_x,
                    source_y,
                    source_z,
                    &input[offset..offset + chunk],
                    &mut self.chunk_left[..chunk],
                    &mut self.chunk_right[..chunk],
                );

                for i in 0..chunk {
                    out_left[offset + i] += self.chunk_left[i] * gain;
                    out_right[offset + i] += self.chunk_right[i] * gain;
                }

                offset += chunk;
            }
        }
    }
}

/// Azimuth in degrees assigned to emitter `index` of `num_emitters` in
/// auto-spread mode: evenly fanned from −90° to +90° across the forward
/// hemisphere, 0° for a single emitter.
#[inline]
pub fn spread_azimuth(num_emitters: usize, index: usize) -> f32 {
    if num_emitters <= 1 {
        0.0
    } else {
        -90.0 + (index as f32) * (180.0 / ((num_emitters - 1) as f32))
    }
}
