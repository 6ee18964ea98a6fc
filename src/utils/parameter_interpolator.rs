//! Linear interpolation of parameters in rendering loops.

/// Block-rate ramp that keeps no references, so several parameters can ramp
/// inside the same loop without borrowing conflicts. The increment is added
/// before the value is used, and the caller persists the final value as the
/// next block's starting point.
#[derive(Debug, Default, Copy, Clone)]
pub struct ParameterInterpolator {
    increment: f32,
}

impl ParameterInterpolator {
    pub fn new(value: f32, new_value: f32, size: usize) -> Self {
        Self {
            increment: (new_value - value) / (size as f32),
        }
    }

    /// Advance the value by one step and return it.
    #[inline]
    pub fn update(&self, value: &mut f32) -> f32 {
        *value += self.increment;
        *value
    }
}
