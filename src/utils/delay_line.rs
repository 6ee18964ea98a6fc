//! Fractional delay line with linear interpolation.

#[derive(Debug)]
pub struct DelayLine<const MAX_DELAY: usize> {
    write_ptr: usize,
    line: [f32; MAX_DELAY],
}

impl<const MAX_DELAY: usize> Default for DelayLine<MAX_DELAY> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const MAX_DELAY: usize> DelayLine<MAX_DELAY> {
    const MASK: usize = MAX_DELAY - 1;

    pub fn new() -> Self {
        debug_assert!(MAX_DELAY.is_power_of_two());
        Self {
            write_ptr: 0,
            line: [0.0; MAX_DELAY],
        }
    }

    pub fn init(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        for elem in self.line.iter_mut() {
            *elem = 0.0;
        }
        self.write_ptr = 0;
    }

    pub fn max_delay(&self) -> usize {
        MAX_DELAY
    }

    /// Write a sample, read back `delay` samples into the past with linear
    /// interpolation, then advance the cursor. `delay` must stay below
    /// `MAX_DELAY - 1` or the read wraps onto fresh data.
    #[inline]
    pub fn process(&mut self, in_: f32, delay: f32) -> f32 {
        debug_assert!(delay >= 0.0 && delay < (MAX_DELAY - 1) as f32);

        self.line[self.write_ptr] = in_;

        let mut read_pos = self.write_ptr as f32 - delay;
        if read_pos < 0.0 {
            read_pos += MAX_DELAY as f32;
        }

        let read_integral = read_pos as usize;
        let read_fractional = read_pos - (read_integral as f32);
        let a = self.line[read_integral & Self::MASK];
        let b = self.line[(read_integral + 1) & Self::MASK];

        self.write_ptr = (self.write_ptr + 1) & Self::MASK;

        a + (b - a) * read_fractional
    }
}
