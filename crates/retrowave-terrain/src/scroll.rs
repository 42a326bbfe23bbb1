/// Result of feeding one frame's delta time into [`ScrollState`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ScrollStep {
    /// Whole rows the window must advance this frame.
    pub rows: usize,
    /// Fractional row offset in `[0, 1)` for sub-row motion.
    pub shift: f32,
}

/// Scroll accumulator.
///
/// Invariant: `0 <= elapsed_rows < 1` between calls.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollState {
    elapsed_rows: f32,
    speed: f32,
}

impl ScrollState {
    pub fn new(speed: f32) -> Self {
        Self { elapsed_rows: 0.0, speed }
    }

    /// Starts from a non-zero fractional offset, clamped into `[0, 1)`.
    pub fn with_elapsed(speed: f32, elapsed_rows: f32) -> Self {
        let mut s = Self::new(speed);
        s.elapsed_rows = normalize(elapsed_rows).1;
        s
    }

    #[inline]
    pub fn elapsed_rows(&self) -> f32 {
        self.elapsed_rows
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Adds `delta_seconds * speed` rows and splits off the whole part.
    ///
    /// Negative or non-finite deltas count as zero.
    pub fn accumulate(&mut self, delta_seconds: f32) -> ScrollStep {
        let delta = if delta_seconds.is_finite() { delta_seconds.max(0.0) } else { 0.0 };
        let (rows, rest) = normalize(self.elapsed_rows + delta * self.speed);
        self.elapsed_rows = rest;
        ScrollStep { rows, shift: rest }
    }
}

fn normalize(elapsed: f32) -> (usize, f32) {
    if !elapsed.is_finite() || elapsed <= 0.0 {
        return (0, 0.0);
    }

    let whole = elapsed.floor();
    let rest = elapsed - whole;
    // Rounding can leave `rest` at exactly 1.0 for values just below an integer.
    if rest >= 1.0 {
        (whole as usize + 1, 0.0)
    } else {
        (whole as usize, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_row_delta_only_shifts() {
        let mut s = ScrollState::new(2.0);
        let step = s.accumulate(0.1);
        assert_eq!(step.rows, 0);
        assert!((step.shift - 0.2).abs() < 1e-6);
    }

    #[test]
    fn crossing_one_row_advances_once() {
        let mut s = ScrollState::with_elapsed(2.0, 0.95);
        let step = s.accumulate(0.1); // 0.2 rows
        assert_eq!(step.rows, 1);
        assert!((step.shift - 0.15).abs() < 1e-5);
        assert_eq!(step.shift, s.elapsed_rows());
    }

    #[test]
    fn long_frame_advances_many_rows() {
        let mut s = ScrollState::new(2.0);
        let step = s.accumulate(2.3);
        assert_eq!(step.rows, 4);
        assert!((step.shift - 0.6).abs() < 1e-5);
    }

    #[test]
    fn exact_integer_lands_on_zero_shift() {
        let mut s = ScrollState::with_elapsed(1.0, 0.5);
        let step = s.accumulate(0.5);
        assert_eq!(step.rows, 1);
        assert_eq!(step.shift, 0.0);
    }

    #[test]
    fn bad_deltas_ignored() {
        let mut s = ScrollState::with_elapsed(2.0, 0.4);
        assert_eq!(s.accumulate(-3.0).rows, 0);
        assert_eq!(s.accumulate(f32::NAN).rows, 0);
        assert!((s.elapsed_rows() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn shift_stays_in_unit_interval() {
        let mut s = ScrollState::new(2.0);
        for i in 0..1_000 {
            let step = s.accumulate((i % 17) as f32 * 0.013);
            assert!((0.0..1.0).contains(&step.shift));
        }
    }

    #[test]
    fn with_elapsed_normalizes() {
        assert!((ScrollState::with_elapsed(1.0, 3.25).elapsed_rows() - 0.25).abs() < 1e-6);
        assert_eq!(ScrollState::with_elapsed(1.0, -2.0).elapsed_rows(), 0.0);
    }
}
