use std::collections::VecDeque;

use crate::row::RowGenerator;

/// Sliding window of terrain rows.
///
/// Row `0` is nearest the camera. The window length is fixed at construction;
/// [`advance`](Self::advance) only slides it.
#[derive(Debug, Clone)]
pub struct TerrainWindow {
    rows: VecDeque<Vec<f32>>,
    next_row_index: u64,
}

impl TerrainWindow {
    /// Fills `len` rows from consecutive indices starting at `first_row_index`.
    pub fn new(generator: &RowGenerator, len: usize, first_row_index: u64) -> Self {
        let rows = (0..len as u64)
            .map(|i| generator.generate_row(first_row_index + i))
            .collect();

        Self {
            rows,
            next_row_index: first_row_index + len as u64,
        }
    }

    /// Drops `row_count` rows from the front and appends as many new rows.
    ///
    /// Evicted row buffers are regenerated in place and moved to the back, so
    /// sliding never allocates. Work is bounded by `len()`: when `row_count`
    /// covers the whole window, only the last `len()` indices are generated.
    pub fn advance(&mut self, generator: &RowGenerator, row_count: usize) {
        let len = self.rows.len();
        if row_count >= len {
            let skipped = (row_count - len) as u64;
            self.next_row_index = self.next_row_index.saturating_add(skipped);
            for row in self.rows.iter_mut() {
                generator.fill_row(self.next_row_index, row);
                self.next_row_index = self.next_row_index.saturating_add(1);
            }
            return;
        }

        for _ in 0..row_count {
            let Some(mut row) = self.rows.pop_front() else { return };
            generator.fill_row(self.next_row_index, &mut row);
            self.rows.push_back(row);
            self.next_row_index += 1;
        }
    }

    /// Number of rows; constant for the lifetime of the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index the next generated row will use.
    #[inline]
    pub fn next_row_index(&self) -> u64 {
        self.next_row_index
    }

    /// Index of the row currently at depth 0.
    #[inline]
    pub fn first_row_index(&self) -> u64 {
        self.next_row_index - self.rows.len() as u64
    }

    #[inline]
    pub fn row(&self, depth: usize) -> &[f32] {
        &self.rows[depth]
    }

    #[inline]
    pub fn height(&self, x: usize, depth: usize) -> f32 {
        self.rows[depth][x]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfig;
    use crate::noise_source::NoiseSource;

    fn setup() -> (RowGenerator, TerrainWindow) {
        let config = TerrainConfig { grid_width: 8, grid_length: 6, ..TerrainConfig::default() };
        let generator = RowGenerator::new(&config, NoiseSource::new(17));
        let window = TerrainWindow::new(&generator, config.window_len(), 100);
        (generator, window)
    }

    #[test]
    fn new_window_has_requested_length_and_counter() {
        let (_, w) = setup();
        assert_eq!(w.len(), 7);
        assert_eq!(w.first_row_index(), 100);
        assert_eq!(w.next_row_index(), 107);
        assert!(w.rows().all(|r| r.len() == 9));
    }

    #[test]
    fn advance_zero_is_noop() {
        let (g, mut w) = setup();
        let before: Vec<Vec<f32>> = w.rows().map(<[f32]>::to_vec).collect();
        w.advance(&g, 0);
        let after: Vec<Vec<f32>> = w.rows().map(<[f32]>::to_vec).collect();
        assert_eq!(before, after);
        assert_eq!(w.next_row_index(), 107);
    }

    #[test]
    fn length_invariant_under_any_advance() {
        let (g, mut w) = setup();
        for n in [1, 0, 3, 7, 15, 2, 0, 1] {
            w.advance(&g, n);
            assert_eq!(w.len(), 7);
        }
        assert_eq!(w.next_row_index(), 107 + 29);
    }

    #[test]
    fn advance_shifts_rows_forward() {
        let (g, mut w) = setup();
        let old: Vec<Vec<f32>> = w.rows().map(<[f32]>::to_vec).collect();
        w.advance(&g, 2);
        for depth in 0..5 {
            assert_eq!(w.row(depth), old[depth + 2].as_slice());
        }
    }

    #[test]
    fn appended_rows_use_consecutive_indices() {
        let (g, mut w) = setup();
        w.advance(&g, 3);
        assert_eq!(w.row(4), g.generate_row(107).as_slice());
        assert_eq!(w.row(5), g.generate_row(108).as_slice());
        assert_eq!(w.row(6), g.generate_row(109).as_slice());
        assert_eq!(w.first_row_index(), 103);
    }

    #[test]
    fn advance_by_exactly_window_length() {
        let (g, mut w) = setup();
        w.advance(&g, 7);
        assert_eq!(w.first_row_index(), 107);
        assert_eq!(w.next_row_index(), 114);
        assert_eq!(w.row(0), g.generate_row(107).as_slice());
        assert_eq!(w.row(6), g.generate_row(113).as_slice());
    }

    #[test]
    fn huge_advance_only_generates_surviving_rows() {
        let (g, mut w) = setup();
        let n = 1_000_000_000_000usize;
        w.advance(&g, n);
        assert_eq!(w.len(), 7);
        assert_eq!(w.next_row_index(), 107 + n as u64);
        assert_eq!(w.row(6), g.generate_row(107 + n as u64 - 1).as_slice());
    }

    #[test]
    fn advance_past_window_length_regenerates_everything() {
        let (g, mut w) = setup();
        w.advance(&g, 20);
        for depth in 0..w.len() {
            assert_eq!(w.row(depth), g.generate_row(120 + depth as u64).as_slice());
        }
    }
}
