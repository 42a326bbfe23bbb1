use crate::color::ColorRamp;
use crate::config::{FLOATS_PER_CELL, TerrainConfig};
use crate::error::TerrainError;
use crate::window::TerrainWindow;

/// Streams a [`TerrainWindow`] into flat, fixed-size vertex buffers.
///
/// Layout: cells are written row-major (`y` outer, `x` inner), 18 floats per
/// cell, as two triangles:
///
/// ```text
/// (x, y) (x+1, y) (x+1, y+1)   (x+1, y+1) (x, y+1) (x, y)
/// ```
///
/// Read as a line list, the same buffer yields the horizontal and vertical grid
/// edges (pairs 0–1 and 4–5; pair 2–3 is degenerate).
///
/// Buffers are allocated once; [`rewrite`](Self::rewrite) overwrites them in place.
#[derive(Debug, Clone)]
pub struct GeometryStreamer {
    grid_width: usize,
    grid_length: usize,
    rect_width: f32,
    rect_length: f32,
    rect_height: f32,

    positions: Vec<f32>,
    colors: Vec<f32>,
    normals: Vec<f32>,

    /// Bumped after every rewrite; renderers re-upload when it changes.
    generation: u64,
}

impl GeometryStreamer {
    /// Adopts caller-owned buffers and writes the row colours.
    ///
    /// Both must hold exactly `config.buffer_len()` floats; anything else is a
    /// configuration error. Buffers are never resized afterwards.
    pub fn with_buffers(
        config: &TerrainConfig,
        ramp: &ColorRamp,
        positions: Vec<f32>,
        colors: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        let expected = config.buffer_len();
        check_len("position", expected, positions.len())?;
        check_len("colour", expected, colors.len())?;
        Ok(Self::from_parts(config, ramp, positions, colors))
    }

    fn from_parts(
        config: &TerrainConfig,
        ramp: &ColorRamp,
        positions: Vec<f32>,
        colors: Vec<f32>,
    ) -> Self {
        let normals = vec![0.0; positions.len()];
        let mut s = Self {
            grid_width: config.grid_width,
            grid_length: config.grid_length,
            rect_width: config.rect_width,
            rect_length: config.rect_length,
            rect_height: config.rect_height,
            positions,
            colors,
            normals,
            generation: 0,
        };
        s.write_colors(ramp);
        s
    }

    /// Flat per-row shading: every vertex of row `y` gets `ramp.color_at(y)`.
    fn write_colors(&mut self, ramp: &ColorRamp) {
        let row_stride = self.grid_width * FLOATS_PER_CELL;
        for (y, row) in self.colors.chunks_exact_mut(row_stride).enumerate() {
            let rgb = ramp.color_at(y).to_f32();
            for vertex in row.chunks_exact_mut(3) {
                vertex.copy_from_slice(&rgb);
            }
        }
    }

    /// Rewrites every vertex position from `window`, shifted back by
    /// `fractional_shift` rows, then recomputes normals and bumps the generation.
    ///
    /// A window whose shape does not match this streamer's grid leaves the
    /// buffers and generation untouched.
    pub fn rewrite(&mut self, window: &TerrainWindow, fractional_shift: f32) {
        if !self.fits(window) {
            log::error!(
                "window of {} rows does not fit a {}x{} grid; frame skipped",
                window.len(),
                self.grid_width,
                self.grid_length
            );
            return;
        }

        let (rw, rl, rh) = (self.rect_width, self.rect_length, self.rect_height);
        let row_stride = self.grid_width * FLOATS_PER_CELL;

        for (y, out_row) in self
            .positions
            .chunks_exact_mut(row_stride)
            .take(self.grid_length)
            .enumerate()
        {
            let near = window.row(y);
            let far = window.row(y + 1);
            let y0 = (y as f32 - fractional_shift) * rl;
            let y1 = y0 + rl;

            for (x, cell) in out_row.chunks_exact_mut(FLOATS_PER_CELL).enumerate() {
                let x0 = x as f32 * rw;
                let x1 = x0 + rw;

                let a = [x0, y0, near[x] * rh];
                let b = [x1, y0, near[x + 1] * rh];
                let c = [x1, y1, far[x + 1] * rh];
                let d = [x0, y1, far[x] * rh];

                cell[0..3].copy_from_slice(&a);
                cell[3..6].copy_from_slice(&b);
                cell[6..9].copy_from_slice(&c);
                cell[9..12].copy_from_slice(&c);
                cell[12..15].copy_from_slice(&d);
                cell[15..18].copy_from_slice(&a);
            }
        }

        self.recompute_normals();
        self.generation = self.generation.wrapping_add(1);
    }

    /// `grid_length + 1` rows of `grid_width + 1` samples each.
    pub fn fits(&self, window: &TerrainWindow) -> bool {
        window.len() == self.grid_length + 1
            && window.rows().all(|row| row.len() == self.grid_width + 1)
    }

    /// Flat normals: each triangle's three vertices share its face normal.
    fn recompute_normals(&mut self) {
        for (tri, out) in self
            .positions
            .chunks_exact(9)
            .zip(self.normals.chunks_exact_mut(9))
        {
            let n = face_normal(&tri[0..3], &tri[3..6], &tri[6..9]);
            out[0..3].copy_from_slice(&n);
            out[3..6].copy_from_slice(&n);
            out[6..9].copy_from_slice(&n);
        }
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    #[inline]
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Float count of each buffer.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

fn check_len(buffer: &'static str, expected: usize, actual: usize) -> Result<(), TerrainError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TerrainError::BufferSizeMismatch { buffer, expected, actual })
    }
}

fn face_normal(a: &[f32], b: &[f32], c: &[f32]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];

    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > f32::EPSILON && len.is_finite() {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise_source::NoiseSource;
    use crate::row::RowGenerator;

    fn small_config() -> TerrainConfig {
        TerrainConfig {
            grid_width: 3,
            grid_length: 2,
            rect_width: 2.0,
            rect_length: 5.0,
            rect_height: 10.0,
            ..TerrainConfig::default()
        }
    }

    fn ramp(config: &TerrainConfig) -> ColorRamp {
        ColorRamp::new(config.ramp_start, config.ramp_end, config.ramp_exponent, config.grid_length)
    }

    fn streamer(config: &TerrainConfig, ramp: &ColorRamp) -> GeometryStreamer {
        let len = config.buffer_len();
        GeometryStreamer::with_buffers(config, ramp, vec![0.0; len], vec![0.0; len]).unwrap()
    }

    fn vertex(buf: &[f32], i: usize) -> [f32; 3] {
        [buf[i * 3], buf[i * 3 + 1], buf[i * 3 + 2]]
    }

    // ── sizing ────────────────────────────────────────────────────────────

    #[test]
    fn buffers_sized_exactly() {
        let c = small_config();
        let s = streamer(&c, &ramp(&c));
        assert_eq!(s.positions().len(), 3 * 2 * 18);
        assert_eq!(s.colors().len(), 3 * 2 * 18);
        assert_eq!(s.normals().len(), 3 * 2 * 18);
        assert_eq!(s.vertex_count(), 36);
    }

    #[test]
    fn with_buffers_rejects_wrong_length() {
        let c = small_config();
        let err = GeometryStreamer::with_buffers(&c, &ramp(&c), vec![0.0; 10], vec![0.0; 108])
            .unwrap_err();
        assert_eq!(
            err,
            TerrainError::BufferSizeMismatch { buffer: "position", expected: 108, actual: 10 }
        );

        let err = GeometryStreamer::with_buffers(&c, &ramp(&c), vec![0.0; 108], vec![0.0; 109])
            .unwrap_err();
        assert!(matches!(err, TerrainError::BufferSizeMismatch { buffer: "colour", .. }));
    }

    #[test]
    fn with_buffers_accepts_exact_length() {
        let c = small_config();
        let s = GeometryStreamer::with_buffers(&c, &ramp(&c), vec![0.0; 108], vec![0.0; 108])
            .unwrap();
        assert_eq!(s.buffer_len(), 108);
    }

    // ── colours ───────────────────────────────────────────────────────────

    #[test]
    fn colours_flat_per_row() {
        let c = small_config();
        let r = ramp(&c);
        let s = streamer(&c, &r);
        let per_row = c.grid_width * 6;
        for y in 0..c.grid_length {
            let expect = r.color_at(y).to_f32();
            for v in 0..per_row {
                assert_eq!(vertex(s.colors(), y * per_row + v), expect);
            }
        }
    }

    // ── rewrite ───────────────────────────────────────────────────────────

    #[test]
    fn rewrite_places_cell_corners() {
        let c = small_config();
        let g = RowGenerator::new(&c, NoiseSource::new(4));
        let w = TerrainWindow::new(&g, c.window_len(), 0);
        let mut s = streamer(&c, &ramp(&c));
        s.rewrite(&w, 0.0);

        // Cell (x=1, y=1) starts at vertex (1 * 3 + 1) * 6.
        let base = (c.grid_width + 1) * 6;
        let p = s.positions();
        assert_eq!(vertex(p, base), [2.0, 5.0, w.height(1, 1) * 10.0]);
        assert_eq!(vertex(p, base + 1), [4.0, 5.0, w.height(2, 1) * 10.0]);
        assert_eq!(vertex(p, base + 2), [4.0, 10.0, w.height(2, 2) * 10.0]);
        assert_eq!(vertex(p, base + 3), vertex(p, base + 2));
        assert_eq!(vertex(p, base + 4), [2.0, 10.0, w.height(1, 2) * 10.0]);
        assert_eq!(vertex(p, base + 5), vertex(p, base));
    }

    #[test]
    fn fractional_shift_moves_rows_back() {
        let c = small_config();
        let g = RowGenerator::new(&c, NoiseSource::new(4));
        let w = TerrainWindow::new(&g, c.window_len(), 0);
        let mut s = streamer(&c, &ramp(&c));
        s.rewrite(&w, 0.25);
        // First vertex: y = (0 - 0.25) * 5.
        assert_eq!(s.positions()[1], -1.25);
    }

    #[test]
    fn rewrite_keeps_size_and_bumps_generation() {
        let c = small_config();
        let g = RowGenerator::new(&c, NoiseSource::new(8));
        let mut w = TerrainWindow::new(&g, c.window_len(), 0);
        let mut s = streamer(&c, &ramp(&c));
        let ptr = s.positions().as_ptr();
        for i in 0..5u64 {
            w.advance(&g, 1);
            s.rewrite(&w, 0.5);
            assert_eq!(s.positions().len(), c.buffer_len());
            assert_eq!(s.colors().len(), c.buffer_len());
            assert_eq!(s.generation(), i + 1);
        }
        assert_eq!(s.positions().as_ptr(), ptr);
    }

    #[test]
    fn mismatched_window_is_skipped() {
        let c = small_config();
        let mut s = streamer(&c, &ramp(&c));

        let wide = TerrainConfig { grid_width: 5, ..small_config() };
        let g = RowGenerator::new(&wide, NoiseSource::new(4));
        let too_wide = TerrainWindow::new(&g, wide.window_len(), 0);
        let too_short = TerrainWindow::new(&RowGenerator::new(&c, NoiseSource::new(4)), 2, 0);

        assert!(!s.fits(&too_wide));
        assert!(!s.fits(&too_short));
        s.rewrite(&too_wide, 0.0);
        s.rewrite(&too_short, 0.0);
        assert_eq!(s.generation(), 0);
        assert!(s.positions().iter().all(|v| *v == 0.0));
    }

    // ── normals ───────────────────────────────────────────────────────────

    #[test]
    fn flat_ground_normals_point_up() {
        let c = TerrainConfig { peak_gain: 0.0, ..small_config() };
        let g = RowGenerator::new(&c, NoiseSource::new(1));
        let w = TerrainWindow::new(&g, c.window_len(), 0);
        let mut s = streamer(&c, &ramp(&c));
        s.rewrite(&w, 0.0);
        for i in 0..s.vertex_count() {
            assert_eq!(vertex(s.normals(), i), [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let c = TerrainConfig { grid_width: 12, grid_length: 12, ..TerrainConfig::default() };
        let g = RowGenerator::new(&c, NoiseSource::new(31));
        let w = TerrainWindow::new(&g, c.window_len(), 0);
        let mut s = streamer(&c, &ramp(&c));
        s.rewrite(&w, 0.3);
        for n in s.normals().chunks_exact(3) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }
}
