use crate::config::TerrainConfig;
use crate::noise_source::NoiseSource;

/// Road-valley factor for column `x`.
///
/// `ln(0.5 + |x - width/2| / road_width)`: negative within a column or so of
/// the centre line, growing logarithmically toward the edges.
#[inline]
pub fn road_factor(x: usize, grid_width: usize, road_width: f64) -> f64 {
    let from_centre = (x as f64 - grid_width as f64 / 2.0).abs();
    (0.5 + from_centre / road_width).ln()
}

/// Stateless row generator.
///
/// A row is a pure function of the seed and its index; generating index `k`
/// twice yields the same samples.
#[derive(Debug, Clone)]
pub struct RowGenerator {
    noise: NoiseSource,
    grid_width: usize,
    scale: f64,
    peak_exponent: f64,
    peak_gain: f64,
    max_height: f32,
    /// Road factor per column; independent of the row index.
    road: Vec<f64>,
}

impl RowGenerator {
    pub fn new(config: &TerrainConfig, noise: NoiseSource) -> Self {
        let road = (0..config.row_len())
            .map(|x| road_factor(x, config.grid_width, config.road_width))
            .collect();

        Self {
            noise,
            grid_width: config.grid_width,
            scale: config.scale,
            peak_exponent: config.peak_exponent,
            peak_gain: config.peak_gain,
            max_height: config.max_height,
            road,
        }
    }

    /// Samples per generated row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.grid_width + 1
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.noise.seed()
    }

    /// Generates row `row_index` into a fresh buffer.
    pub fn generate_row(&self, row_index: u64) -> Vec<f32> {
        let mut row = vec![0.0; self.row_len()];
        self.fill_row(row_index, &mut row);
        row
    }

    /// Generates row `row_index` into `row`, which must hold `row_len()` samples.
    pub fn fill_row(&self, row_index: u64, row: &mut [f32]) {
        debug_assert_eq!(row.len(), self.row_len());

        let y = row_index as f64 / self.scale;
        for (x, (out, road)) in row.iter_mut().zip(&self.road).enumerate() {
            let n = self.noise.sample(x as f64 / self.scale, y).max(0.0);
            *out = self.shape(n, *road);
        }
    }

    /// Height for a clamped noise sample `n` and road factor `road`.
    fn shape(&self, n: f64, road: f64) -> f32 {
        let h = n.powf(self.peak_exponent) * self.peak_gain * road;
        if h.is_finite() {
            (h as f32).clamp(0.0, self.max_height)
        } else {
            0.0
        }
    }
}
