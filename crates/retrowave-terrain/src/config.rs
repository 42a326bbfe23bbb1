use crate::color::Rgb;
use crate::error::TerrainError;

/// Floats written per grid cell: two triangles × three vertices × xyz.
pub const FLOATS_PER_CELL: usize = 6 * 3;

/// Vertices emitted per grid cell.
pub const VERTICES_PER_CELL: usize = 6;

/// Terrain strip configuration.
///
/// Fixed at startup. The defaults reproduce the reference look: a 60 × 100
/// grid of 4-unit cells, noise sampled every tenth of a unit, a road three
/// columns wide and a purple depth ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainConfig {
    /// Cells across. Each row carries `grid_width + 1` samples.
    pub grid_width: usize,
    /// Cells deep. The window carries `grid_length + 1` rows.
    pub grid_length: usize,

    /// World size of one cell along x.
    pub rect_width: f32,
    /// World size of one cell along y (depth).
    pub rect_length: f32,
    /// World units per unit of height sample.
    pub rect_height: f32,

    /// Noise coordinate divisor. Larger = smoother terrain.
    pub scale: f64,
    /// Road valley width in columns.
    pub road_width: f64,
    /// Exponent applied to the clamped noise sample; sharpens peaks.
    pub peak_exponent: f64,
    /// Multiplier applied after the exponent.
    pub peak_gain: f64,
    /// Upper bound on any height sample.
    pub max_height: f32,

    pub ramp_start: Rgb,
    pub ramp_end: Rgb,
    /// Depth warp; values below 1 move the ramp toward `ramp_end` sooner.
    pub ramp_exponent: f32,

    /// Rows scrolled per second.
    pub speed: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            grid_width: 60,
            grid_length: 100,
            rect_width: 4.0,
            rect_length: 4.0,
            rect_height: 4.0,
            scale: 10.0,
            road_width: 3.0,
            peak_exponent: 2.4,
            peak_gain: 5.0,
            max_height: 64.0,
            ramp_start: Rgb::new(0x83, 0x14, 0x8C),
            ramp_end: Rgb::new(0x5B, 0x1F, 0xD5),
            ramp_exponent: 0.3,
            speed: 2.0,
        }
    }
}

impl TerrainConfig {
    /// Samples per row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.grid_width + 1
    }

    /// Rows held by the sliding window.
    #[inline]
    pub fn window_len(&self) -> usize {
        self.grid_length + 1
    }

    /// Exact float count of the position and colour buffers.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.grid_width * self.grid_length * FLOATS_PER_CELL
    }

    /// Vertex count of the streamed mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.grid_width * self.grid_length * VERTICES_PER_CELL
    }

    /// Checks every field once, at startup.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.grid_width == 0 {
            return Err(TerrainError::config("grid_width", "must be at least 1"));
        }
        if self.grid_length == 0 {
            return Err(TerrainError::config("grid_length", "must be at least 1"));
        }
        if self
            .grid_width
            .checked_mul(self.grid_length)
            .and_then(|cells| cells.checked_mul(FLOATS_PER_CELL))
            .is_none()
        {
            return Err(TerrainError::config("grid_width", "grid too large"));
        }

        positive_f32("rect_width", self.rect_width)?;
        positive_f32("rect_length", self.rect_length)?;
        positive_f32("rect_height", self.rect_height)?;
        positive_f64("scale", self.scale)?;
        positive_f64("road_width", self.road_width)?;
        positive_f64("peak_exponent", self.peak_exponent)?;
        positive_f32("max_height", self.max_height)?;
        positive_f32("ramp_exponent", self.ramp_exponent)?;

        if !self.peak_gain.is_finite() || self.peak_gain < 0.0 {
            return Err(TerrainError::config("peak_gain", "must be finite and >= 0"));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(TerrainError::config("speed", "must be finite and >= 0"));
        }

        Ok(())
    }
}

fn positive_f32(field: &'static str, v: f32) -> Result<(), TerrainError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::config(field, format!("must be finite and > 0, got {v}")))
    }
}

fn positive_f64(field: &'static str, v: f64) -> Result<(), TerrainError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(TerrainError::config(field, format!("must be finite and > 0, got {v}")))
    }
}
