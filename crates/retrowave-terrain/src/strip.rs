use crate::color::ColorRamp;
use crate::config::TerrainConfig;
use crate::error::TerrainError;
use crate::noise_source::NoiseSource;
use crate::row::RowGenerator;
use crate::scroll::{ScrollState, ScrollStep};
use crate::streamer::GeometryStreamer;
use crate::window::TerrainWindow;

/// One scrolling terrain strip: generator, window, scroll accumulator and
/// streamed buffers, driven once per frame.
///
/// Several strips can live in one process; nothing here is global.
#[derive(Debug, Clone)]
pub struct TerrainStrip {
    config: TerrainConfig,
    generator: RowGenerator,
    window: TerrainWindow,
    ramp: ColorRamp,
    scroll: ScrollState,
    streamer: GeometryStreamer,
}

impl TerrainStrip {
    /// Validates `config`, fills the initial window and writes the first frame.
    pub fn new(config: TerrainConfig, seed: u32) -> Result<Self, TerrainError> {
        config.validate()?;
        let len = config.buffer_len();
        Self::with_buffers(config, seed, vec![0.0; len], vec![0.0; len])
    }

    /// Like [`new`](Self::new), streaming into caller-owned buffers.
    ///
    /// Each buffer must hold exactly `config.buffer_len()` floats.
    pub fn with_buffers(
        config: TerrainConfig,
        seed: u32,
        positions: Vec<f32>,
        colors: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        config.validate()?;

        let generator = RowGenerator::new(&config, NoiseSource::new(seed));
        // Row indices start at 1 so the first row sampled is one step in from the noise origin.
        let window = TerrainWindow::new(&generator, config.window_len(), 1);
        let ramp = ColorRamp::new(
            config.ramp_start,
            config.ramp_end,
            config.ramp_exponent,
            config.grid_length,
        );
        let scroll = ScrollState::new(config.speed);

        let mut streamer = GeometryStreamer::with_buffers(&config, &ramp, positions, colors)?;
        streamer.rewrite(&window, 0.0);

        log::info!(
            "terrain strip ready: {}x{} cells, seed {seed}, {} vertices",
            config.grid_width,
            config.grid_length,
            streamer.vertex_count()
        );

        Ok(Self { config, generator, window, ramp, scroll, streamer })
    }

    /// Runs one frame: accumulate scroll, slide the window, rewrite buffers.
    pub fn frame(&mut self, delta_seconds: f32) -> ScrollStep {
        let step = self.scroll.accumulate(delta_seconds);

        if step.rows > 0 {
            self.window.advance(&self.generator, step.rows);
            log::trace!(
                "advanced {} row(s), next index {}",
                step.rows,
                self.window.next_row_index()
            );
        }

        self.streamer.rewrite(&self.window, step.shift);
        step
    }

    #[inline]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    #[inline]
    pub fn generator(&self) -> &RowGenerator {
        &self.generator
    }

    #[inline]
    pub fn window(&self) -> &TerrainWindow {
        &self.window
    }

    #[inline]
    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    #[inline]
    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    #[inline]
    pub fn streamer(&self) -> &GeometryStreamer {
        &self.streamer
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.generator.seed()
    }
}
