use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use retrowave_engine::core::{App as EngineApp, AppControl, FrameCtx};
use retrowave_engine::device::GpuInit;
use retrowave_engine::paint::{Color, LinearGradient};
use retrowave_engine::render::{
    BackdropRenderer, Camera, PointLight, StreamedMesh, TerrainRenderer, TerrainScene,
};
use retrowave_engine::window::{Runtime, RuntimeConfig};
use retrowave_terrain::{Rgb, TerrainConfig, TerrainStrip};

use glam::vec3;

/// Environment variable that pins the terrain seed.
pub const SEED_ENV: &str = "RETROWAVE_SEED";

// ── Application ───────────────────────────────────────────────────────────

/// Top-level studio builder.
///
/// ```rust,ignore
/// Application::new()
///     .title("Retrowave")
///     .size(1280.0, 720.0)
///     .seed(1337)
///     .run();
/// ```
pub struct Application {
    title:   String,
    width:   f64,
    height:  f64,
    seed:    Option<u32>,
    terrain: TerrainConfig,
    ramp:    Option<(String, String)>,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title:   "retrowave".to_string(),
            width:   1280.0,
            height:  720.0,
            seed:    None,
            terrain: TerrainConfig::default(),
            ramp:    None,
        }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// Pin the noise seed. Takes precedence over `RETROWAVE_SEED`.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the terrain parameters.
    pub fn terrain(mut self, config: TerrainConfig) -> Self {
        self.terrain = config;
        self
    }

    /// Set the depth ramp from two `RRGGBB` hex strings (near, far).
    ///
    /// Parsed when the app starts; a bad literal aborts startup.
    pub fn ramp(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.ramp = Some((start.into(), end.into()));
        self
    }

    /// Start the event loop. This never returns.
    pub fn run(self) -> ! {
        if let Err(e) = self.try_run() {
            log::error!("retrowave runtime error: {e:#}");
            std::process::exit(1);
        }
        std::process::exit(0);
    }

    fn try_run(self) -> Result<()> {
        let seed = self.seed.unwrap_or_else(resolve_seed);
        let terrain = match &self.ramp {
            Some((start, end)) => with_ramp(self.terrain, start, end)?,
            None => self.terrain,
        };
        let state = RetrowaveApp::new(terrain, seed)?;

        let config = RuntimeConfig {
            title:        self.title,
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let gpu_init = GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        };
        Runtime::run(config, gpu_init, state)
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed from `RETROWAVE_SEED`, else random.
fn resolve_seed() -> u32 {
    let env = std::env::var(SEED_ENV).ok();
    match parse_seed(env.as_deref()) {
        Some(seed) => seed,
        None => {
            if let Some(raw) = env.as_deref() {
                log::warn!("ignoring unparsable {SEED_ENV}={raw:?}");
            }
            rand::random::<u32>()
        }
    }
}

fn parse_seed(raw: Option<&str>) -> Option<u32> {
    raw.map(str::trim).filter(|s| !s.is_empty())?.parse().ok()
}

fn with_ramp(mut config: TerrainConfig, start: &str, end: &str) -> Result<TerrainConfig> {
    config.ramp_start = Rgb::from_hex(start).context("bad ramp start colour")?;
    config.ramp_end = Rgb::from_hex(end).context("bad ramp end colour")?;
    Ok(config)
}

// ── Scene setup ───────────────────────────────────────────────────────────

/// Page background: indigo → magenta → indigo, top to bottom.
fn backdrop_gradient() -> LinearGradient {
    let indigo = Color::from_rgb_u8(57, 58, 137);
    let magenta = Color::from_rgb_u8(200, 17, 116);
    LinearGradient::evenly_spaced(&[indigo, magenta, indigo])
}

/// Camera down the road centre at driving height; light just above the road.
fn terrain_scene(config: &TerrainConfig) -> TerrainScene {
    let centre_x = config.grid_width as f32 / 2.0 * config.rect_width;

    TerrainScene {
        camera: Camera {
            eye:    vec3(centre_x, 0.0, 10.0),
            target: vec3(centre_x, config.grid_length as f32, 10.0),
            ..Camera::default()
        },
        light: PointLight {
            position:  vec3(centre_x, 0.0, 1.0),
            intensity: 2.0,
            range:     config.grid_length as f32 * config.rect_length,
        },
        ambient:    0.5,
        line_color: Color::white(),
        draw_fill:  true,
        draw_lines: true,
    }
}

// ── RetrowaveApp ──────────────────────────────────────────────────────────

/// Internal state that implements `retrowave_engine::core::App`.
struct RetrowaveApp {
    strip:    TerrainStrip,
    scene:    TerrainScene,
    backdrop: LinearGradient,

    terrain_renderer:  TerrainRenderer,
    backdrop_renderer: BackdropRenderer,
}

impl RetrowaveApp {
    fn new(config: TerrainConfig, seed: u32) -> Result<Self> {
        let scene = terrain_scene(&config);
        let strip = TerrainStrip::new(config, seed).context("invalid terrain configuration")?;

        Ok(Self {
            strip,
            scene,
            backdrop: backdrop_gradient(),
            terrain_renderer: TerrainRenderer::new(),
            backdrop_renderer: BackdropRenderer::new(),
        })
    }
}

impl EngineApp for RetrowaveApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        // ── Advance terrain ───────────────────────────────────────────────
        self.strip.frame(ctx.time.dt);

        // ── Render ────────────────────────────────────────────────────────
        let streamer = self.strip.streamer();
        let mesh = StreamedMesh {
            positions:  streamer.positions(),
            colors:     streamer.colors(),
            normals:    streamer.normals(),
            generation: streamer.generation(),
        };

        let terrain  = &mut self.terrain_renderer;
        let backdrop = &mut self.backdrop_renderer;
        let gradient = &self.backdrop;
        let scene    = &self.scene;

        let clear = gradient.sample(0.0);
        ctx.render(clear, |rctx, target| {
            terrain.upload(rctx, mesh);
            backdrop.render(rctx, target, gradient);
            terrain.render(rctx, target, scene);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── seed ──────────────────────────────────────────────────────────────

    #[test]
    fn seed_parses_decimal() {
        assert_eq!(parse_seed(Some("1337")), Some(1337));
        assert_eq!(parse_seed(Some("  42\n")), Some(42));
    }

    #[test]
    fn seed_rejects_garbage() {
        assert_eq!(parse_seed(None), None);
        assert_eq!(parse_seed(Some("")), None);
        assert_eq!(parse_seed(Some("-1")), None);
        assert_eq!(parse_seed(Some("retro")), None);
        assert_eq!(parse_seed(Some("4294967296")), None);
    }

    // ── ramp ──────────────────────────────────────────────────────────────

    #[test]
    fn ramp_hex_overrides_config() {
        let c = with_ramp(TerrainConfig::default(), "#000000", "ffffff").unwrap();
        assert_eq!(c.ramp_start, Rgb::new(0, 0, 0));
        assert_eq!(c.ramp_end, Rgb::new(255, 255, 255));
    }

    #[test]
    fn reference_ramp_literals_match_defaults() {
        let c = with_ramp(TerrainConfig::default(), "83148C", "5B1FD5").unwrap();
        assert_eq!(c, TerrainConfig::default());
    }

    #[test]
    fn bad_ramp_hex_aborts() {
        let err = with_ramp(TerrainConfig::default(), "83148C", "purple").unwrap_err();
        assert!(format!("{err:#}").contains("purple"));
    }

    // ── scene ─────────────────────────────────────────────────────────────

    #[test]
    fn camera_sits_on_road_centre() {
        let scene = terrain_scene(&TerrainConfig::default());
        assert_eq!(scene.camera.eye, vec3(120.0, 0.0, 10.0));
        assert_eq!(scene.camera.target, vec3(120.0, 100.0, 10.0));
        assert_eq!(scene.camera.up, vec3(0.0, 0.0, 1.0));
        assert_eq!(scene.camera.fov_y_deg, 45.0);
        assert_eq!((scene.camera.near, scene.camera.far), (1.0, 1000.0));
    }

    #[test]
    fn light_reaches_far_edge() {
        let scene = terrain_scene(&TerrainConfig::default());
        assert_eq!(scene.light.position, vec3(120.0, 0.0, 1.0));
        assert_eq!(scene.light.intensity, 2.0);
        assert_eq!(scene.light.range, 400.0);
        assert_eq!(scene.ambient, 0.5);
    }

    #[test]
    fn backdrop_is_symmetric() {
        let g = backdrop_gradient();
        assert_eq!(g.stops().len(), 3);
        assert_eq!(g.sample(0.0), g.sample(1.0));
        let mid = g.sample(0.5).to_array();
        let magenta = Color::from_rgb_u8(200, 17, 116).to_array();
        assert!(mid.iter().zip(magenta).all(|(a, b)| (a - b).abs() < 1e-5));
    }

    #[test]
    fn invalid_terrain_is_rejected_before_window_opens() {
        let config = TerrainConfig { grid_width: 0, ..TerrainConfig::default() };
        assert!(RetrowaveApp::new(config, 1).is_err());
    }
}
