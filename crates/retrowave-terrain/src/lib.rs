//! Procedural **retrowave terrain strip** with streaming vertex buffers.
//!
//! This crate is intentionally free of GPU and window dependencies so the
//! generator can be exercised headless. Renderers consume the flat buffers
//! exposed by [`GeometryStreamer`].
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`noise_source`] | `NoiseSource` (seeded simplex) |
//! | [`row`] | `RowGenerator`, `road_factor` |
//! | [`window`] | `TerrainWindow` |
//! | [`color`] | `Rgb`, `ColorRamp` |
//! | [`streamer`] | `GeometryStreamer` |
//! | [`scroll`] | `ScrollState`, `ScrollStep` |
//! | [`strip`] | `TerrainStrip` per-frame driver |
//!
//! # Quick start
//!
//! ```rust
//! use retrowave_terrain::{TerrainConfig, TerrainStrip};
//!
//! let mut strip = TerrainStrip::new(TerrainConfig::default(), 42).unwrap();
//! let step = strip.frame(1.0 / 60.0);
//! assert_eq!(step.rows, 0);
//! assert_eq!(strip.streamer().positions().len(), 60 * 100 * 18);
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod noise_source;
pub mod row;
pub mod scroll;
pub mod streamer;
pub mod strip;
pub mod window;

pub use color::{ColorRamp, Rgb};
pub use config::TerrainConfig;
pub use error::TerrainError;
pub use noise_source::NoiseSource;
pub use row::RowGenerator;
pub use scroll::{ScrollState, ScrollStep};
pub use streamer::GeometryStreamer;
pub use strip::TerrainStrip;
pub use window::TerrainWindow;
