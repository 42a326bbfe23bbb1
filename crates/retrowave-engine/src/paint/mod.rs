//! Paint model shared between the studio and renderers.
//!
//! Scope:
//! - color representation (premultiplied alpha, `f32` channels)
//! - gradients used for the backdrop

pub mod color;
pub mod gradient;

pub use color::Color;
pub use gradient::{ColorStop, LinearGradient};
