//! Retrowave engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the studio:
//! window loop, surface and depth target, frame timing, logging, and the
//! renderers that draw the streamed terrain mesh.

pub mod core;
pub mod device;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
