//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! Intended usage:
//! - one `FrameClock` per window
//! - call `tick()` once per presented frame and feed `FrameTime::dt` to the terrain

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
