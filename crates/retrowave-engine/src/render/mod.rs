//! GPU rendering subsystem.
//!
//! Each renderer is responsible for its own GPU resources (pipelines, buffers)
//! and creates them lazily on first use.
//!
//! Convention:
//! - world space is right-handed, +Z up; the terrain scrolls along -Y
//! - renderers draw with `LoadOp::Load`; the frame clear happens in `FrameCtx::render`

mod backdrop;
mod camera;
mod ctx;
mod terrain;

pub use backdrop::BackdropRenderer;
pub use camera::{Camera, PointLight};
pub use ctx::{RenderCtx, RenderTarget};
pub use terrain::{StreamedMesh, TerrainRenderer, TerrainScene};
