//! GPU rendering subsystem.
//!
//! Each renderer owns its GPU resources and creates them lazily on first use,
//! rebuilding pipelines if the swapchain format changes.
//!
//! Pass order per frame: the cuboid pass clears and draws the mesh, then the
//! overlay pass loads the result and draws on top in physical pixels.

mod bind;
mod ctx;

pub mod cuboid;
pub mod overlay;

pub use ctx::{FrameTarget, RenderCtx};
pub use cuboid::{CuboidRenderer, GpuTexture};
pub use overlay::{OverlayHandle, OverlayStyle, ProgressOverlay};
