//! Cuboid viewer core.
//!
//! Owns the scene lifecycle, the cuboid mesh and its replaceable material, and
//! the texture load tracker. Rendering backends plug in through
//! [`Surface`] and [`RenderContext`]; this crate never touches a GPU API.
//!
//! ```rust,ignore
//! let mut viewer = CuboidViewer::new(surface, |p: u8| overlay.set(p))?;
//! viewer.run()?;
//! viewer.update_texture(data_url, |p: u8| overlay.set(p));
//!
//! // once per display refresh:
//! viewer.tick(dt);
//! ```

pub mod backend;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod material;
pub mod mesh;
pub mod texture;
pub mod viewer;

#[cfg(test)]
mod headless;

pub use backend::{FrameOutcome, RenderContext, SceneFrame, Surface, SurfaceSize};
pub use config::{CameraConfig, Dimensions, LoaderConfig, ViewerConfig};
pub use error::{InitializationError, TextureLoadError};
pub use material::Material;
pub use mesh::{CuboidMesh, Orientation};
pub use texture::{DecodedImage, LOAD_FAILED, LoadState, NoProgress, OperationId, ProgressSink};
pub use viewer::CuboidViewer;
