//! Cuboid engine crate.
//!
//! Platform + GPU runtime for the cuboid viewer: the winit window loop, the wgpu
//! device, and the renderers behind `cuboid_core`'s `Surface`/`RenderContext` seams.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod surface;
pub mod time;
pub mod window;

pub use surface::{GpuScene, WindowSurface};
