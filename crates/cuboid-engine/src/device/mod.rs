//! GPU device and swapchain.
//!
//! [`Gpu`] owns the device/queue pair and the window's swapchain. One `Gpu` backs
//! one viewer scene; dropping it releases every device resource.

mod config;
mod gpu;
mod swapchain;

pub use config::GpuConfig;
pub use gpu::Gpu;
pub use swapchain::{Acquired, GpuFrame};
