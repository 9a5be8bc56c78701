//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single viewer window.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
