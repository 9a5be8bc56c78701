use std::sync::Arc;

use anyhow::Result;
use cuboid_core::SurfaceSize;
use winit::window::Window;

use crate::input::InputEvent;
use crate::time::FrameTime;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
///
/// Call order: `on_start` once, then any number of `on_resize` / `on_input` /
/// `on_frame`, then `on_exit` exactly once if `on_start` succeeded.
pub trait App {
    /// Called once the window exists. An error aborts the runtime.
    fn on_start(&mut self, window: Arc<Window>) -> Result<()>;

    /// Drawable size changed (physical pixels; may be zero while minimized).
    fn on_resize(&mut self, size: SurfaceSize) {
        let _ = size;
    }

    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, time: FrameTime) -> AppControl;

    /// Release everything that borrows the window. The window is dropped after this returns.
    fn on_exit(&mut self) {}
}
