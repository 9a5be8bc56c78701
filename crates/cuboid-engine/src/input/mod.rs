//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events into `InputEvent`s.

pub mod platform;
mod state;
mod types;

pub use state::{DragDelta, PointerState};
pub use types::{ButtonState, InputEvent, Key, MouseButton};
