//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per redraw and feed the
//! resulting `dt` to the viewer's auto-rotation.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
