//! Core engine-facing contracts.
//!
//! Defines the interface between the runtime (platform loop) and the
//! application hosting a viewer.

mod app;

pub use app::{App, AppControl};
