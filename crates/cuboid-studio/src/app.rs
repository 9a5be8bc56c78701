use std::sync::Arc;

use anyhow::{Context, Result};
use cuboid_core::{
    CuboidViewer, FrameOutcome, NoProgress, ProgressSink, SurfaceSize, TextureLoadError,
    ViewerConfig,
};
use cuboid_engine::core::{App, AppControl};
use cuboid_engine::device::GpuConfig;
use cuboid_engine::input::{InputEvent, Key, PointerState};
use cuboid_engine::render::OverlayHandle;
use cuboid_engine::time::FrameTime;
use cuboid_engine::WindowSurface;
use winit::window::Window;

use crate::playlist::Playlist;

/// Radians of rotation per logical pixel dragged.
const DRAG_SENSITIVITY: f32 = 0.01;
/// Radians per arrow key press.
const KEY_STEP: f32 = 0.15;

/// Forwards load progress to the overlay and reports failures.
struct OverlaySink {
    overlay: OverlayHandle,
    label: String,
}

impl ProgressSink for OverlaySink {
    fn on_progress(&mut self, percent: u8) {
        self.overlay.set_progress(percent);
        if percent == 100 {
            log::info!("showing {}", self.label);
        }
    }

    fn on_failure(&mut self, error: &TextureLoadError) {
        self.overlay.hide();
        log::error!("failed to load {}: {error}", self.label);
    }
}

/// Hosts one cuboid viewer in the runtime window.
pub struct ViewerApp {
    config: ViewerConfig,
    auto_rotate: bool,
    playlist: Playlist,

    overlay: OverlayHandle,
    pointer: PointerState,
    viewer: Option<CuboidViewer<WindowSurface>>,
}

impl ViewerApp {
    pub fn new(config: ViewerConfig, auto_rotate: bool, playlist: Playlist) -> Self {
        Self {
            config,
            auto_rotate,
            playlist,
            overlay: OverlayHandle::new(),
            pointer: PointerState::default(),
            viewer: None,
        }
    }

    fn show_current(&mut self) {
        let Some(viewer) = self.viewer.as_mut() else { return };
        let capture = self.playlist.current();
        let sink = OverlaySink {
            overlay: self.overlay.clone(),
            label: capture.label.clone(),
        };
        if let Some(id) = viewer.update_texture(capture.data_url.clone(), sink) {
            log::debug!("load {id} started for {}", capture.label);
        }
    }

    fn rotate(&mut self, dyaw: f32, dpitch: f32) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.rotate_by(dyaw, dpitch);
        }
    }
}

impl App for ViewerApp {
    fn on_start(&mut self, window: Arc<Window>) -> Result<()> {
        let surface = WindowSurface::new(window, GpuConfig::default(), self.overlay.clone());
        let mut viewer = CuboidViewer::with_config(surface, NoProgress, self.config.clone())
            .context("failed to bind the viewer to the window")?;
        viewer.set_auto_rotate(self.auto_rotate);
        viewer.run().context("failed to start the viewer")?;

        self.viewer = Some(viewer);
        log::info!("{} image(s) loaded; Space/N next, P previous, R reload", self.playlist.len());
        self.show_current();
        Ok(())
    }

    fn on_resize(&mut self, _size: SurfaceSize) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.resize();
        }
    }

    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        if let Some(drag) = self.pointer.apply(event) {
            self.rotate(drag.dx * DRAG_SENSITIVITY, drag.dy * DRAG_SENSITIVITY);
            return AppControl::Continue;
        }

        if event.is_key_press(Key::Escape) {
            return AppControl::Exit;
        }
        if event.is_key_press(Key::Space) || event.is_key_press(Key::N) {
            self.playlist.advance();
            self.show_current();
        } else if event.is_key_press(Key::P) {
            self.playlist.retreat();
            self.show_current();
        } else if event.is_key_press(Key::R) || event.is_key_press(Key::Enter) {
            self.show_current();
        } else if event.is_key_press(Key::ArrowLeft) {
            self.rotate(-KEY_STEP, 0.0);
        } else if event.is_key_press(Key::ArrowRight) {
            self.rotate(KEY_STEP, 0.0);
        } else if event.is_key_press(Key::ArrowUp) {
            self.rotate(0.0, -KEY_STEP);
        } else if event.is_key_press(Key::ArrowDown) {
            self.rotate(0.0, KEY_STEP);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, time: FrameTime) -> AppControl {
        let Some(viewer) = self.viewer.as_mut() else {
            return AppControl::Continue;
        };
        match viewer.tick(time.dt) {
            FrameOutcome::Fatal => {
                log::error!("rendering stopped after {} frames", time.frame_index);
                AppControl::Exit
            }
            FrameOutcome::Presented | FrameOutcome::Skipped => AppControl::Continue,
        }
    }

    fn on_exit(&mut self) {
        if let Some(mut viewer) = self.viewer.take() {
            viewer.dispose();
        }
        self.overlay.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink(overlay: &OverlayHandle) -> OverlaySink {
        OverlaySink {
            overlay: overlay.clone(),
            label: "test.png".into(),
        }
    }

    #[test]
    fn progress_drives_overlay_until_completion() {
        let overlay = OverlayHandle::new();
        let mut s = sink(&overlay);

        s.on_progress(0);
        assert_eq!(overlay.visible_progress(), Some(0));
        s.on_progress(65);
        assert_eq!(overlay.visible_progress(), Some(65));
        s.on_progress(100);
        assert_eq!(overlay.visible_progress(), None);
    }

    #[test]
    fn failure_hides_overlay() {
        let overlay = OverlayHandle::new();
        let mut s = sink(&overlay);

        s.on_progress(30);
        s.on_failure(&TextureLoadError::UnsupportedFormat);
        assert_eq!(overlay.visible_progress(), None);
    }
}
