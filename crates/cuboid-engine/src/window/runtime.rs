use std::sync::Arc;

use anyhow::{Context, Result};
use cuboid_core::SurfaceSize;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl};
use crate::input::platform::translate_window_event;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cuboid viewer".to_string(),
            initial_size: LogicalSize::new(960.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until it exits or the window closes.
    ///
    /// Returns the error that aborted startup, if any.
    pub fn run<A>(config: RuntimeConfig, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct AppState<A: App> {
    config: RuntimeConfig,
    app: A,

    window: Option<Arc<Window>>,
    clock: FrameClock,

    started: bool,
    failure: Option<anyhow::Error>,
}

impl<A: App> AppState<A> {
    fn new(config: RuntimeConfig, app: A) -> Self {
        Self {
            config,
            app,
            window: None,
            clock: FrameClock::default(),
            started: false,
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        self.app.on_start(Arc::clone(&window))?;
        self.started = true;
        self.clock.reset();

        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    /// Runs `on_exit` once, then drops the window and stops the loop.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            self.started = false;
            self.app.on_exit();
        }
        self.window = None;
        event_loop.exit();
    }
}

fn to_surface_size(size: PhysicalSize<u32>) -> SurfaceSize {
    SurfaceSize::new(size.width, size.height)
}

impl<A: App> ApplicationHandler for AppState<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            log::error!("failed to start viewer: {e:#}");
            self.failure = Some(e);
            self.shutdown(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; presentation is paced by the surface present mode.
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref().filter(|w| w.id() == window_id) else {
            return;
        };
        let window = Arc::clone(window);

        if let Some(ev) = translate_window_event(window.scale_factor(), &event) {
            if self.app.on_input(&ev) == AppControl::Exit {
                self.shutdown(event_loop);
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested");
                self.shutdown(event_loop);
            }

            WindowEvent::Resized(new_size) => {
                self.app.on_resize(to_surface_size(new_size));
                window.request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                self.app.on_resize(to_surface_size(window.inner_size()));
                window.request_redraw();
            }

            WindowEvent::Occluded(false) => self.clock.reset(),

            WindowEvent::RedrawRequested => {
                let time = self.clock.tick();
                if self.app.on_frame(time) == AppControl::Exit {
                    self.shutdown(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            self.shutdown(event_loop);
        }
    }
}
