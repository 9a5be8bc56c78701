//! Scene lifecycle manager.
//!
//! Lifecycle: `Constructed → Running → Disposed`, with `Stopped` entered when the
//! backend reports a fatal frame. All methods are called from the host's
//! thread; only decoding runs elsewhere.

use crate::backend::{FrameOutcome, RenderContext, SceneFrame, Surface};
use crate::camera::{self, Camera};
use crate::config::ViewerConfig;
use crate::error::{InitializationError, TextureLoadError};
use crate::geometry::CuboidGeometry;
use crate::material::Material;
use crate::mesh::CuboidMesh;
use crate::texture::{
    DecodedImage, LoadState, OperationId, ProgressSink, Spawn, TextureLoadTracker, ThreadSpawner,
};

/// Resources created by `run`.
///
/// Fields drop in declaration order: the mesh (and the texture held by its
/// material) is released before the context that created it.
struct Scene<C: RenderContext> {
    mesh: CuboidMesh<C::Texture>,
    camera: Camera,
    context: C,
}

impl<C: RenderContext> Scene<C> {
    fn bind_image(&mut self, image: DecodedImage) -> Result<(), TextureLoadError> {
        let texture = self.context.upload_texture(&image)?;
        let previous = self
            .mesh
            .replace_material_surface(Material::textured(texture, image.width(), image.height()));
        drop(previous);
        Ok(())
    }

    fn render(&mut self, clear_color: [f32; 4]) -> FrameOutcome {
        let frame = SceneFrame {
            view_proj: self.camera.view_proj(),
            model: self.mesh.orientation().model_matrix(),
            light_dir: camera::light_direction(),
            ambient: camera::AMBIENT,
            clear_color,
            mesh: &self.mesh,
        };
        self.context.render(&frame)
    }
}

enum Lifecycle<C: RenderContext> {
    Constructed,
    Running(Scene<C>),
    /// Render loop halted after a fatal frame; resources live until disposal.
    Stopped(Scene<C>),
    Disposed,
}

/// Displays an image texture-mapped onto a cuboid.
///
/// The host calls [`tick`](Self::tick) once per display refresh after
/// [`run`](Self::run); that call is the render loop.
pub struct CuboidViewer<S: Surface> {
    config: ViewerConfig,
    auto_rotate: bool,

    // Released by `dispose` in this order: tracker, scene, surface.
    tracker: Option<TextureLoadTracker>,
    lifecycle: Lifecycle<S::Context>,
    surface: Option<S>,
}

impl<S: Surface> CuboidViewer<S> {
    /// Binds to `surface`. No rendering work happens until `run`.
    pub fn new(surface: S, sink: impl ProgressSink + 'static) -> Result<Self, InitializationError> {
        Self::with_config(surface, sink, ViewerConfig::default())
    }

    pub fn with_config(
        surface: S,
        sink: impl ProgressSink + 'static,
        config: ViewerConfig,
    ) -> Result<Self, InitializationError> {
        Self::with_spawner(surface, sink, config, Box::new(ThreadSpawner))
    }

    /// Like [`with_config`](Self::with_config) with a custom decode spawner.
    pub fn with_spawner(
        surface: S,
        sink: impl ProgressSink + 'static,
        config: ViewerConfig,
        spawner: Box<dyn Spawn>,
    ) -> Result<Self, InitializationError> {
        let size = surface.size();
        if size.is_empty() {
            return Err(InitializationError::SurfaceUnavailable {
                width: size.width,
                height: size.height,
            });
        }

        let tracker = TextureLoadTracker::new(config.loader, spawner, Box::new(sink));

        Ok(Self {
            config,
            auto_rotate: true,
            tracker: Some(tracker),
            lifecycle: Lifecycle::Constructed,
            surface: Some(surface),
        })
    }

    /// Creates the render context and the cuboid, and enters the render loop.
    ///
    /// Idempotent. A no-op after `dispose`.
    pub fn run(&mut self) -> Result<(), InitializationError> {
        match self.lifecycle {
            Lifecycle::Constructed => {}
            Lifecycle::Running(_) | Lifecycle::Stopped(_) => return Ok(()),
            Lifecycle::Disposed => {
                log::warn!("run() called on a disposed cuboid viewer; ignored");
                return Ok(());
            }
        }

        let Some(surface) = self.surface.as_ref() else {
            return Ok(());
        };

        let size = surface.size();
        if size.is_empty() {
            return Err(InitializationError::SurfaceUnavailable {
                width: size.width,
                height: size.height,
            });
        }

        let context = surface.create_context()?;
        let geometry = CuboidGeometry::new(self.config.dimensions);
        let mesh = CuboidMesh::new(geometry, self.config.neutral_color);
        let camera = Camera::new(&self.config.camera, size.width, size.height);

        self.lifecycle = Lifecycle::Running(Scene { mesh, camera, context });
        log::info!("cuboid viewer running at {}x{}", size.width, size.height);
        Ok(())
    }

    /// Starts loading `source` (a base64 `data:image/...` URL) as the cuboid texture.
    ///
    /// Any load still in flight is superseded; `sink` replaces the previous sink
    /// and immediately receives 0. The mesh keeps showing its current material
    /// until the new image is bound.
    pub fn update_texture(
        &mut self,
        source: impl Into<String>,
        sink: impl ProgressSink + 'static,
    ) -> Option<OperationId> {
        let Some(tracker) = self.tracker.as_mut() else {
            log::warn!("update_texture() called on a disposed cuboid viewer; ignored");
            return None;
        };
        tracker.set_sink(Box::new(sink));
        Some(tracker.begin(source.into()))
    }

    /// Matches output size and projection to the surface's current size.
    pub fn resize(&mut self) {
        let Some(surface) = self.surface.as_ref() else {
            log::warn!("resize() called on a disposed cuboid viewer; ignored");
            return;
        };

        match &mut self.lifecycle {
            Lifecycle::Running(scene) | Lifecycle::Stopped(scene) => {
                let size = surface.size();
                scene.context.resize(size);
                scene.camera.set_viewport(size.width, size.height);
                log::debug!("cuboid viewer resized to {}x{}", size.width, size.height);
            }
            Lifecycle::Constructed | Lifecycle::Disposed => {}
        }
    }

    /// One render-loop iteration: bind finished loads, advance the spin, repaint.
    ///
    /// `dt` is the time since the previous tick, in seconds.
    pub fn tick(&mut self, dt: f32) -> FrameOutcome {
        let scene = match &mut self.lifecycle {
            Lifecycle::Running(scene) => scene,
            Lifecycle::Stopped(scene) => {
                // Finished loads still settle (or fail) while stopped.
                if let Some(tracker) = self.tracker.as_mut() {
                    tracker.pump(|image| scene.bind_image(image));
                }
                return FrameOutcome::Skipped;
            }
            Lifecycle::Constructed | Lifecycle::Disposed => return FrameOutcome::Skipped,
        };

        if let Some(tracker) = self.tracker.as_mut() {
            tracker.pump(|image| scene.bind_image(image));
        }

        if self.auto_rotate && dt > 0.0 {
            scene.mesh.orientation_mut().rotate(self.config.spin_speed * dt, 0.0);
        }

        let outcome = scene.render(self.config.clear_color);
        if outcome == FrameOutcome::Fatal {
            log::error!("render context failed; stopping the render loop");
            self.stop();
        }
        outcome
    }

    /// Applies user-driven rotation, in radians.
    pub fn rotate_by(&mut self, dyaw: f32, dpitch: f32) {
        match &mut self.lifecycle {
            Lifecycle::Running(scene) | Lifecycle::Stopped(scene) => {
                scene.mesh.orientation_mut().rotate(dyaw, dpitch);
            }
            Lifecycle::Constructed => {}
            Lifecycle::Disposed => log::warn!("rotate_by() called on a disposed cuboid viewer; ignored"),
        }
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        self.auto_rotate = enabled;
    }

    /// Releases the tracker, mesh, materials, render context, and surface.
    ///
    /// Idempotent. Loads still decoding are cancelled and can never report again.
    pub fn dispose(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Disposed) {
            return;
        }

        self.tracker = None;
        self.lifecycle = Lifecycle::Disposed;
        self.surface = None;
        log::info!("cuboid viewer disposed");
    }

    pub fn is_running(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Running(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Disposed)
    }

    /// State of the newest texture load. `Idle` once disposed.
    pub fn load_state(&self) -> LoadState {
        self.tracker.as_ref().map_or(LoadState::Idle, TextureLoadTracker::state)
    }

    /// Latest progress delivered for the newest texture load.
    pub fn progress(&self) -> Option<u8> {
        self.tracker.as_ref().and_then(TextureLoadTracker::progress)
    }

    /// The cuboid, once running.
    pub fn mesh(&self) -> Option<&CuboidMesh<<S::Context as RenderContext>::Texture>> {
        match &self.lifecycle {
            Lifecycle::Running(scene) | Lifecycle::Stopped(scene) => Some(&scene.mesh),
            Lifecycle::Constructed | Lifecycle::Disposed => None,
        }
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    fn stop(&mut self) {
        let lifecycle = std::mem::replace(&mut self.lifecycle, Lifecycle::Disposed);
        self.lifecycle = match lifecycle {
            Lifecycle::Running(scene) => Lifecycle::Stopped(scene),
            other => other,
        };
    }
}

impl<S: Surface> Drop for CuboidViewer<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
