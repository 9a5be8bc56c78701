//! In-memory backend used by tests. Records what a GPU backend would be asked to do.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::backend::{FrameOutcome, RenderContext, SceneFrame, Surface, SurfaceSize};
use crate::error::{InitializationError, TextureLoadError};
use crate::texture::DecodedImage;

#[derive(Default)]
pub(crate) struct Probe {
    size: Cell<SurfaceSize>,

    contexts_created: Cell<usize>,
    live_contexts: Cell<usize>,
    live_textures: Cell<usize>,
    next_texture_id: Cell<u64>,

    uploads: Cell<usize>,
    renders: Cell<usize>,
    resizes: RefCell<Vec<SurfaceSize>>,
    last_texture: Cell<Option<u64>>,

    fail_context: Cell<bool>,
    fail_upload: Cell<bool>,
    fail_render: Cell<bool>,
}

impl Probe {
    pub(crate) fn set_size(&self, size: SurfaceSize) {
        self.size.set(size);
    }

    pub(crate) fn contexts_created(&self) -> usize {
        self.contexts_created.get()
    }

    pub(crate) fn live_contexts(&self) -> usize {
        self.live_contexts.get()
    }

    pub(crate) fn live_textures(&self) -> usize {
        self.live_textures.get()
    }

    pub(crate) fn uploads(&self) -> usize {
        self.uploads.get()
    }

    pub(crate) fn renders(&self) -> usize {
        self.renders.get()
    }

    pub(crate) fn resizes(&self) -> Vec<SurfaceSize> {
        self.resizes.borrow().clone()
    }

    /// Texture sampled by the most recent render (`None` = neutral material).
    pub(crate) fn last_texture(&self) -> Option<u64> {
        self.last_texture.get()
    }

    pub(crate) fn fail_context_creation(&self) {
        self.fail_context.set(true);
    }

    pub(crate) fn fail_next_upload(&self) {
        self.fail_upload.set(true);
    }

    pub(crate) fn fail_next_render(&self) {
        self.fail_render.set(true);
    }
}

pub(crate) struct HeadlessSurface {
    probe: Rc<Probe>,
}

impl HeadlessSurface {
    pub(crate) fn new(size: SurfaceSize, probe: Rc<Probe>) -> Self {
        probe.set_size(size);
        Self { probe }
    }
}

impl Surface for HeadlessSurface {
    type Context = HeadlessContext;

    fn size(&self) -> SurfaceSize {
        self.probe.size.get()
    }

    fn create_context(&self) -> Result<HeadlessContext, InitializationError> {
        if self.probe.fail_context.get() {
            return Err(InitializationError::context_creation("no adapter"));
        }
        let p = &self.probe;
        p.contexts_created.set(p.contexts_created.get() + 1);
        p.live_contexts.set(p.live_contexts.get() + 1);
        Ok(HeadlessContext { probe: Rc::clone(&self.probe) })
    }
}

pub(crate) struct HeadlessContext {
    probe: Rc<Probe>,
}

impl Drop for HeadlessContext {
    fn drop(&mut self) {
        let p = &self.probe;
        p.live_contexts.set(p.live_contexts.get() - 1);
    }
}

#[derive(Debug)]
pub(crate) struct HeadlessTexture {
    id: u64,
    probe: Rc<Probe>,
}

impl HeadlessTexture {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for HeadlessTexture {
    fn drop(&mut self) {
        let p = &self.probe;
        p.live_textures.set(p.live_textures.get() - 1);
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe").finish_non_exhaustive()
    }
}

impl RenderContext for HeadlessContext {
    type Texture = HeadlessTexture;

    fn resize(&mut self, size: SurfaceSize) {
        self.probe.resizes.borrow_mut().push(size);
    }

    fn upload_texture(&mut self, image: &DecodedImage) -> Result<HeadlessTexture, TextureLoadError> {
        let p = &self.probe;
        if p.fail_upload.replace(false) {
            return Err(TextureLoadError::Upload(format!(
                "refused {}x{}",
                image.width(),
                image.height()
            )));
        }
        let id = p.next_texture_id.get() + 1;
        p.next_texture_id.set(id);
        p.uploads.set(p.uploads.get() + 1);
        p.live_textures.set(p.live_textures.get() + 1);
        Ok(HeadlessTexture { id, probe: Rc::clone(&self.probe) })
    }

    fn render(&mut self, frame: &SceneFrame<'_, HeadlessTexture>) -> FrameOutcome {
        let p = &self.probe;
        if p.fail_render.replace(false) {
            return FrameOutcome::Fatal;
        }
        p.renders.set(p.renders.get() + 1);
        p.last_texture.set(frame.mesh.material().texture().map(HeadlessTexture::id));
        FrameOutcome::Presented
    }
}
