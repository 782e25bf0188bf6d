//! Dependencies shared by the scene components.
//!
//! The host owns every handle here and passes a [`StageContext`] to each
//! component's constructor. Any handle may be absent; components decide for
//! themselves which ones they need.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::graph::{SceneGraph, SceneHandle};

/// Current viewport dimensions in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sizes {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Sizes {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, pixel_ratio: f32) -> Self {
        self.pixel_ratio = pixel_ratio;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Both dimensions are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Viewport size shared between the host and the components reading it.
pub type SharedSizes = Rc<Cell<Sizes>>;

/// Create a shared size cell.
pub fn shared_sizes(sizes: Sizes) -> SharedSizes {
    Rc::new(Cell::new(sizes))
}

/// The surface input arrives on, the canvas of the render loop.
#[derive(Clone, Debug)]
pub struct RenderTarget {
    label: Rc<str>,
    size: SharedSizes,
}

impl RenderTarget {
    pub fn new(label: &str, size: SharedSizes) -> Self {
        Self {
            label: Rc::from(label),
            size,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Client area in logical pixels.
    pub fn client_size(&self) -> Vec2 {
        let sizes = self.size.get();
        Vec2::new(sizes.width, sizes.height)
    }

    /// Whether two handles refer to the same surface.
    pub fn same_target(&self, other: &RenderTarget) -> bool {
        Rc::ptr_eq(&self.label, &other.label)
    }
}

/// Information about the renderer drawing the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererInfo {
    pub backend: String,
    pub pixel_ratio: f32,
}

pub type RendererHandle = Rc<RendererInfo>;

/// Handles passed into component constructors.
#[derive(Clone, Debug, Default)]
pub struct StageContext {
    sizes: Option<SharedSizes>,
    scene: Option<SceneHandle>,
    canvas: Option<RenderTarget>,
    renderer: Option<RendererHandle>,
}

impl StageContext {
    /// An empty context with no handles.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with a fresh scene graph, the given viewport size and a
    /// canvas that tracks it. No renderer is attached.
    pub fn create(sizes: Sizes) -> Self {
        let sizes = shared_sizes(sizes);
        Self::new()
            .with_canvas(RenderTarget::new("canvas", sizes.clone()))
            .with_sizes(sizes)
            .with_scene(SceneGraph::shared())
    }

    pub fn with_sizes(mut self, sizes: SharedSizes) -> Self {
        self.sizes = Some(sizes);
        self
    }

    pub fn with_scene(mut self, scene: SceneHandle) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn with_canvas(mut self, canvas: RenderTarget) -> Self {
        self.canvas = Some(canvas);
        self
    }

    pub fn with_renderer(mut self, renderer: RendererHandle) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn sizes(&self) -> Option<&SharedSizes> {
        self.sizes.as_ref()
    }

    pub fn scene(&self) -> Option<&SceneHandle> {
        self.scene.as_ref()
    }

    pub fn canvas(&self) -> Option<&RenderTarget> {
        self.canvas.as_ref()
    }

    pub fn renderer(&self) -> Option<&RendererHandle> {
        self.renderer.as_ref()
    }

    /// Update the shared viewport size, as a resize handler would.
    ///
    /// Returns `false` if the context has no size cell.
    pub fn set_sizes(&self, sizes: Sizes) -> bool {
        match &self.sizes {
            Some(cell) => {
                cell.set(sizes);
                true
            }
            None => false,
        }
    }
}
