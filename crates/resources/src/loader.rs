//! Resource loading with a one-shot "ready" notification.
//!
//! Components that need loaded assets hold a [`ReadySignal`] and build
//! themselves once it fires, instead of building at construction time.

use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::shader::{ShaderSource, ShaderStage};
use crate::{ResourceError, ResourceResult};

/// Name of the base vertex shader resource.
pub const BASE_VERTEX: &str = "base.vertex";
/// Name of the base fragment shader resource.
pub const BASE_FRAGMENT: &str = "base.fragment";

/// Observer half of the loader's ready flag.
///
/// Fires at most once and never resets.
#[derive(Clone, Debug, Default)]
pub struct ReadySignal(Rc<Cell<bool>>);

impl ReadySignal {
    pub fn is_ready(&self) -> bool {
        self.0.get()
    }
}

#[derive(Debug)]
struct ShaderEntry {
    stage: ShaderStage,
    path: PathBuf,
}

/// Named shader resources.
#[derive(Debug, Default)]
pub struct Resources {
    pending: HashMap<String, ShaderEntry>,
    shaders: HashMap<String, ShaderSource>,
    ready: ReadySignal,
}

impl Resources {
    /// An empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader that is already ready and holds the bundled base shaders.
    pub fn bundled() -> Self {
        let mut resources = Self::new();
        resources
            .shaders
            .insert(BASE_VERTEX.to_string(), ShaderSource::base_vertex());
        resources
            .shaders
            .insert(BASE_FRAGMENT.to_string(), ShaderSource::base_fragment());
        resources.ready.0.set(true);
        resources
    }

    /// A loader for the base shaders found under `dir`
    /// (`base/vertex.glsl` and `base/fragment.glsl`).
    pub fn base_from_dir(dir: &Path) -> Self {
        Self::new()
            .with_shader(BASE_VERTEX, ShaderStage::Vertex, dir.join("base/vertex.glsl"))
            .with_shader(
                BASE_FRAGMENT,
                ShaderStage::Fragment,
                dir.join("base/fragment.glsl"),
            )
    }

    /// Register a shader file to be read by [`Resources::load`].
    pub fn with_shader(
        mut self,
        name: impl Into<String>,
        stage: ShaderStage,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.pending.insert(
            name.into(),
            ShaderEntry {
                stage,
                path: path.into(),
            },
        );
        self
    }

    /// Read every registered file and fire the ready signal.
    ///
    /// Nothing is kept if any file fails; the signal stays unfired and
    /// `load` may be retried. Once ready, further calls do nothing.
    pub fn load(&mut self) -> ResourceResult<()> {
        if self.is_ready() {
            return Ok(());
        }

        let mut loaded = HashMap::with_capacity(self.pending.len());
        for (name, entry) in &self.pending {
            let source = ShaderSource::from_file(entry.stage, &entry.path)?;
            loaded.insert(name.clone(), source);
        }

        self.pending.clear();
        self.shaders.extend(loaded);
        self.ready.0.set(true);
        tracing::info!("Resources ready ({} shaders)", self.shaders.len());
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.is_ready()
    }

    /// A handle that observes when loading completes.
    pub fn ready_signal(&self) -> ReadySignal {
        self.ready.clone()
    }

    /// Look up a loaded shader by name.
    pub fn shader(&self, name: &str) -> ResourceResult<&ShaderSource> {
        if !self.is_ready() {
            return Err(ResourceError::NotReady);
        }
        self.shaders
            .get(name)
            .ok_or_else(|| ResourceError::Unknown(name.to_string()))
    }
}
