//! Opaque shader source text.
//!
//! Sources are never parsed here; they are handed to whatever backend
//! compiles them.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::{ResourceError, ResourceResult};

const BASE_VERTEX: &str = include_str!("../shaders/base/vertex.glsl");
const BASE_FRAGMENT: &str = include_str!("../shaders/base/fragment.glsl");

/// Pipeline stage a shader source belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader text for one stage. Cloning shares the underlying text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    stage: ShaderStage,
    label: String,
    text: Arc<str>,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, label: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            stage,
            label: label.into(),
            text: text.into(),
        }
    }

    /// Read a shader source from disk.
    ///
    /// The file name becomes the label.
    pub fn from_file(stage: ShaderStage, path: &Path) -> ResourceResult<Self> {
        if !path.exists() {
            return Err(ResourceError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ResourceError::ShaderRead {
            path: path.to_path_buf(),
            source,
        })?;
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if text.trim().is_empty() {
            return Err(ResourceError::EmptyShader(label));
        }
        tracing::debug!("Loaded {} shader '{}' ({} bytes)", stage, label, text.len());
        Ok(Self::new(stage, label, text))
    }

    /// The base vertex shader bundled with the crate.
    pub fn base_vertex() -> Self {
        Self::new(ShaderStage::Vertex, "base/vertex.glsl", BASE_VERTEX)
    }

    /// The base fragment shader bundled with the crate.
    pub fn base_fragment() -> Self {
        Self::new(ShaderStage::Fragment, "base/fragment.glsl", BASE_FRAGMENT)
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
