//! Error types for resource loading.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Failed to read a shader file.
    #[error("Failed to read shader '{path}': {source}")]
    ShaderRead {
        /// Path to the file that failed to load.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A shader file was read but contains no source text.
    #[error("Shader '{0}' is empty")]
    EmptyShader(String),

    /// A resource was requested by a name the loader does not know.
    #[error("Unknown resource '{0}'")]
    Unknown(String),

    /// A resource was requested before loading finished.
    #[error("Resources are not ready")]
    NotReady,
}

impl From<ResourceError> for stage_core::Error {
    fn from(err: ResourceError) -> Self {
        stage_core::Error::Resource(err.to_string())
    }
}

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
