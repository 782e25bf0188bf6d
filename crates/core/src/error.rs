//! Error types shared across the stage crates.

use thiserror::Error;

/// Main error type for the stage.
#[derive(Error, Debug)]
pub enum Error {
    /// The shared context is missing something a component needs
    /// (scene graph, viewport size, render target).
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    /// An operation was attempted on a component whose handle was never
    /// created or has already been released.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Scene graph errors
    #[error("Scene error: {0}")]
    Scene(String),

    /// Window creation or management errors
    #[error("Window error: {0}")]
    Window(String),

    /// Resource loading errors
    #[error("Resource error: {0}")]
    Resource(String),

    /// Shader asset errors
    #[error("Shader error: {0}")]
    Shader(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the stage's Error type.
pub type Result<T> = std::result::Result<T, Error>;
