//! Core utilities for the stage.
//!
//! This crate provides foundational types used across the workspace:
//! - Error types and result aliases
//! - Logging initialization
//! - Frame timer
//! - Configuration loading

mod config;
mod error;
mod logging;
mod timer;

pub use config::{CameraConfig, Config, ProjectionKind, WindowConfig};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use timer::Timer;
