//! Runtime configuration.
//!
//! Every field has a default, so a config file only needs to name the values
//! it overrides:
//!
//! ```
//! let config = stage_core::Config::from_json_str(r#"{ "camera": { "kind": "orthographic" } }"#)
//!     .unwrap();
//! assert_eq!(config.camera.kind, stage_core::ProjectionKind::Orthographic);
//! assert_eq!(config.window.width, 1280);
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::{Error, Result};

/// Which projection a camera uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionKind {
    #[default]
    Perspective,
    Orthographic,
}

impl FromStr for ProjectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "perspective" => Ok(Self::Perspective),
            "orthographic" => Ok(Self::Orthographic),
            other => Err(Error::Config(format!("unknown projection kind '{other}'"))),
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Perspective => f.write_str("perspective"),
            Self::Orthographic => f.write_str("orthographic"),
        }
    }
}

/// Window settings for the host application.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Stage".to_string(),
        }
    }
}

/// Camera rig settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub kind: ProjectionKind,
    /// Vertical field of view of the perspective camera, in degrees
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_near: f32,
    pub ortho_far: f32,
    /// Fraction of the pending orbit motion applied per frame
    pub damping_factor: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            kind: ProjectionKind::Perspective,
            fov_y_degrees: 70.0,
            near: 0.01,
            far: 10.0,
            ortho_near: 1.0,
            ortho_far: 1000.0,
            damping_factor: 0.05,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
}

impl Config {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(Error::Config("window size must be non-zero".into()));
        }
        let camera = &self.camera;
        if !(camera.fov_y_degrees > 0.0 && camera.fov_y_degrees < 180.0) {
            return Err(Error::Config(format!(
                "fov_y_degrees must be in (0, 180), got {}",
                camera.fov_y_degrees
            )));
        }
        if camera.near <= 0.0 || camera.far <= camera.near {
            return Err(Error::Config("expected 0 < near < far".into()));
        }
        if camera.ortho_far <= camera.ortho_near {
            return Err(Error::Config("expected ortho_near < ortho_far".into()));
        }
        if !(camera.damping_factor > 0.0 && camera.damping_factor <= 1.0) {
            return Err(Error::Config("damping_factor must be in (0, 1]".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_rig_constants() {
        let config = Config::default();
        assert_eq!(config.camera.kind, ProjectionKind::Perspective);
        assert_eq!(config.camera.fov_y_degrees, 70.0);
        assert_eq!(config.camera.near, 0.01);
        assert_eq!(config.camera.far, 10.0);
        assert_eq!(config.camera.ortho_near, 1.0);
        assert_eq!(config.camera.ortho_far, 1000.0);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json_str(
            r#"{ "window": { "title": "demo" }, "camera": { "damping_factor": 0.1 } }"#,
        )
        .unwrap();
        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.damping_factor, 0.1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_json_str(r#"{ "camera": { "near": 5.0, "far": 1.0 } }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json_str(r#"{ "window": { "width": 0 } }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json_str("not json"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_projection_kind_from_str() {
        assert_eq!(
            "Orthographic".parse::<ProjectionKind>().unwrap(),
            ProjectionKind::Orthographic
        );
        assert_eq!(
            "perspective".parse::<ProjectionKind>().unwrap(),
            ProjectionKind::Perspective
        );
        assert!("fisheye".parse::<ProjectionKind>().is_err());
    }
}
