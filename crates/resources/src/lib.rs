//! Resource definitions and loading.
//!
//! This crate handles the data a scene mesh is built from:
//! - Plane geometry
//! - Shader materials and their uniforms
//! - Opaque shader sources
//! - A resource loader with a one-shot ready signal

mod error;
pub mod geometry;
pub mod loader;
pub mod material;
pub mod shader;

pub use error::{ResourceError, ResourceResult};
pub use geometry::Geometry;
pub use loader::{BASE_FRAGMENT, BASE_VERTEX, ReadySignal, Resources};
pub use material::{ShaderMaterial, Side, Uniform};
pub use shader::{ShaderSource, ShaderStage};
