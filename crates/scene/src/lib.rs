//! Scene graph and the components that populate it.
//!
//! This crate provides:
//! - A flat scene graph of cameras and meshes
//! - Cameras with perspective and orthographic projections
//! - Orbit controls with damping
//! - The shared context handed to components
//! - [`CameraRig`] and [`World`], the per-frame scene components

pub mod camera;
pub mod context;
pub mod controls;
pub mod graph;
pub mod rig;
pub mod world;

pub use camera::{Camera, Projection};
pub use context::{
    RenderTarget, RendererHandle, RendererInfo, SharedSizes, Sizes, StageContext, shared_sizes,
};
pub use controls::{ControlEvent, OrbitControls, PointerButton};
pub use graph::{Mesh, Node, NodeId, SceneGraph, SceneHandle};
pub use rig::{CameraRig, CameraSettings, ViewportDimensions};
pub use stage_core::ProjectionKind;
pub use world::{TIME_UNIFORM, World};
