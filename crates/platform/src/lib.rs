//! Platform layer for the stage.
//!
//! This crate provides platform-specific functionality:
//! - Window management via winit
//! - Pointer input translated into orbit-control events

mod input;
mod window;

pub use input::PointerInput;
pub use window::Window;

// Re-export winit types that users might need
pub use winit::event::WindowEvent;
pub use winit::event_loop::EventLoop;
