//! Translation of winit pointer events into orbit-control events.

use glam::Vec2;
use stage_scene::{ControlEvent, PointerButton};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pixels per wheel line, for devices that report whole lines.
const LINE_HEIGHT: f32 = 16.0;

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Tracks the cursor so button and wheel events can carry a position.
#[derive(Debug)]
pub struct PointerInput {
    /// Last cursor position in logical pixels
    position: Vec2,
    scale_factor: f64,
}

impl Default for PointerInput {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PointerInput {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            position: Vec2::ZERO,
            scale_factor,
        }
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Convert a window event, if it is one the controls care about.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<ControlEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(self.scale_factor);
                self.position = Vec2::new(logical.x, logical.y);
                Some(ControlEvent::PointerMove {
                    position: self.position,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = pointer_button(*button)?;
                Some(match state {
                    ElementState::Pressed => ControlEvent::PointerDown {
                        button,
                        position: self.position,
                    },
                    ElementState::Released => ControlEvent::PointerUp { button },
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports scrolling away from the user as positive y
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                Some(ControlEvent::Wheel { delta_y })
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
                None
            }
            _ => None,
        }
    }
}
