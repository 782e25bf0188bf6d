//! Orbit controls with optional damping.
//!
//! The camera orbits `target` on a sphere (Y up). Input events queue a
//! rotation, pan or dolly; [`OrbitControls::update`] applies it. With
//! damping enabled each update applies `damping_factor` of what is queued
//! and lets the rest decay, so motion continues for a few frames after the
//! pointer stops.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::{Camera, Projection};
use crate::context::RenderTarget;
use crate::graph::NodeId;

const EPS: f32 = 1e-6;

/// Pointer buttons the controls react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Input delivered from the render target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlEvent {
    PointerDown { button: PointerButton, position: Vec2 },
    PointerMove { position: Vec2 },
    PointerUp { button: PointerButton },
    /// Positive scrolls away from the user (zooms out)
    Wheel { delta_y: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Idle,
    Rotate,
    Pan,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    /// Polar angle from +Y
    phi: f32,
    /// Azimuth around Y, from +Z toward +X
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < EPS {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Orbit-style camera controls bound to one camera and one render target.
#[derive(Debug)]
pub struct OrbitControls {
    /// Point the camera orbits around
    pub target: Vec3,
    pub enabled: bool,
    pub enable_damping: bool,
    /// Fraction of queued motion applied per update when damping
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    camera: NodeId,
    surface: RenderTarget,

    spherical_delta: Spherical,
    pan_offset: Vec3,
    scale: f32,
    gesture: Gesture,
    pointer: Vec2,
}

impl OrbitControls {
    /// Bind controls to a camera node and the surface its input comes from.
    pub fn new(camera: NodeId, surface: RenderTarget) -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            camera,
            surface,
            spherical_delta: Spherical::default(),
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            gesture: Gesture::Idle,
            pointer: Vec2::ZERO,
        }
    }

    /// The camera node these controls drive.
    pub fn camera(&self) -> NodeId {
        self.camera
    }

    pub fn surface(&self) -> &RenderTarget {
        &self.surface
    }

    /// Whether any rotation or pan is still queued.
    pub fn is_moving(&self) -> bool {
        self.spherical_delta.theta.abs() > EPS
            || self.spherical_delta.phi.abs() > EPS
            || self.pan_offset.length_squared() > EPS
            || (self.scale - 1.0).abs() > EPS
    }

    /// Queue a rotation around the Y axis.
    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    /// Queue a rotation toward the pole.
    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Queue moving the camera closer by `scale` (< 1 zooms in).
    pub fn dolly(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale *= scale;
        }
    }

    /// Queue a pan by a pointer movement of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2, camera: &Camera) {
        let client = self.surface.client_size();
        if client.x <= 0.0 || client.y <= 0.0 {
            return;
        }
        let (dx, dy) = match camera.projection {
            Projection::Perspective { fov_y_degrees, .. } => {
                let offset = camera.position - self.target;
                let target_distance =
                    offset.length() * (fov_y_degrees.to_radians() / 2.0).tan();
                (
                    2.0 * delta.x * target_distance / client.y,
                    2.0 * delta.y * target_distance / client.y,
                )
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                ..
            } => (
                delta.x * (right - left) / client.x,
                delta.y * (top - bottom) / client.y,
            ),
        };
        self.pan_offset += camera.right() * -dx * self.pan_speed;
        self.pan_offset += camera.up() * dy * self.pan_speed;
    }

    /// Feed one input event. Returns whether the event was used.
    pub fn handle_event(&mut self, event: ControlEvent, camera: &Camera) -> bool {
        if !self.enabled {
            return false;
        }
        match event {
            ControlEvent::PointerDown { button, position } => {
                self.gesture = match button {
                    PointerButton::Primary => Gesture::Rotate,
                    PointerButton::Secondary | PointerButton::Middle => Gesture::Pan,
                };
                self.pointer = position;
                true
            }
            ControlEvent::PointerMove { position } => {
                let delta = position - self.pointer;
                self.pointer = position;
                match self.gesture {
                    Gesture::Idle => false,
                    Gesture::Rotate => {
                        let client_height = self.surface.client_size().y;
                        if client_height <= 0.0 {
                            return false;
                        }
                        let scale = TAU * self.rotate_speed / client_height;
                        self.rotate_left(delta.x * scale);
                        self.rotate_up(delta.y * scale);
                        true
                    }
                    Gesture::Pan => {
                        self.pan(delta, camera);
                        true
                    }
                }
            }
            ControlEvent::PointerUp { .. } => {
                let was_active = self.gesture != Gesture::Idle;
                self.gesture = Gesture::Idle;
                was_active
            }
            ControlEvent::Wheel { delta_y } => {
                let zoom_scale = 0.95_f32.powf(self.zoom_speed);
                if delta_y < 0.0 {
                    self.dolly(zoom_scale);
                } else if delta_y > 0.0 {
                    self.dolly(1.0 / zoom_scale);
                } else {
                    return false;
                }
                true
            }
        }
    }

    /// Apply one step of queued motion to `camera`.
    ///
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_offset(offset);
        if spherical.radius < EPS {
            return false;
        }

        let previous_position = camera.position;
        let previous_rotation = camera.rotation;

        if self.enable_damping {
            spherical.theta += self.spherical_delta.theta * self.damping_factor;
            spherical.phi += self.spherical_delta.phi * self.damping_factor;
            self.target += self.pan_offset * self.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
            self.target += self.pan_offset;
        }

        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous_position.distance_squared(camera.position) > EPS
            || 8.0 * (1.0 - previous_rotation.dot(camera.rotation).abs()) > EPS
    }
}
