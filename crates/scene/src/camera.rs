//! Cameras and their projections.

use glam::{Mat4, Quat, Vec3};
use stage_core::ProjectionKind;

/// Projection parameters for a camera.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in degrees
        fov_y_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
        /// Viewport aspect ratio, tracked alongside the view volume
        aspect: f32,
    },
}

impl Projection {
    pub fn kind(&self) -> ProjectionKind {
        match self {
            Projection::Perspective { .. } => ProjectionKind::Perspective,
            Projection::Orthographic { .. } => ProjectionKind::Orthographic,
        }
    }

    pub fn aspect(&self) -> f32 {
        match *self {
            Projection::Perspective { aspect, .. } | Projection::Orthographic { aspect, .. } => {
                aspect
            }
        }
    }

    pub fn near(&self) -> f32 {
        match *self {
            Projection::Perspective { near, .. } | Projection::Orthographic { near, .. } => near,
        }
    }

    pub fn far(&self) -> f32 {
        match *self {
            Projection::Perspective { far, .. } | Projection::Orthographic { far, .. } => far,
        }
    }

    fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective {
                fov_y_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y_degrees.to_radians(), aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
                ..
            } => Mat4::orthographic_rh(left, right, bottom, top, near, far),
        }
    }
}

/// A camera placed in the scene.
///
/// The projection parameters are public; after changing them call
/// [`Camera::update_projection_matrix`] so the cached matrix follows.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Camera rotation; the identity looks down -Z with +Y up
    pub rotation: Quat,
    /// Projection settings
    pub projection: Projection,
    projection_matrix: Mat4,
}

impl Camera {
    /// Create a perspective camera at the origin.
    pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Perspective {
            fov_y_degrees,
            aspect,
            near,
            far,
        })
    }

    /// Create an orthographic camera at the origin.
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Orthographic {
            left,
            right,
            top,
            bottom,
            near,
            far,
            aspect: (right - left) / (top - bottom),
        })
    }

    fn with_projection(projection: Projection) -> Self {
        let projection_matrix = projection.matrix();
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection,
            projection_matrix,
        }
    }

    /// Builder-style position setter.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn kind(&self) -> ProjectionKind {
        self.projection.kind()
    }

    pub fn aspect(&self) -> f32 {
        self.projection.aspect()
    }

    /// Vertical field of view in degrees, for perspective cameras.
    pub fn fov_y_degrees(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov_y_degrees, .. } => Some(fov_y_degrees),
            Projection::Orthographic { .. } => None,
        }
    }

    /// Update the aspect ratio and the projection matrix.
    pub fn set_aspect(&mut self, new_aspect: f32) {
        match &mut self.projection {
            Projection::Perspective { aspect, .. } | Projection::Orthographic { aspect, .. } => {
                *aspect = new_aspect;
            }
        }
        self.update_projection_matrix();
    }

    /// Recompute the projection matrix from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = self.projection.matrix();
    }

    /// The projection matrix as of the last update.
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// World-to-camera transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }

    /// Get the forward direction vector.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the right direction vector.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction vector.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate to face `target`, keeping +Y as up.
    ///
    /// Does nothing if the target is at the camera position. Straight above
    /// or below, +Y cannot be kept, so the shortest turn onto the target is
    /// used instead.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() <= f32::EPSILON {
            return;
        }
        let forward = forward.normalize();
        if forward.cross(Vec3::Y).length_squared() <= f32::EPSILON {
            self.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, forward);
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }
}
