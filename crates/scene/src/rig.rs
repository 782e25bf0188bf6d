//! Camera rig: one camera in the scene plus, for perspective, orbit controls.

use glam::Vec3;
use stage_core::{CameraConfig, Error, ProjectionKind, Result};

use crate::camera::{Camera, Projection};
use crate::context::{RenderTarget, RendererHandle, SharedSizes, Sizes, StageContext};
use crate::controls::{ControlEvent, OrbitControls};
use crate::graph::{Node, NodeId, SceneHandle};

/// Fixed parameters the rig builds its camera from.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_near: f32,
    pub ortho_far: f32,
    pub damping_factor: f32,
    /// Initial camera position; the camera looks down -Z at the origin
    pub position: Vec3,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

impl From<&CameraConfig> for CameraSettings {
    fn from(config: &CameraConfig) -> Self {
        Self {
            fov_y_degrees: config.fov_y_degrees,
            near: config.near,
            far: config.far,
            ortho_near: config.ortho_near,
            ortho_far: config.ortho_far,
            damping_factor: config.damping_factor,
            position: Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Visible extent of the view frustum at some depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportDimensions {
    pub width: f32,
    pub height: f32,
}

/// Owns a camera node in the shared scene graph.
///
/// Construction never fails outright: if the context lacks what the camera
/// needs, the rig is created without a camera, a warning is logged, and every
/// later call becomes a no-op (or an [`Error::InvalidState`] for queries).
/// Use [`CameraRig::try_new`] to get the error instead.
#[derive(Debug)]
pub struct CameraRig {
    kind: ProjectionKind,
    settings: CameraSettings,
    camera: Option<NodeId>,
    controls: Option<OrbitControls>,
    scene: Option<SceneHandle>,
    sizes: Option<SharedSizes>,
    canvas: Option<RenderTarget>,
    renderer: Option<RendererHandle>,
}

impl CameraRig {
    /// Build a rig with the default camera settings.
    pub fn new(kind: ProjectionKind, ctx: &StageContext) -> Self {
        Self::with_settings(kind, ctx, CameraSettings::default())
    }

    pub fn with_settings(kind: ProjectionKind, ctx: &StageContext, settings: CameraSettings) -> Self {
        let mut rig = Self::detached(kind, ctx, settings);
        if let Err(err) = rig.set_instance() {
            tracing::warn!("Camera rig ({}) created without a camera: {}", kind, err);
        }
        rig
    }

    /// Like [`CameraRig::new`], but reports a missing prerequisite.
    pub fn try_new(kind: ProjectionKind, ctx: &StageContext) -> Result<Self> {
        Self::try_with_settings(kind, ctx, CameraSettings::default())
    }

    pub fn try_with_settings(
        kind: ProjectionKind,
        ctx: &StageContext,
        settings: CameraSettings,
    ) -> Result<Self> {
        let mut rig = Self::detached(kind, ctx, settings);
        rig.set_instance()?;
        Ok(rig)
    }

    fn detached(kind: ProjectionKind, ctx: &StageContext, settings: CameraSettings) -> Self {
        Self {
            kind,
            settings,
            camera: None,
            controls: None,
            scene: ctx.scene().cloned(),
            sizes: ctx.sizes().cloned(),
            canvas: ctx.canvas().cloned(),
            renderer: ctx.renderer().cloned(),
        }
    }

    fn set_instance(&mut self) -> Result<()> {
        let scene = self
            .scene
            .clone()
            .ok_or_else(|| Error::MissingPrerequisite("no scene graph".into()))?;
        let sizes = self
            .current_sizes()
            .ok_or_else(|| Error::MissingPrerequisite("no valid viewport size".into()))?;

        let camera = match self.kind {
            ProjectionKind::Perspective => Camera::perspective(
                self.settings.fov_y_degrees,
                sizes.aspect(),
                self.settings.near,
                self.settings.far,
            ),
            ProjectionKind::Orthographic => Camera::orthographic(
                -sizes.width / 2.0,
                sizes.width / 2.0,
                sizes.height / 2.0,
                -sizes.height / 2.0,
                self.settings.ortho_near,
                self.settings.ortho_far,
            ),
        }
        .with_position(self.settings.position);

        let id = scene
            .try_borrow_mut()
            .map_err(|_| Error::Scene("scene graph is already borrowed".into()))?
            .add(camera);
        self.camera = Some(id);

        match (self.kind, &self.canvas) {
            (ProjectionKind::Perspective, Some(canvas)) => {
                let mut controls = OrbitControls::new(id, canvas.clone());
                controls.enable_damping = true;
                controls.damping_factor = self.settings.damping_factor;
                self.controls = Some(controls);
            }
            (ProjectionKind::Perspective, None) => {
                tracing::warn!("No render target, camera {} has no orbit controls", id);
            }
            (ProjectionKind::Orthographic, _) => {}
        }

        tracing::debug!(
            "Camera rig created {} camera {} at {}x{}",
            self.kind,
            id,
            sizes.width,
            sizes.height
        );
        Ok(())
    }

    fn current_sizes(&self) -> Option<Sizes> {
        self.sizes
            .as_ref()
            .map(|cell| cell.get())
            .filter(Sizes::is_valid)
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// The camera node, while the rig holds one.
    pub fn camera_id(&self) -> Option<NodeId> {
        self.camera
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    pub fn has_controls(&self) -> bool {
        self.controls.is_some()
    }

    pub fn controls(&self) -> Option<&OrbitControls> {
        self.controls.as_ref()
    }

    pub fn controls_mut(&mut self) -> Option<&mut OrbitControls> {
        self.controls.as_mut()
    }

    /// The renderer handle read from the context. The rig keeps it for
    /// hosts but does not use it itself.
    pub fn renderer(&self) -> Option<&RendererHandle> {
        self.renderer.as_ref()
    }

    /// Run `f` against the rig's camera.
    pub fn with_camera<R>(&self, f: impl FnOnce(&Camera) -> R) -> Result<R> {
        let id = self
            .camera
            .ok_or_else(|| Error::InvalidState("camera rig has no camera".into()))?;
        let scene = self
            .scene
            .as_ref()
            .ok_or_else(|| Error::InvalidState("camera rig has no scene graph".into()))?;
        let graph = scene
            .try_borrow()
            .map_err(|_| Error::Scene("scene graph is mutably borrowed".into()))?;
        let camera = graph
            .camera(id)
            .ok_or_else(|| Error::InvalidState(format!("camera {id} is no longer in the scene")))?;
        Ok(f(camera))
    }

    /// Re-read the viewport size and update the projection.
    ///
    /// Perspective cameras only change aspect; orthographic cameras also
    /// recompute all four edges of the view volume.
    pub fn resize(&mut self) {
        let Some(id) = self.camera else {
            tracing::debug!("Resize ignored: camera rig has no camera");
            return;
        };
        let Some(sizes) = self.current_sizes() else {
            tracing::debug!("Resize ignored: no valid viewport size");
            return;
        };
        let Some(scene) = &self.scene else {
            return;
        };
        let Ok(mut graph) = scene.try_borrow_mut() else {
            tracing::warn!("Resize skipped: scene graph is already borrowed");
            return;
        };
        let Some(camera) = graph.camera_mut(id) else {
            tracing::warn!("Resize skipped: camera {} is no longer in the scene", id);
            return;
        };

        match &mut camera.projection {
            Projection::Perspective { aspect, .. } => {
                *aspect = sizes.aspect();
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                aspect,
                ..
            } => {
                *aspect = sizes.aspect();
                *left = -sizes.width / 2.0;
                *right = sizes.width / 2.0;
                *top = sizes.height / 2.0;
                *bottom = -sizes.height / 2.0;
            }
        }
        camera.update_projection_matrix();
        tracing::debug!("Camera {} resized to {}x{}", id, sizes.width, sizes.height);
    }

    /// Advance orbit-control damping by one frame.
    pub fn update(&mut self) {
        let (Some(controls), Some(id), Some(scene)) =
            (self.controls.as_mut(), self.camera, self.scene.as_ref())
        else {
            return;
        };
        let Ok(mut graph) = scene.try_borrow_mut() else {
            tracing::warn!("Controls update skipped: scene graph is already borrowed");
            return;
        };
        if let Some(camera) = graph.camera_mut(id)
            && controls.update(camera)
        {
            tracing::trace!("Camera {} moved to {}", id, camera.position);
        }
    }

    /// Forward input from the render target to the orbit controls.
    ///
    /// Returns whether the controls used the event.
    pub fn handle_control_event(&mut self, event: ControlEvent) -> bool {
        let (Some(controls), Some(id), Some(scene)) =
            (self.controls.as_mut(), self.camera, self.scene.as_ref())
        else {
            return false;
        };
        let Ok(graph) = scene.try_borrow() else {
            return false;
        };
        graph
            .camera(id)
            .is_some_and(|camera| controls.handle_event(event, camera))
    }

    /// Visible height of the perspective frustum `depth` units from the camera.
    pub fn visible_height_at_z_depth(&self, depth: f32) -> Result<f32> {
        let fov_y = self.perspective_fov()?.to_radians();
        Ok(2.0 * depth.abs() * (fov_y / 2.0).tan())
    }

    /// Visible width of the perspective frustum `depth` units from the camera.
    pub fn visible_width_at_z_depth(&self, depth: f32) -> Result<f32> {
        let height = self.visible_height_at_z_depth(depth)?;
        Ok(height * self.with_camera(Camera::aspect)?)
    }

    /// Visible width and height of the perspective frustum at `depth`.
    ///
    /// Fails with [`Error::InvalidState`] unless a perspective camera is active.
    pub fn viewport_dimensions_at_z_depth(&self, depth: f32) -> Result<ViewportDimensions> {
        Ok(ViewportDimensions {
            height: self.visible_height_at_z_depth(depth)?,
            width: self.visible_width_at_z_depth(depth)?,
        })
    }

    fn perspective_fov(&self) -> Result<f32> {
        self.with_camera(Camera::fov_y_degrees)?.ok_or_else(|| {
            Error::InvalidState("frustum dimensions need a perspective camera".into())
        })
    }

    /// Remove the camera from the scene and release it.
    ///
    /// The controls go with it. Calling this again is a no-op. If the scene
    /// graph is borrowed elsewhere nothing is released and the call can be
    /// retried.
    pub fn teardown(&mut self) -> Option<Camera> {
        let id = self.camera?;
        let scene = self.scene.as_ref()?;
        let Ok(mut graph) = scene.try_borrow_mut() else {
            tracing::warn!("Teardown of camera {} deferred: scene graph is borrowed", id);
            return None;
        };
        let removed = graph.remove(id);
        drop(graph);

        self.camera = None;
        self.controls = None;
        tracing::debug!("Camera rig released camera {}", id);

        match removed? {
            Node::Camera(camera) => Some(camera),
            Node::Mesh(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::shared_sizes;
    use crate::graph::SceneGraph;

    #[test]
    fn test_settings_defaults() {
        let settings = CameraSettings::default();
        assert_eq!(settings.fov_y_degrees, 70.0);
        assert_eq!(settings.near, 0.01);
        assert_eq!(settings.far, 10.0);
        assert_eq!(settings.position, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_missing_scene_leaves_rig_unusable() {
        let ctx = StageContext::new().with_sizes(shared_sizes(Sizes::new(800.0, 600.0)));
        let mut rig = CameraRig::new(ProjectionKind::Orthographic, &ctx);
        assert!(!rig.has_camera());
        assert!(!rig.has_controls());

        rig.resize();
        rig.update();
        assert!(rig.teardown().is_none());
        assert!(matches!(
            rig.with_camera(|_| ()),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_try_new_reports_missing_prerequisites() {
        let no_scene = StageContext::new().with_sizes(shared_sizes(Sizes::new(1.0, 1.0)));
        assert!(matches!(
            CameraRig::try_new(ProjectionKind::Perspective, &no_scene),
            Err(Error::MissingPrerequisite(_))
        ));

        let zero_height = StageContext::create(Sizes::new(800.0, 0.0));
        assert!(matches!(
            CameraRig::try_new(ProjectionKind::Orthographic, &zero_height),
            Err(Error::MissingPrerequisite(_))
        ));
        assert!(zero_height.scene().unwrap().borrow().is_empty());
    }

    #[test]
    fn test_perspective_without_render_target_has_no_controls() {
        let scene = SceneGraph::shared();
        let ctx = StageContext::new()
            .with_sizes(shared_sizes(Sizes::new(800.0, 600.0)))
            .with_scene(scene.clone());

        let rig = CameraRig::try_new(ProjectionKind::Perspective, &ctx).unwrap();
        assert!(rig.has_camera());
        assert!(!rig.has_controls());
        assert_eq!(scene.borrow().len(), 1);
        assert!(rig.viewport_dimensions_at_z_depth(1.0).is_ok());

        let rig = CameraRig::new(ProjectionKind::Orthographic, &ctx);
        assert!(rig.has_camera());
        assert!(!rig.has_controls());
    }

    #[test]
    fn test_teardown_while_scene_borrowed_can_be_retried() {
        let ctx = StageContext::create(Sizes::new(800.0, 600.0));
        let scene = ctx.scene().unwrap().clone();
        let mut rig = CameraRig::new(ProjectionKind::Perspective, &ctx);
        let id = rig.camera_id().unwrap();

        {
            let _guard = scene.borrow();
            assert!(rig.teardown().is_none());
        }
        assert_eq!(rig.camera_id(), Some(id));
        assert!(rig.has_controls());
        assert!(scene.borrow().contains(id));

        assert!(rig.teardown().is_some());
        assert!(!scene.borrow().contains(id));
        assert!(rig.camera_id().is_none());
        assert!(!rig.has_controls());
    }

    #[test]
    fn test_borrowed_scene_is_an_error_not_a_panic() {
        let ctx = StageContext::create(Sizes::new(800.0, 600.0));
        let _guard = ctx.scene().unwrap().borrow();
        assert!(matches!(
            CameraRig::try_new(ProjectionKind::Perspective, &ctx),
            Err(Error::Scene(_))
        ));
    }

    #[test]
    fn test_resize_after_teardown_is_noop() {
        let ctx = StageContext::create(Sizes::new(800.0, 600.0));
        let mut rig = CameraRig::new(ProjectionKind::Perspective, &ctx);
        assert!(rig.teardown().is_some());
        assert!(rig.teardown().is_none());

        ctx.set_sizes(Sizes::new(400.0, 600.0));
        rig.resize();
        rig.update();
        assert!(!rig.handle_control_event(ControlEvent::Wheel { delta_y: 1.0 }));
    }

    #[test]
    fn test_controls_follow_configured_damping() {
        let ctx = StageContext::create(Sizes::new(800.0, 600.0));
        let settings = CameraSettings {
            damping_factor: 0.2,
            ..CameraSettings::default()
        };
        let rig = CameraRig::with_settings(ProjectionKind::Perspective, &ctx, settings);
        let controls = rig.controls().unwrap();
        assert!(controls.enable_damping);
        assert_eq!(controls.damping_factor, 0.2);
        assert_eq!(Some(controls.camera()), rig.camera_id());
    }
}
