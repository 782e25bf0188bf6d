//! Integration tests for the camera rig and world against a shared scene.

use stage_core::Error;
use stage_resources::{ShaderSource, Uniform};
use stage_scene::{
    CameraRig, ControlEvent, Node, PointerButton, Projection, ProjectionKind, Sizes, StageContext,
    TIME_UNIFORM, World,
};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

const VIEWPORTS: [(f32, f32); 6] = [
    (800.0, 600.0),
    (200.0, 100.0),
    (1920.0, 1080.0),
    (1.0, 1.0),
    (333.0, 777.0),
    (4096.0, 3.0),
];

fn ortho_edges(rig: &CameraRig) -> (f32, f32, f32, f32, f32, f32) {
    rig.with_camera(|camera| match camera.projection {
        Projection::Orthographic {
            left,
            right,
            top,
            bottom,
            near,
            far,
            ..
        } => (left, right, top, bottom, near, far),
        Projection::Perspective { .. } => panic!("Expected an orthographic camera"),
    })
    .expect("Rig should have a camera")
}

#[test]
fn test_orthographic_edges_span_viewport() {
    for (w, h) in VIEWPORTS {
        let ctx = StageContext::create(Sizes::new(w, h));
        let mut rig = CameraRig::new(ProjectionKind::Orthographic, &ctx);

        let (left, right, top, bottom, _, _) = ortho_edges(&rig);
        assert!(approx_eq(right - left, w), "width for {w}x{h}");
        assert!(approx_eq(top - bottom, h), "height for {w}x{h}");

        // Swap the dimensions and resize
        ctx.set_sizes(Sizes::new(h, w));
        rig.resize();
        let (left, right, top, bottom, _, _) = ortho_edges(&rig);
        assert!(approx_eq(right - left, h), "resized width for {h}x{w}");
        assert!(approx_eq(top - bottom, w), "resized height for {h}x{w}");
        assert!(approx_eq(rig.with_camera(|c| c.aspect()).unwrap(), h / w));
    }
}

#[test]
fn test_perspective_aspect_tracks_viewport() {
    for (w, h) in VIEWPORTS {
        let ctx = StageContext::create(Sizes::new(w, h));
        let mut rig = CameraRig::new(ProjectionKind::Perspective, &ctx);
        assert!(approx_eq(rig.with_camera(|c| c.aspect()).unwrap(), w / h));

        let new_h = h * 2.0;
        ctx.set_sizes(Sizes::new(w, new_h));
        rig.resize();
        assert!(approx_eq(rig.with_camera(|c| c.aspect()).unwrap(), w / new_h));
    }
}

#[test]
fn test_controls_only_for_perspective() {
    let ctx = StageContext::create(Sizes::new(800.0, 600.0));
    let perspective = CameraRig::new(ProjectionKind::Perspective, &ctx);
    let orthographic = CameraRig::new(ProjectionKind::Orthographic, &ctx);
    assert!(perspective.has_controls());
    assert!(!orthographic.has_controls());

    // Default kind is perspective
    let default = CameraRig::new(ProjectionKind::default(), &ctx);
    assert_eq!(default.kind(), ProjectionKind::Perspective);
    assert!(default.has_controls());
}

#[test]
fn test_teardown_removes_exactly_its_camera() {
    let ctx = StageContext::create(Sizes::new(800.0, 600.0));
    let scene = ctx.scene().unwrap().clone();
    let mut first = CameraRig::new(ProjectionKind::Perspective, &ctx);
    let second = CameraRig::new(ProjectionKind::Orthographic, &ctx);
    let first_id = first.camera_id().unwrap();
    let second_id = second.camera_id().unwrap();
    assert_eq!(scene.borrow().len(), 2);

    let removed = first.teardown().expect("Camera should be returned");
    assert_eq!(removed.kind(), ProjectionKind::Perspective);
    assert!(!scene.borrow().contains(first_id));
    assert!(scene.borrow().contains(second_id));
    assert_eq!(scene.borrow().len(), 1);

    assert!(first.camera_id().is_none());
    assert!(!first.has_controls());
    assert!(matches!(
        first.with_camera(|_| ()),
        Err(Error::InvalidState(_))
    ));
}

#[test]
fn test_perspective_800x600_then_400x600() {
    let ctx = StageContext::create(Sizes::new(800.0, 600.0));
    let mut rig = CameraRig::new(ProjectionKind::Perspective, &ctx);

    let before = rig.with_camera(|c| c.projection.clone()).unwrap();
    assert!(approx_eq(before.aspect(), 4.0 / 3.0));

    ctx.set_sizes(Sizes::new(400.0, 600.0));
    rig.resize();

    let after = rig.with_camera(|c| c.projection.clone()).unwrap();
    assert!(approx_eq(after.aspect(), 2.0 / 3.0));
    match (before, after) {
        (
            Projection::Perspective {
                fov_y_degrees: fov_a,
                near: near_a,
                far: far_a,
                ..
            },
            Projection::Perspective {
                fov_y_degrees: fov_b,
                near: near_b,
                far: far_b,
                ..
            },
        ) => {
            assert_eq!(fov_a, 70.0);
            assert_eq!(fov_a, fov_b);
            assert_eq!(near_a, 0.01);
            assert_eq!(near_a, near_b);
            assert_eq!(far_a, 10.0);
            assert_eq!(far_a, far_b);
        }
        other => panic!("Expected perspective projections, got {:?}", other),
    }

    // The cached matrix follows the new aspect
    let matrix = rig.with_camera(|c| c.projection_matrix()).unwrap();
    let expected = glam::Mat4::perspective_rh(70.0_f32.to_radians(), 400.0 / 600.0, 0.01, 10.0);
    assert!(matrix.abs_diff_eq(expected, 1e-6));
}

#[test]
fn test_orthographic_200x100() {
    let ctx = StageContext::create(Sizes::new(200.0, 100.0));
    let rig = CameraRig::new(ProjectionKind::Orthographic, &ctx);
    let (left, right, top, bottom, near, far) = ortho_edges(&rig);
    assert_eq!(left, -100.0);
    assert_eq!(right, 100.0);
    assert_eq!(top, 50.0);
    assert_eq!(bottom, -50.0);
    assert_eq!(near, 1.0);
    assert_eq!(far, 1000.0);

    let position = rig.with_camera(|c| c.position).unwrap();
    assert_eq!(position, glam::Vec3::new(0.0, 0.0, 1.0));
}

#[test]
fn test_world_adds_one_mesh_with_zero_time() {
    let ctx = StageContext::create(Sizes::new(800.0, 600.0));
    let scene = ctx.scene().unwrap().clone();
    assert!(scene.borrow().is_empty());

    let world = World::new(&ctx, ShaderSource::base_vertex(), ShaderSource::base_fragment())
        .expect("World should build");

    let graph = scene.borrow();
    assert_eq!(graph.len(), 1);
    let meshes: Vec<_> = graph.meshes().collect();
    assert_eq!(meshes.len(), 1);
    let (id, mesh) = meshes[0];
    assert_eq!(Some(id), world.mesh_id());
    assert_eq!(
        mesh.material.uniform(TIME_UNIFORM),
        Some(&Uniform::Float(0.0))
    );
}

#[test]
fn test_viewport_dimensions_at_depth() {
    // 1.5 aspect
    let ctx = StageContext::create(Sizes::new(900.0, 600.0));
    let rig = CameraRig::new(ProjectionKind::Perspective, &ctx);

    let dims = rig.viewport_dimensions_at_z_depth(5.0).unwrap();
    let expected_height = 2.0 * 5.0 * 35.0_f32.to_radians().tan();
    assert!(approx_eq(dims.height, expected_height));
    assert!((dims.height - 7.002).abs() < 1e-3);
    assert!((dims.width - 10.503).abs() < 1e-3);

    // Depth sign does not matter
    let behind = rig.viewport_dimensions_at_z_depth(-5.0).unwrap();
    assert_eq!(behind, dims);
}

#[test]
fn test_viewport_dimensions_need_perspective_camera() {
    let ctx = StageContext::create(Sizes::new(800.0, 600.0));

    let ortho = CameraRig::new(ProjectionKind::Orthographic, &ctx);
    assert!(matches!(
        ortho.viewport_dimensions_at_z_depth(5.0),
        Err(Error::InvalidState(_))
    ));

    let mut perspective = CameraRig::new(ProjectionKind::Perspective, &ctx);
    perspective.teardown();
    assert!(matches!(
        perspective.viewport_dimensions_at_z_depth(5.0),
        Err(Error::InvalidState(_))
    ));

    let unusable = CameraRig::new(ProjectionKind::Perspective, &StageContext::new());
    assert!(matches!(
        unusable.visible_height_at_z_depth(1.0),
        Err(Error::InvalidState(_))
    ));
}

#[test]
fn test_frame_loop_with_input() {
    let ctx = StageContext::create(Sizes::new(800.0, 600.0));
    let mut rig = CameraRig::new(ProjectionKind::Perspective, &ctx);
    let mut world = World::new(&ctx, ShaderSource::base_vertex(), ShaderSource::base_fragment())
        .unwrap();
    let start = rig.with_camera(|c| c.position).unwrap();

    assert!(rig.handle_control_event(ControlEvent::PointerDown {
        button: PointerButton::Primary,
        position: glam::Vec2::new(400.0, 300.0),
    }));
    assert!(rig.handle_control_event(ControlEvent::PointerMove {
        position: glam::Vec2::new(450.0, 300.0),
    }));
    rig.handle_control_event(ControlEvent::PointerUp {
        button: PointerButton::Primary,
    });

    // Damped motion continues after the pointer is released
    let mut positions = Vec::new();
    for _ in 0..5 {
        rig.update();
        world.update();
        positions.push(rig.with_camera(|c| c.position).unwrap());
    }
    assert_ne!(positions[0], start);
    assert!(positions.windows(2).all(|pair| pair[0] != pair[1]));

    // Orbiting keeps the distance to the target
    for position in positions {
        assert!(approx_eq(position.length(), 1.0));
    }

    // Camera and quad are both in the scene
    let scene = ctx.scene().unwrap().borrow();
    assert_eq!(scene.len(), 2);
    assert!(scene.iter().any(|(_, node)| matches!(node, Node::Camera(_))));
}
