//! Stage - main entry point
//!
//! Opens a window, builds the camera rig and the world in a shared scene,
//! and drives them from the winit event loop.
//!
//! ```text
//! stage [perspective|orthographic] [--config <file.json>]
//! ```

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context as _, Result, bail};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use stage_core::{Config, ProjectionKind, Timer};
use stage_platform::{PointerInput, Window};
use stage_resources::Resources;
use stage_scene::{
    CameraRig, CameraSettings, RenderTarget, RendererInfo, SceneGraph, StageContext, World,
    shared_sizes,
};

/// Directory the base shaders are read from at runtime.
const SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../resources/shaders");

struct Scene {
    ctx: StageContext,
    camera: CameraRig,
    world: World,
}

struct App {
    config: Config,
    window: Option<Window>,
    scene: Option<Scene>,
    input: PointerInput,
    timer: Timer,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            window: None,
            scene: None,
            input: PointerInput::default(),
            timer: Timer::new(),
        }
    }

    fn build_scene(&self, window: &Window) -> stage_core::Result<Scene> {
        let sizes = shared_sizes(window.sizes());
        let ctx = StageContext::new()
            .with_canvas(RenderTarget::new("canvas", sizes.clone()))
            .with_sizes(sizes)
            .with_scene(SceneGraph::shared())
            .with_renderer(Rc::new(RendererInfo {
                backend: "headless".to_string(),
                pixel_ratio: window.scale_factor() as f32,
            }));

        let camera = CameraRig::with_settings(
            self.config.camera.kind,
            &ctx,
            CameraSettings::from(&self.config.camera),
        );

        let mut resources = Resources::base_from_dir(PathBuf::from(SHADER_DIR).as_path());
        let mut world = World::pending(&ctx, &resources)?;
        if let Err(e) = resources.load() {
            warn!("Falling back to bundled shaders: {}", e);
            resources = Resources::bundled();
            world = World::pending(&ctx, &resources)?;
        }
        if world.ready_to_build() {
            world.on_resources_ready(&resources)?;
        }

        Ok(Scene { ctx, camera, world })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = match Window::new(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.input.set_scale_factor(window.scale_factor());

        match self.build_scene(&window) {
            Ok(scene) => {
                info!(
                    "Scene ready: {} camera, {} nodes",
                    scene.camera.kind(),
                    scene.ctx.scene().map_or(0, |graph| graph.borrow().len())
                );
                self.scene = Some(scene);
                self.window = Some(window);
            }
            Err(e) => {
                error!("Failed to build scene: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(control) = self.input.translate(&event)
            && let Some(scene) = self.scene.as_mut()
        {
            scene.camera.handle_control_event(control);
        }

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera.teardown();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(window) = self.window.as_mut() {
                    window.resize(size.width, size.height);
                    if let Some(scene) = self.scene.as_mut() {
                        scene.ctx.set_sizes(window.sizes());
                        scene.camera.resize();
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let delta = self.timer.tick();
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera.update();
                    scene.world.update();
                }
                if self.timer.frames() % 600 == 0 {
                    tracing::debug!(
                        "Frame {} ({:.2} ms), {:.1}s elapsed",
                        self.timer.frames(),
                        delta.as_secs_f64() * 1000.0,
                        self.timer.elapsed_secs()
                    );
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Config> {
    let mut kind: Option<ProjectionKind> = None;
    let mut config_path: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config_path = Some(PathBuf::from(path));
            }
            other if other.starts_with('-') => bail!("unknown option '{other}'"),
            other => kind = Some(other.parse()?),
        }
    }

    let mut config = match config_path {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(kind) = kind {
        config.camera.kind = kind;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Initialize logging
    stage_core::init_logging();

    let config = parse_args(std::env::args().skip(1))?;
    info!("Starting stage with a {} camera", config.camera.kind);

    // Create event loop
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create app and run
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
