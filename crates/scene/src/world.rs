//! The world: builds the scene's one shader-driven quad.

use stage_core::{Error, Result};
use stage_resources::{
    BASE_FRAGMENT, BASE_VERTEX, Geometry, ReadySignal, Resources, ShaderMaterial, ShaderSource,
    Side, Uniform,
};

use crate::context::StageContext;
use crate::graph::{Mesh, NodeId, SceneHandle};

/// Name of the elapsed-time uniform on the quad's material.
pub const TIME_UNIFORM: &str = "uTime";

#[derive(Debug, Clone)]
enum WorldState {
    /// Waiting on the loader's signal before building
    Pending(ReadySignal),
    Built(NodeId),
}

/// Inserts a double-sided unit quad with a time-driven shader material into
/// the shared scene graph.
#[derive(Debug)]
pub struct World {
    scene: SceneHandle,
    state: WorldState,
}

impl World {
    /// Build the quad immediately from the given shader pair.
    pub fn new(ctx: &StageContext, vertex: ShaderSource, fragment: ShaderSource) -> Result<Self> {
        let scene = scene_of(ctx)?;
        let id = insert_quad(&scene, vertex, fragment)?;
        Ok(Self {
            scene,
            state: WorldState::Built(id),
        })
    }

    /// A world that waits on `resources` and builds once they are ready.
    ///
    /// Call [`World::on_resources_ready`] after the loader finishes.
    pub fn pending(ctx: &StageContext, resources: &Resources) -> Result<Self> {
        Ok(Self {
            scene: scene_of(ctx)?,
            state: WorldState::Pending(resources.ready_signal()),
        })
    }

    /// Whether the resources this world waits on have finished loading
    /// and it has not been built yet.
    pub fn ready_to_build(&self) -> bool {
        match &self.state {
            WorldState::Pending(signal) => signal.is_ready(),
            WorldState::Built(_) => false,
        }
    }

    /// Build from the loaded base shaders. Only the first call builds;
    /// later calls do nothing.
    pub fn on_resources_ready(&mut self, resources: &Resources) -> Result<()> {
        if self.is_built() {
            tracing::debug!("World already built, ignoring ready notification");
            return Ok(());
        }
        if !self.ready_to_build() {
            return Err(Error::InvalidState(
                "world cannot be built before resources are ready".into(),
            ));
        }
        let vertex = resources.shader(BASE_VERTEX)?.clone();
        let fragment = resources.shader(BASE_FRAGMENT)?.clone();
        let id = insert_quad(&self.scene, vertex, fragment)?;
        self.state = WorldState::Built(id);
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        matches!(self.state, WorldState::Built(_))
    }

    /// The quad's node, once built.
    pub fn mesh_id(&self) -> Option<NodeId> {
        match self.state {
            WorldState::Built(id) => Some(id),
            WorldState::Pending(_) => None,
        }
    }

    /// Run `f` against the quad mesh.
    pub fn with_mesh<R>(&self, f: impl FnOnce(&Mesh) -> R) -> Result<R> {
        let id = self
            .mesh_id()
            .ok_or_else(|| Error::InvalidState("world has not been built".into()))?;
        let graph = self
            .scene
            .try_borrow()
            .map_err(|_| Error::Scene("scene graph is mutably borrowed".into()))?;
        let mesh = graph
            .mesh(id)
            .ok_or_else(|| Error::InvalidState(format!("mesh {id} is no longer in the scene")))?;
        Ok(f(mesh))
    }

    /// Per-frame hook. The time uniform is intentionally left at its
    /// initial value; this is where per-frame uniform updates would go.
    pub fn update(&mut self) {}
}

fn scene_of(ctx: &StageContext) -> Result<SceneHandle> {
    ctx.scene()
        .cloned()
        .ok_or_else(|| Error::MissingPrerequisite("no scene graph".into()))
}

fn insert_quad(scene: &SceneHandle, vertex: ShaderSource, fragment: ShaderSource) -> Result<NodeId> {
    let geometry = Geometry::plane(1.0, 1.0);
    let material = ShaderMaterial::new(vertex, fragment)?
        .with_uniform(TIME_UNIFORM, Uniform::Float(0.0))
        .with_side(Side::Double);

    let id = scene
        .try_borrow_mut()
        .map_err(|_| Error::Scene("scene graph is already borrowed".into()))?
        .add(Mesh::new(geometry, material));
    tracing::debug!("World added quad mesh {}", id);
    Ok(id)
}
