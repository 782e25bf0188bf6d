//! A flat scene graph of cameras and meshes.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Ids are never reused, so an
//! id held after its node was removed simply stops resolving.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use stage_resources::{Geometry, ShaderMaterial};

use crate::camera::Camera;

/// Shared handle to a scene graph.
pub type SceneHandle = Rc<RefCell<SceneGraph>>;

/// Identity of a node in a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry paired with the material that draws it.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: ShaderMaterial,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: ShaderMaterial) -> Self {
        Self { geometry, material }
    }
}

/// Something that can be placed in the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Camera(Camera),
    Mesh(Mesh),
}

impl From<Camera> for Node {
    fn from(camera: Camera) -> Self {
        Node::Camera(camera)
    }
}

impl From<Mesh> for Node {
    fn from(mesh: Mesh) -> Self {
        Node::Mesh(mesh)
    }
}

/// The collection of renderable objects.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<(NodeId, Node)>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new, empty graph behind a shared handle.
    pub fn shared() -> SceneHandle {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Insert a node and return its id.
    pub fn add(&mut self, node: impl Into<Node>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push((id, node.into()));
        tracing::trace!("Added node {}", id);
        id
    }

    /// Remove a node, returning it if it was present.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|(node_id, _)| *node_id == id)?;
        tracing::trace!("Removed node {}", id);
        Some(self.nodes.remove(index).1)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|(node_id, _)| *node_id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|(node_id, _)| *node_id == id)
            .map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|(node_id, _)| *node_id == id)
            .map(|(_, node)| node)
    }

    pub fn camera(&self, id: NodeId) -> Option<&Camera> {
        match self.get(id)? {
            Node::Camera(camera) => Some(camera),
            Node::Mesh(_) => None,
        }
    }

    pub fn camera_mut(&mut self, id: NodeId) -> Option<&mut Camera> {
        match self.get_mut(id)? {
            Node::Camera(camera) => Some(camera),
            Node::Mesh(_) => None,
        }
    }

    pub fn mesh(&self, id: NodeId) -> Option<&Mesh> {
        match self.get(id)? {
            Node::Mesh(mesh) => Some(mesh),
            Node::Camera(_) => None,
        }
    }

    pub fn mesh_mut(&mut self, id: NodeId) -> Option<&mut Mesh> {
        match self.get_mut(id)? {
            Node::Mesh(mesh) => Some(mesh),
            Node::Camera(_) => None,
        }
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// All meshes in insertion order.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Mesh)> {
        self.iter().filter_map(|(id, node)| match node {
            Node::Mesh(mesh) => Some((id, mesh)),
            Node::Camera(_) => None,
        })
    }

    /// All cameras in insertion order.
    pub fn cameras(&self) -> impl Iterator<Item = (NodeId, &Camera)> {
        self.iter().filter_map(|(id, node)| match node {
            Node::Camera(camera) => Some((id, camera)),
            Node::Mesh(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stage_resources::{ShaderSource, Side};

    fn quad() -> Mesh {
        let material =
            ShaderMaterial::new(ShaderSource::base_vertex(), ShaderSource::base_fragment())
                .unwrap()
                .with_side(Side::Double);
        Mesh::new(Geometry::plane(1.0, 1.0), material)
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = SceneGraph::new();
        let camera = scene.add(Camera::perspective(70.0, 1.0, 0.1, 10.0));
        let mesh = scene.add(quad());

        assert_eq!(scene.len(), 2);
        assert!(scene.camera(camera).is_some());
        assert!(scene.mesh(mesh).is_some());
        assert!(scene.camera(mesh).is_none());

        let removed = scene.remove(camera);
        assert!(matches!(removed, Some(Node::Camera(_))));
        assert!(!scene.contains(camera));
        assert!(scene.contains(mesh));
        assert!(scene.remove(camera).is_none());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut scene = SceneGraph::new();
        let first = scene.add(quad());
        scene.remove(first);
        let second = scene.add(quad());
        assert_ne!(first, second);
        assert!(scene.get(first).is_none());
    }

    #[test]
    fn test_iteration_order_and_filters() {
        let mut scene = SceneGraph::new();
        let a = scene.add(quad());
        let b = scene.add(Camera::orthographic(-1.0, 1.0, 1.0, -1.0, 1.0, 10.0));
        let c = scene.add(quad());

        let ids: Vec<_> = scene.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_eq!(scene.meshes().count(), 2);
        assert_eq!(scene.cameras().map(|(id, _)| id).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_camera_mut() {
        let mut scene = SceneGraph::new();
        let id = scene.add(Camera::perspective(70.0, 1.0, 0.1, 10.0));
        scene.camera_mut(id).unwrap().set_aspect(2.0);
        assert_eq!(scene.camera(id).unwrap().aspect(), 2.0);
    }
}
