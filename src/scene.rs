//! Model tree capability consumed by the part mapper and the explode animator.
//!
//! The renderer owns drawing; the core only needs to walk named nodes, read and
//! write local positions, and create grouping containers. `Scene` is the arena
//! implementation the web viewer uses for its procedural demo heart.

use crate::model::{Aabb, Vec3};

/// Non-owning handle to a node inside a model tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Hierarchical model surface. Transforms are translation plus uniform scale.
pub trait SceneTree {
    fn root(&self) -> NodeId;
    fn children(&self, id: NodeId) -> Vec<NodeId>;
    fn name(&self, id: NodeId) -> &str;
    /// True for leaves carrying mesh data.
    fn is_mesh(&self, id: NodeId) -> bool;
    fn position(&self, id: NodeId) -> Vec3;
    fn set_position(&mut self, id: NodeId, position: Vec3);
    fn scale(&self, id: NodeId) -> f64;
    fn set_scale(&mut self, id: NodeId, scale: f64);
    fn set_visible(&mut self, id: NodeId, visible: bool);
    fn world_position(&self, id: NodeId) -> Vec3;
    /// World bounds of every visible mesh at or below `id`.
    fn world_bounds(&self, id: NodeId) -> Option<Aabb>;
    /// New empty group at the parent's local origin.
    fn create_group(&mut self, parent: NodeId, name: &str) -> NodeId;
    /// Copies a mesh under `parent`, keeping its world placement.
    fn clone_into(&mut self, node: NodeId, parent: NodeId) -> NodeId;
    /// Moves a node under `parent`, keeping its world placement.
    fn reparent(&mut self, node: NodeId, parent: NodeId);

    /// Depth-first pre-order walk below the root, children in insertion order.
    fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(self.root()).into_iter().rev().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    fn mesh_leaves(&self) -> Vec<NodeId> {
        self.descendants().into_iter().filter(|id| self.is_mesh(*id)).collect()
    }
}

#[derive(Clone, Debug)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    position: Vec3,
    scale: f64,
    visible: bool,
    /// Local half extents when the node is a mesh.
    mesh: Option<Vec3>,
}

impl Node {
    fn new(name: &str, parent: Option<NodeId>, position: Vec3, mesh: Option<Vec3>) -> Self {
        Self { name: name.to_string(), parent, children: Vec::new(), position, scale: 1.0, visible: true, mesh }
    }
}

/// Arena-backed model tree.
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: Vec<Node>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("root")
    }
}

impl Scene {
    pub fn new(root_name: &str) -> Self {
        Self { nodes: vec![Node::new(root_name, None, Vec3::ZERO, None)] }
    }

    pub fn add_group(&mut self, parent: NodeId, name: &str, position: Vec3) -> NodeId {
        self.push(Node::new(name, Some(parent), position, None))
    }

    pub fn add_mesh(&mut self, parent: NodeId, name: &str, position: Vec3, half_extents: Vec3) -> NodeId {
        self.push(Node::new(name, Some(parent), position, Some(half_extents)))
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes[id.0].visible
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(p) = node.parent {
            self.nodes[p.0].children.push(id);
        }
        self.nodes.push(node);
        id
    }

    fn world_scale(&self, id: NodeId) -> f64 {
        let mut s = self.nodes[id.0].scale;
        let mut cur = self.nodes[id.0].parent;
        while let Some(p) = cur {
            s *= self.nodes[p.0].scale;
            cur = self.nodes[p.0].parent;
        }
        s
    }

    /// Local position under `parent` that lands on `world`.
    fn local_for_world(&self, parent: NodeId, world: Vec3) -> Vec3 {
        let origin = self.world_position(parent);
        let scale = self.world_scale(parent);
        if scale.abs() <= f64::EPSILON {
            return Vec3::ZERO;
        }
        (world - origin) * (1.0 / scale)
    }
}

impl SceneTree for Scene {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id.0].children.clone()
    }

    fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    fn is_mesh(&self, id: NodeId) -> bool {
        self.nodes[id.0].mesh.is_some()
    }

    fn position(&self, id: NodeId) -> Vec3 {
        self.nodes[id.0].position
    }

    fn set_position(&mut self, id: NodeId, position: Vec3) {
        self.nodes[id.0].position = position;
    }

    fn scale(&self, id: NodeId) -> f64 {
        self.nodes[id.0].scale
    }

    fn set_scale(&mut self, id: NodeId, scale: f64) {
        self.nodes[id.0].scale = scale;
    }

    fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    fn world_position(&self, id: NodeId) -> Vec3 {
        let node = &self.nodes[id.0];
        match node.parent {
            None => node.position,
            Some(p) => self.world_position(p) + node.position * self.world_scale(p),
        }
    }

    fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        let mut bounds: Option<Aabb> = None;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let node = &self.nodes[cur.0];
            if !node.visible {
                continue;
            }
            if let Some(half) = node.mesh {
                let b = Aabb::from_center_half_extents(self.world_position(cur), half * self.world_scale(cur));
                bounds = Some(match bounds {
                    Some(acc) => acc.union(b),
                    None => b,
                });
            }
            stack.extend(node.children.iter().copied());
        }
        bounds
    }

    fn create_group(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.add_group(parent, name, Vec3::ZERO)
    }

    fn clone_into(&mut self, node: NodeId, parent: NodeId) -> NodeId {
        let world = self.world_position(node);
        let rel_scale = self.world_scale(node) / self.world_scale(parent).max(f64::EPSILON);
        let local = self.local_for_world(parent, world);
        let src = &self.nodes[node.0];
        let mut copy = Node::new(&src.name, Some(parent), local, src.mesh);
        copy.scale = rel_scale;
        self.push(copy)
    }

    fn reparent(&mut self, node: NodeId, parent: NodeId) {
        let world = self.world_position(node);
        let world_scale = self.world_scale(node);
        if let Some(old) = self.nodes[node.0].parent {
            self.nodes[old.0].children.retain(|c| *c != node);
        }
        let local = self.local_for_world(parent, world);
        let parent_scale = self.world_scale(parent).max(f64::EPSILON);
        let n = &mut self.nodes[node.0];
        n.parent = Some(parent);
        n.position = local;
        n.scale = world_scale / parent_scale;
        self.nodes[parent.0].children.push(node);
    }
}

/// Procedural stand-in for a loaded heart asset, with node names in the style
/// exported by common modelling tools.
pub fn demo_heart() -> Scene {
    let mut scene = Scene::new("HeartModel");
    let root = scene.root();
    let body = scene.add_group(root, "Heart_Body", Vec3::ZERO);
    let chambers: [(&str, Vec3, Vec3); 6] = [
        ("LeftVentricle_Mesh", Vec3::new(0.12, -0.15, 0.0), Vec3::new(0.1, 0.14, 0.1)),
        ("RightVentricle_Mesh", Vec3::new(-0.12, -0.15, 0.0), Vec3::new(0.09, 0.12, 0.09)),
        ("LeftAtrium_Mesh", Vec3::new(0.12, 0.12, -0.05), Vec3::new(0.08, 0.07, 0.08)),
        ("RightAtrium_Mesh", Vec3::new(-0.12, 0.12, -0.05), Vec3::new(0.08, 0.07, 0.08)),
        ("Septum_Mesh", Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.02, 0.12, 0.08)),
        ("Aorta_Arch", Vec3::new(0.02, 0.3, 0.0), Vec3::new(0.05, 0.08, 0.05)),
    ];
    for (name, pos, half) in chambers {
        scene.add_mesh(body, name, pos, half);
    }
    let vessels = scene.add_group(root, "Vessels", Vec3::ZERO);
    scene.add_mesh(vessels, "PulmonaryTrunk", Vec3::new(-0.04, 0.26, 0.08), Vec3::new(0.04, 0.07, 0.04));
    scene.add_mesh(vessels, "SuperiorVenaCava", Vec3::new(-0.18, 0.3, -0.05), Vec3::new(0.03, 0.08, 0.03));
    scene
}
