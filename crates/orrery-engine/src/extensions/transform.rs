// extensions/transform.rs
//
// 3D transform hierarchy: tracks parent-child relationships by NodeId and
// composes local matrices into world matrices on the scene's nodes.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.register_with(id, LocalTransform::from_matrix(m));
//   graph.set_parent(child_id, Some(parent_id));
//   graph.propagate(&mut scene);  // writes Node::world

use std::collections::HashMap;
use glam::{Mat4, Quat, Vec3};
use crate::api::types::NodeId;
use crate::core::scene::Scene;

/// Local transform data for nodes in a hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    /// Position relative to parent (or world if no parent).
    pub translation: Vec3,
    /// Rotation relative to parent.
    pub rotation: Quat,
    /// Scale multiplier relative to parent.
    pub scale: Vec3,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl LocalTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decompose an affine matrix into translation/rotation/scale.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self { translation, rotation, scale }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Compose as `T · R · S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Node in the transform hierarchy.
#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalTransform,
}

/// Transform hierarchy graph: manages parent-child relationships.
///
/// Lives beside the `Scene`: the scene owns render data, the graph owns
/// local transforms. `propagate` is the only place world matrices are written.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<NodeId, TransformNode>,
    /// Nodes with no parent, in registration order.
    roots: Vec<NodeId>,
    /// Set when hierarchy or locals change, cleared after propagate.
    dirty: bool,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node in the hierarchy with an identity local transform.
    pub fn register(&mut self, id: NodeId) {
        self.register_with(id, LocalTransform::default());
    }

    /// Register a node with a specific local transform.
    pub fn register_with(&mut self, id: NodeId, local: LocalTransform) {
        let is_new = !self.nodes.contains_key(&id);
        let node = self.nodes.entry(id).or_default();
        node.local = local;
        if is_new {
            self.roots.push(id);
        }
        self.dirty = true;
    }

    /// Set the parent of a node. Pass `None` to make it a root.
    /// Parenting a node under itself or one of its descendants is ignored.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        if let Some(p) = parent {
            if p == child || self.is_ancestor(child, p) {
                log::warn!("TransformGraph: refusing cycle {:?} -> {:?}", child, p);
                return;
            }
        }

        if !self.nodes.contains_key(&child) {
            self.register(child);
        }
        if let Some(p) = parent {
            if !self.nodes.contains_key(&p) {
                self.register(p);
            }
        }

        // Remove from old parent's children
        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }

        self.dirty = true;
    }

    /// Whether `ancestor` appears on the parent chain of `id`.
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = self.get_parent(id);
        while let Some(p) = cursor {
            if p == ancestor {
                return true;
            }
            cursor = self.get_parent(p);
        }
        false
    }

    /// Replace the local transform of a registered node.
    pub fn set_local(&mut self, id: NodeId, local: LocalTransform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = local;
            self.dirty = true;
        }
    }

    /// Replace the local transform from a composed matrix.
    pub fn set_local_matrix(&mut self, id: NodeId, matrix: Mat4) {
        self.set_local(id, LocalTransform::from_matrix(matrix));
    }

    pub fn get_local(&self, id: NodeId) -> Option<&LocalTransform> {
        self.nodes.get(&id).map(|n| &n.local)
    }

    pub fn get_parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn get_children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    /// Remove a node from the hierarchy. Children become roots.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            if let Some(parent) = node.parent {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|&c| c != id);
                }
            }
            for child in node.children {
                if let Some(child_node) = self.nodes.get_mut(&child) {
                    child_node.parent = None;
                }
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
            self.roots.retain(|&r| r != id);
        }
        self.dirty = true;
    }

    /// World matrix of a node computed from the graph alone (walks to the root).
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(&id)?;
        let local = node.local.matrix();
        match node.parent {
            Some(p) => self.world_matrix(p).map(|pw| pw * local),
            None => Some(local),
        }
    }

    /// Propagate transforms from roots down, writing `Node::world`.
    pub fn propagate(&mut self, scene: &mut Scene) {
        if !self.dirty {
            return;
        }
        for &root in &self.roots {
            self.propagate_recursive(root, Mat4::IDENTITY, scene);
        }
        self.dirty = false;
    }

    fn propagate_recursive(&self, id: NodeId, parent_world: Mat4, scene: &mut Scene) {
        let Some(node) = self.nodes.get(&id) else { return };
        let world = parent_world * node.local.matrix();

        if let Some(scene_node) = scene.get_mut(id) {
            scene_node.world = world;
        }

        for &child in &node.children {
            self.propagate_recursive(child, world, scene);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::Node;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn parent_child_relationship() {
        let mut graph = TransformGraph::new();
        let parent = NodeId(1);
        let child = NodeId(2);

        graph.register(parent);
        graph.register(child);
        graph.set_parent(child, Some(parent));

        assert_eq!(graph.get_parent(child), Some(parent));
        assert_eq!(graph.get_children(parent), Some([child].as_slice()));
    }

    #[test]
    fn propagate_composes_rotation_then_translation() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let pivot = NodeId(1);
        let body = NodeId(2);

        scene.spawn(Node::new(pivot));
        scene.spawn(Node::new(body));

        // Quarter turn about +Y, then a child offset of 10 along local +X.
        graph.register_with(pivot, LocalTransform::new().with_rotation(Quat::from_rotation_y(FRAC_PI_2)));
        graph.register_with(body, LocalTransform::new().with_translation(Vec3::new(10.0, 0.0, 0.0)));
        graph.set_parent(body, Some(pivot));
        graph.propagate(&mut scene);

        let pos = scene.get(body).unwrap().world_position();
        assert!(approx(pos, Vec3::new(0.0, 0.0, -10.0)), "pos = {pos:?}");
        assert!(!graph.is_dirty());
    }

    #[test]
    fn world_matrix_matches_propagated_world() {
        let mut graph = TransformGraph::new();
        let mut scene = Scene::new();
        let a = NodeId(1);
        let b = NodeId(2);
        scene.spawn(Node::new(a));
        scene.spawn(Node::new(b));
        graph.register_with(a, LocalTransform::new().with_translation(Vec3::new(5.0, 1.0, 0.0)));
        graph.register_with(b, LocalTransform::new().with_translation(Vec3::new(0.0, 0.0, 2.0)));
        graph.set_parent(b, Some(a));
        graph.propagate(&mut scene);

        let from_graph = graph.world_matrix(b).unwrap().w_axis.truncate();
        assert!(approx(from_graph, scene.get(b).unwrap().world_position()));
        assert!(approx(from_graph, Vec3::new(5.0, 1.0, 2.0)));
    }

    #[test]
    fn from_matrix_round_trips_rigid_transforms() {
        let m = Mat4::from_rotation_y(0.7) * Mat4::from_rotation_x(0.2) * Mat4::from_translation(Vec3::new(30.0, 0.0, 0.0));
        let local = LocalTransform::from_matrix(m);
        let p = local.matrix().transform_point3(Vec3::ZERO);
        assert!(approx(p, m.transform_point3(Vec3::ZERO)));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = TransformGraph::new();
        let a = NodeId(1);
        let b = NodeId(2);
        graph.register(a);
        graph.register(b);
        graph.set_parent(b, Some(a));
        graph.set_parent(a, Some(b));
        assert_eq!(graph.get_parent(a), None);
        graph.set_parent(a, Some(a));
        assert_eq!(graph.get_parent(a), None);
    }

    #[test]
    fn remove_orphans_children() {
        let mut graph = TransformGraph::new();
        let parent = NodeId(1);
        let child = NodeId(2);

        graph.register(parent);
        graph.register(child);
        graph.set_parent(child, Some(parent));

        graph.remove(parent);

        assert_eq!(graph.get_parent(child), None);
        assert!(graph.roots.contains(&child));
    }
}
