use glam::{Mat4, Vec3};
use crate::api::types::NodeId;
use crate::assets::registry::TextureSlot;
use crate::components::mesh::MeshComponent;

/// Fat scene node: a single struct with optional render data.
/// Local transforms live in the `TransformGraph`; the node only stores the
/// propagated world matrix the renderer consumes.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// String tag for finding nodes by name.
    pub tag: String,
    /// Whether this node is drawn (inactive nodes are skipped by the render pass).
    pub active: bool,
    /// World transform, written by `TransformGraph::propagate`.
    pub world: Mat4,
    /// Mesh. Nodes without one are pure transform groups.
    pub mesh: Option<MeshComponent>,
    /// Texture slot requested for this node's surface.
    pub texture: Option<TextureSlot>,
}

impl Node {
    /// Create a new node with the given ID at the origin.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            world: Mat4::IDENTITY,
            mesh: None,
            texture: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_texture(mut self, slot: TextureSlot) -> Self {
        self.texture = Some(slot);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// World-space position (translation column of the world matrix).
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}
