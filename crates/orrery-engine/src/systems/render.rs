use crate::assets::registry::{AssetState, TextureRegistry};
use crate::components::node::Node;
use crate::renderer::instance::{BodyInstance, MaterialState, RenderBuffer};

/// Resolve a node's surface from its texture slot state.
pub fn material_for(node: &Node, textures: &TextureRegistry) -> MaterialState {
    match node.texture {
        None => MaterialState::Flat,
        Some(slot) => match textures.state(slot) {
            Some(AssetState::Ready) => MaterialState::Textured(slot),
            Some(AssetState::Pending) => MaterialState::Pending,
            Some(AssetState::Failed) | None => MaterialState::Fallback,
        },
    }
}

/// Build the render buffer from scene nodes.
/// Opaque meshes first, then transparent ones; `transparent_split` marks the boundary.
pub fn build_render_buffer<'a>(
    nodes: impl Iterator<Item = &'a Node>,
    textures: &TextureRegistry,
    buffer: &mut RenderBuffer,
) {
    buffer.clear();

    let mut opaque: Vec<BodyInstance> = Vec::new();
    let mut transparent: Vec<BodyInstance> = Vec::new();

    for node in nodes {
        if !node.active {
            continue;
        }

        let mesh = match &node.mesh {
            Some(m) => m,
            None => continue,
        };

        let (_, rotation, translation) = node.world.to_scale_rotation_translation();
        let instance = BodyInstance::new(translation, rotation.normalize(), mesh, material_for(node, textures));

        if mesh.is_transparent() {
            transparent.push(instance);
        } else {
            opaque.push(instance);
        }
    }

    let split = opaque.len() as u32;

    for inst in opaque {
        buffer.push(inst);
    }
    buffer.set_transparent_split(split);
    for inst in transparent {
        buffer.push(inst);
    }
}
