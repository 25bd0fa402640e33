//! Render component: world transform and GPU handles

use crate::ecs::{Component, ComponentKind, EntityId};
use crate::foundation::math::Mat4;
use crate::render::{TextureHandle, VertexArrayHandle};

/// What the renderer needs to draw an entity
#[derive(Debug, Clone, PartialEq)]
pub struct RenderComponent {
    /// Owning entity
    pub entity: EntityId,

    /// Model-to-world transform
    pub world_transform: Mat4,

    /// Geometry to draw; entities without one are skipped
    pub vertex_array: Option<VertexArrayHandle>,

    /// Texture to bind
    pub texture: Option<TextureHandle>,
}

impl Component for RenderComponent {
    const KIND: ComponentKind = ComponentKind::Render;

    fn attached_to(entity: EntityId) -> Self {
        Self {
            entity,
            world_transform: Mat4::identity(),
            vertex_array: None,
            texture: None,
        }
    }
}
