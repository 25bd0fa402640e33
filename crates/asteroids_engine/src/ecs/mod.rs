//! Entity-Component storage
//!
//! Entities are dense ids with optional links into one fixed-capacity array
//! per component kind. Everything is carved from an arena up front; there
//! is no per-entity heap allocation and no destruction path.

pub mod component;
pub mod components;
pub mod entity;
pub mod world;

pub use component::{Component, ComponentKind, ComponentMask};
pub use components::{PhysicsComponent, RenderComponent, SoundComponent, MAX_COMPONENT_SOUNDS};
pub use entity::{ComponentIndex, Entity, EntityId};
pub use world::World;

use crate::foundation::memory::MemoryError;

/// Entity store errors
#[derive(thiserror::Error, Debug)]
pub enum EcsError {
    /// Every entity slot is taken
    #[error("entity capacity reached ({capacity})")]
    EntityCapacity {
        /// Configured maximum
        capacity: usize,
    },

    /// The array for one requested component kind is full
    #[error("{kind} component capacity reached")]
    ComponentCapacity {
        /// Kind that ran out
        kind: ComponentKind,
    },

    /// Storage could not be carved
    #[error("entity storage: {0}")]
    Memory(#[from] MemoryError),
}
