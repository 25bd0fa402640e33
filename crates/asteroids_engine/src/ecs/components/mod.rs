//! Component definitions
//!
//! Each kind lives in its own fixed-capacity array inside
//! [`crate::ecs::World`] and carries a back-reference to its entity.

mod physics;
mod render;
mod sound;

pub use physics::PhysicsComponent;
pub use render::RenderComponent;
pub use sound::{SoundComponent, MAX_COMPONENT_SOUNDS};
