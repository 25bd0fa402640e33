//! Component kinds and the trait every stored component implements

use bitflags::bitflags;

use super::EntityId;

bitflags! {
    /// Set of component kinds requested for a new entity
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ComponentMask: u8 {
        /// Position, velocity and bounds
        const PHYSICS = 1 << 0;
        /// World transform and draw handles
        const RENDER = 1 << 1;
        /// Sound sample slots
        const SOUND = 1 << 2;
    }
}

/// One kind of component storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// [`super::PhysicsComponent`]
    Physics,
    /// [`super::RenderComponent`]
    Render,
    /// [`super::SoundComponent`]
    Sound,
}

impl ComponentKind {
    /// Every kind, in storage order
    pub const ALL: [Self; 3] = [Self::Physics, Self::Render, Self::Sound];

    /// Mask bit for this kind
    #[must_use]
    pub const fn mask(self) -> ComponentMask {
        match self {
            Self::Physics => ComponentMask::PHYSICS,
            Self::Render => ComponentMask::RENDER,
            Self::Sound => ComponentMask::SOUND,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Physics => "physics",
            Self::Render => "render",
            Self::Sound => "sound",
        };
        f.write_str(name)
    }
}

/// A component stored in the world's fixed-capacity arrays
pub trait Component: Sized {
    /// Storage this component lives in
    const KIND: ComponentKind;

    /// Fresh component attached to `entity`
    fn attached_to(entity: EntityId) -> Self;
}
