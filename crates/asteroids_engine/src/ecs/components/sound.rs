//! Sound component: sample slots an entity can trigger

use crate::audio::SoundId;
use crate::ecs::{Component, ComponentKind, EntityId};

/// Sample slots per component
pub const MAX_COMPONENT_SOUNDS: usize = 4;

/// Loaded samples an entity plays, by slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundComponent {
    /// Owning entity
    pub entity: EntityId,

    /// Sample in each slot
    pub sounds: [Option<SoundId>; MAX_COMPONENT_SOUNDS],
}

impl SoundComponent {
    /// Sample in `slot`
    #[must_use]
    pub fn sound(&self, slot: usize) -> Option<SoundId> {
        self.sounds.get(slot).copied().flatten()
    }
}

impl Component for SoundComponent {
    const KIND: ComponentKind = ComponentKind::Sound;

    fn attached_to(entity: EntityId) -> Self {
        Self {
            entity,
            sounds: [None; MAX_COMPONENT_SOUNDS],
        }
    }
}
