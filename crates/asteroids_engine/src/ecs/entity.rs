//! Entity identifiers and records

use super::component::ComponentKind;

/// Dense entity identifier, equal to the entity's slot in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Wrap a raw id
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw id value
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Slot in the entity array
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Slot of a component inside its kind's array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentIndex(usize);

impl ComponentIndex {
    pub(super) const fn new(slot: usize) -> Self {
        Self(slot)
    }

    /// Raw slot value
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// An entity and the components attached to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    physics: Option<ComponentIndex>,
    render: Option<ComponentIndex>,
    sound: Option<ComponentIndex>,
}

impl Entity {
    pub(super) const fn new(id: EntityId) -> Self {
        Self {
            id,
            physics: None,
            render: None,
            sound: None,
        }
    }

    /// Entity identifier
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Slot of the attached component of `kind`, if any
    #[must_use]
    pub const fn component(&self, kind: ComponentKind) -> Option<ComponentIndex> {
        match kind {
            ComponentKind::Physics => self.physics,
            ComponentKind::Render => self.render,
            ComponentKind::Sound => self.sound,
        }
    }

    pub(super) fn set_component(&mut self, kind: ComponentKind, index: ComponentIndex) {
        match kind {
            ComponentKind::Physics => self.physics = Some(index),
            ComponentKind::Render => self.render = Some(index),
            ComponentKind::Sound => self.sound = Some(index),
        }
    }
}
