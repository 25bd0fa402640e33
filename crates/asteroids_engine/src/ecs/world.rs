//! Fixed-capacity entity/component store

use super::component::{Component, ComponentKind, ComponentMask};
use super::components::{PhysicsComponent, RenderComponent, SoundComponent};
use super::entity::{ComponentIndex, Entity, EntityId};
use super::EcsError;
use crate::foundation::memory::{Arena, Pool};

/// Entities plus one parallel array per component kind
///
/// All four arrays are carved from one arena at construction with the same
/// capacity. Entities and components are append-only: ids are dense and
/// never reused within a run.
#[derive(Debug)]
pub struct World {
    entities: Pool<Entity>,
    physics: Pool<PhysicsComponent>,
    render: Pool<RenderComponent>,
    sound: Pool<SoundComponent>,
}

fn attach<T: Component>(pool: &mut Pool<T>, entity: &mut Entity) -> Result<(), EcsError> {
    let slot = pool
        .push(T::attached_to(entity.id()))
        .map_err(|_| EcsError::ComponentCapacity { kind: T::KIND })?;
    entity.set_component(T::KIND, ComponentIndex::new(slot));
    Ok(())
}

impl World {
    /// Carve storage for `max_entities` entities and components of each kind
    ///
    /// # Errors
    ///
    /// [`EcsError::Memory`] if any array does not fit in `arena`.
    pub fn new(arena: &mut Arena, max_entities: usize) -> Result<Self, EcsError> {
        let world = Self {
            entities: Pool::carve(arena, max_entities)?,
            physics: Pool::carve(arena, max_entities)?,
            render: Pool::carve(arena, max_entities)?,
            sound: Pool::carve(arena, max_entities)?,
        };
        log::debug!(
            "World carved from [{}]: {max_entities} entities, {} of {} bytes used",
            arena.tag(),
            arena.used(),
            arena.capacity()
        );
        Ok(world)
    }

    /// Append an entity with one fresh component per kind in `mask`
    ///
    /// Capacity is checked for the entity and every requested kind before
    /// anything is appended, so a refused call leaves the world unchanged.
    ///
    /// # Errors
    ///
    /// [`EcsError::EntityCapacity`] or [`EcsError::ComponentCapacity`].
    pub fn create_entity(&mut self, mask: ComponentMask) -> Result<EntityId, EcsError> {
        if self.entities.is_full() {
            return Err(EcsError::EntityCapacity {
                capacity: self.entities.capacity(),
            });
        }
        for kind in ComponentKind::ALL {
            if mask.contains(kind.mask()) && self.is_full(kind) {
                return Err(EcsError::ComponentCapacity { kind });
            }
        }

        let raw = u32::try_from(self.entities.len()).map_err(|_| EcsError::EntityCapacity {
            capacity: self.entities.capacity(),
        })?;
        let mut entity = Entity::new(EntityId::new(raw));

        if mask.contains(ComponentMask::PHYSICS) {
            attach(&mut self.physics, &mut entity)?;
        }
        if mask.contains(ComponentMask::RENDER) {
            attach(&mut self.render, &mut entity)?;
        }
        if mask.contains(ComponentMask::SOUND) {
            attach(&mut self.sound, &mut entity)?;
        }

        self.entities.push(entity)?;
        Ok(entity.id())
    }

    fn is_full(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Physics => self.physics.is_full(),
            ComponentKind::Render => self.render.is_full(),
            ComponentKind::Sound => self.sound.is_full(),
        }
    }

    fn slot(&self, id: EntityId, kind: ComponentKind) -> Option<usize> {
        self.entity(id)?.component(kind).map(ComponentIndex::index)
    }

    /// Entity record for `id`
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    /// Every entity, in creation order
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        self.entities.as_slice()
    }

    /// Physics component of `id`
    #[must_use]
    pub fn physics(&self, id: EntityId) -> Option<&PhysicsComponent> {
        self.physics.get(self.slot(id, ComponentKind::Physics)?)
    }

    /// Mutable physics component of `id`
    pub fn physics_mut(&mut self, id: EntityId) -> Option<&mut PhysicsComponent> {
        let slot = self.slot(id, ComponentKind::Physics)?;
        self.physics.get_mut(slot)
    }

    /// Render component of `id`
    #[must_use]
    pub fn render(&self, id: EntityId) -> Option<&RenderComponent> {
        self.render.get(self.slot(id, ComponentKind::Render)?)
    }

    /// Mutable render component of `id`
    pub fn render_mut(&mut self, id: EntityId) -> Option<&mut RenderComponent> {
        let slot = self.slot(id, ComponentKind::Render)?;
        self.render.get_mut(slot)
    }

    /// Sound component of `id`
    #[must_use]
    pub fn sound(&self, id: EntityId) -> Option<&SoundComponent> {
        self.sound.get(self.slot(id, ComponentKind::Sound)?)
    }

    /// Mutable sound component of `id`
    pub fn sound_mut(&mut self, id: EntityId) -> Option<&mut SoundComponent> {
        let slot = self.slot(id, ComponentKind::Sound)?;
        self.sound.get_mut(slot)
    }

    /// Physics and render components of `id`, borrowed together
    pub fn physics_and_render_mut(
        &mut self,
        id: EntityId,
    ) -> (Option<&mut PhysicsComponent>, Option<&mut RenderComponent>) {
        let physics = self.slot(id, ComponentKind::Physics);
        let render = self.slot(id, ComponentKind::Render);
        (
            physics.and_then(|slot| self.physics.get_mut(slot)),
            render.and_then(|slot| self.render.get_mut(slot)),
        )
    }

    /// Every physics component, in creation order
    #[must_use]
    pub fn physics_components(&self) -> &[PhysicsComponent] {
        self.physics.as_slice()
    }

    /// Every render component, in creation order
    #[must_use]
    pub fn render_components(&self) -> &[RenderComponent] {
        self.render.as_slice()
    }

    /// Number of entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Maximum number of entities
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::memory::megabytes;

    fn world(max_entities: usize) -> (Arena, World) {
        let mut arena = Arena::create("ENTITY", megabytes(1)).unwrap();
        let world = World::new(&mut arena, max_entities).unwrap();
        (arena, world)
    }

    #[test]
    fn test_create_entity_links_components() {
        let (_arena, mut world) = world(8);
        let all = ComponentMask::PHYSICS | ComponentMask::RENDER | ComponentMask::SOUND;

        let a = world.create_entity(all).unwrap();
        let b = world.create_entity(ComponentMask::PHYSICS | ComponentMask::RENDER).unwrap();

        assert_eq!(a, EntityId::new(0));
        assert_eq!(b, EntityId::new(1));
        assert_eq!(world.physics(b).unwrap().entity, b);
        assert_eq!(world.render(b).unwrap().entity, b);
        assert!(world.sound(b).is_none());
        assert_eq!(world.sound(a).unwrap().entity, a);
    }

    #[test]
    fn test_component_arrays_grow_independently() {
        let (_arena, mut world) = world(8);
        world.create_entity(ComponentMask::RENDER).unwrap();
        let physical = world.create_entity(ComponentMask::PHYSICS).unwrap();

        let index = world
            .entity(physical)
            .unwrap()
            .component(ComponentKind::Physics)
            .unwrap();
        assert_eq!(index.index(), 0);
        assert_eq!(world.physics_components().len(), 1);
        assert_eq!(world.render_components().len(), 1);
    }

    #[test]
    fn test_back_references_match_owner() {
        let (_arena, mut world) = world(32);
        for i in 0..20 {
            let mask = if i % 3 == 0 {
                ComponentMask::PHYSICS
            } else {
                ComponentMask::PHYSICS | ComponentMask::RENDER | ComponentMask::SOUND
            };
            world.create_entity(mask).unwrap();
        }

        for entity in world.entities() {
            let id = entity.id();
            assert_eq!(world.physics(id).unwrap().entity, id);
            if let Some(render) = world.render(id) {
                assert_eq!(render.entity, id);
            }
            if let Some(sound) = world.sound(id) {
                assert_eq!(sound.entity, id);
            }
        }
    }

    #[test]
    fn test_entity_capacity_is_enforced() {
        let (_arena, mut world) = world(2);
        world.create_entity(ComponentMask::empty()).unwrap();
        world.create_entity(ComponentMask::PHYSICS).unwrap();

        let err = world.create_entity(ComponentMask::PHYSICS).unwrap_err();
        assert!(matches!(err, EcsError::EntityCapacity { capacity: 2 }));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_refused_entity_leaves_world_unchanged() {
        let mut arena = Arena::create("ENTITY", megabytes(1)).unwrap();
        let mut world = World::new(&mut arena, 1).unwrap();
        world.create_entity(ComponentMask::PHYSICS).unwrap();
        world.entities.reset();

        // Entity slots are free again but the physics array is full
        let err = world
            .create_entity(ComponentMask::RENDER | ComponentMask::PHYSICS)
            .unwrap_err();
        assert!(matches!(
            err,
            EcsError::ComponentCapacity {
                kind: ComponentKind::Physics
            }
        ));
        assert!(world.render_components().is_empty());
        assert!(world.is_empty());
    }

    #[test]
    fn test_arena_reset_empties_world() {
        let mut arena = Arena::create("ENTITY", megabytes(1)).unwrap();
        let mut world = World::new(&mut arena, 4).unwrap();
        let id = world.create_entity(ComponentMask::PHYSICS).unwrap();
        world.physics_mut(id).unwrap().aabb.pos.x = 1234.5;

        arena.reset();

        assert!(world.is_empty());
        assert!(world.physics(id).is_none());
        assert!(matches!(
            world.create_entity(ComponentMask::PHYSICS),
            Err(EcsError::EntityCapacity { capacity: 0 })
        ));
    }

    #[test]
    fn test_arena_too_small() {
        let mut arena = Arena::create("ENTITY", 64).unwrap();
        assert!(matches!(World::new(&mut arena, 100), Err(EcsError::Memory(_))));
    }

    #[test]
    fn test_split_borrow() {
        let (_arena, mut world) = world(4);
        let id = world.create_entity(ComponentMask::PHYSICS | ComponentMask::RENDER).unwrap();
        let (physics, render) = world.physics_and_render_mut(id);
        let physics = physics.unwrap();
        physics.aabb.pos.x = 4.0;
        render.unwrap().world_transform[(0, 3)] = physics.aabb.pos.x;
        assert_eq!(world.render(id).unwrap().world_transform[(0, 3)], 4.0);
    }
}
