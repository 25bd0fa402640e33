//! Physics component: bounds and kinematics

use crate::ecs::{Component, ComponentKind, EntityId};
use crate::foundation::math::Vec3;
use crate::spatial::Aabb;

/// Kinematic state of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsComponent {
    /// Owning entity
    pub entity: EntityId,

    /// Bounds; the center doubles as the entity position
    pub aabb: Aabb,

    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Linear acceleration in units per second squared
    pub acceleration: Vec3,

    /// Heading in radians about +Z
    pub orientation: f32,

    /// Mass
    pub mass: f32,
}

impl PhysicsComponent {
    /// Entity position
    #[must_use]
    pub const fn position(&self) -> &Vec3 {
        &self.aabb.pos
    }

    /// Advance position by `velocity * delta_time`
    pub fn integrate(&mut self, delta_time: f32) {
        self.aabb.pos += self.velocity * delta_time;
    }
}

impl Component for PhysicsComponent {
    const KIND: ComponentKind = ComponentKind::Physics;

    fn attached_to(entity: EntityId) -> Self {
        Self {
            entity,
            aabb: Aabb::default(),
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            orientation: 0.0,
            mass: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_integrate_moves_by_velocity() {
        let mut physics = PhysicsComponent::attached_to(EntityId::new(0));
        physics.velocity = Vec3::new(10.0, -4.0, 0.0);
        physics.integrate(0.5);
        assert_relative_eq!(*physics.position(), Vec3::new(5.0, -2.0, 0.0));
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut physics = PhysicsComponent::attached_to(EntityId::new(0));
        physics.velocity = Vec3::new(10.0, 10.0, 0.0);
        physics.integrate(0.0);
        assert_relative_eq!(*physics.position(), Vec3::zeros());
    }
}
