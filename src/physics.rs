//! Narrow view of the physics engine used by the controller.
//!
//! The camera probe, the shooting resolver, the movement intent and the moving
//! platforms only ever talk to [`PhysicsWorld`]. [`AvianPhysics`] implements it
//! on top of avian3d; tests implement it over plain vectors.

use avian3d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

/// Identity of a rigid body, comparable across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct BodyHandle(pub u64);

/// Identity of a collider attached to some rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct ColliderHandle(pub u64);

impl From<Entity> for BodyHandle {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

impl BodyHandle {
    pub fn entity(self) -> Entity {
        Entity::from_bits(self.0)
    }
}

impl From<Entity> for ColliderHandle {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

impl ColliderHandle {
    pub fn entity(self) -> Entity {
        Entity::from_bits(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the (unit) ray direction
    pub time_of_impact: f32,
    pub collider: ColliderHandle,
}

/// Ray casts and rigid-body accessors, nothing more.
///
/// Accessors on a body that no longer exists return `None` or do nothing; a
/// stale handle is never an error.
pub trait PhysicsWorld {
    fn cast_ray(
        &mut self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        solid: bool,
    ) -> Option<RayHit>;

    /// Like [`PhysicsWorld::cast_ray`], skipping every collider of `excluded`.
    fn cast_ray_excluding(
        &mut self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        solid: bool,
        excluded: BodyHandle,
    ) -> Option<RayHit>;

    /// Rigid body owning the collider.
    fn parent(&self, collider: ColliderHandle) -> Option<BodyHandle>;

    fn is_valid(&self, body: BodyHandle) -> bool;

    fn translation(&mut self, body: BodyHandle) -> Option<Vec3>;

    fn set_translation(&mut self, body: BodyHandle, translation: Vec3, wake_up: bool);

    fn linvel(&mut self, body: BodyHandle) -> Option<Vec3>;

    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec3, wake_up: bool);

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3, wake_up: bool);

    fn apply_impulse_at_point(
        &mut self,
        body: BodyHandle,
        impulse: Vec3,
        point: Vec3,
        wake_up: bool,
    );
}

/// [`PhysicsWorld`] over the avian3d ECS components.
///
/// The spatial query reads `Position` while the body accessors write it, so
/// all three share one `ParamSet` and are borrowed one at a time.
#[derive(SystemParam)]
pub struct AvianPhysics<'w, 's> {
    colliders: Query<'w, 's, &'static ColliderOf>,
    rigid_bodies: Query<'w, 's, (), With<RigidBody>>,
    access: ParamSet<
        'w,
        's,
        (
            SpatialQuery<'w, 's>,
            Query<'w, 's, (&'static mut Position, &'static mut LinearVelocity), With<RigidBody>>,
            Query<'w, 's, Forces>,
        ),
    >,
    commands: Commands<'w, 's>,
}

impl AvianPhysics<'_, '_> {
    fn wake(&mut self, body: Entity) {
        self.commands.entity(body).try_remove::<Sleeping>();
    }
}

impl PhysicsWorld for AvianPhysics<'_, '_> {
    fn cast_ray(
        &mut self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        solid: bool,
    ) -> Option<RayHit> {
        self.access
            .p0()
            .cast_ray(
                origin,
                direction,
                max_distance,
                solid,
                &SpatialQueryFilter::default(),
            )
            .map(|hit| RayHit {
                time_of_impact: hit.distance,
                collider: hit.entity.into(),
            })
    }

    fn cast_ray_excluding(
        &mut self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        solid: bool,
        excluded: BodyHandle,
    ) -> Option<RayHit> {
        let excluded = excluded.entity();
        let colliders = &self.colliders;
        self.access
            .p0()
            .cast_ray_predicate(
                origin,
                direction,
                max_distance,
                solid,
                &SpatialQueryFilter::default(),
                &|entity| {
                    entity != excluded
                        && colliders
                            .get(entity)
                            .map_or(true, |of| of.body != excluded)
                },
            )
            .map(|hit| RayHit {
                time_of_impact: hit.distance,
                collider: hit.entity.into(),
            })
    }

    fn parent(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        self.colliders
            .get(collider.entity())
            .ok()
            .map(|of| of.body.into())
    }

    fn is_valid(&self, body: BodyHandle) -> bool {
        self.rigid_bodies.contains(body.entity())
    }

    fn translation(&mut self, body: BodyHandle) -> Option<Vec3> {
        self.access
            .p1()
            .get(body.entity())
            .ok()
            .map(|(position, _)| position.0)
    }

    fn set_translation(&mut self, body: BodyHandle, translation: Vec3, wake_up: bool) {
        let entity = body.entity();
        if let Ok((mut position, _)) = self.access.p1().get_mut(entity) {
            position.0 = translation;
        } else {
            return;
        }
        if wake_up {
            self.wake(entity);
        }
    }

    fn linvel(&mut self, body: BodyHandle) -> Option<Vec3> {
        self.access
            .p1()
            .get(body.entity())
            .ok()
            .map(|(_, velocity)| velocity.0)
    }

    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec3, wake_up: bool) {
        let entity = body.entity();
        if let Ok((_, mut velocity)) = self.access.p1().get_mut(entity) {
            velocity.0 = linvel;
        } else {
            return;
        }
        if wake_up {
            self.wake(entity);
        }
    }

    // Forces wakes sleeping bodies on its own, so `wake_up` needs no extra work here.
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3, _wake_up: bool) {
        if let Ok(mut forces) = self.access.p2().get_mut(body.entity()) {
            forces.apply_linear_impulse(impulse);
        }
    }

    fn apply_impulse_at_point(
        &mut self,
        body: BodyHandle,
        impulse: Vec3,
        point: Vec3,
        _wake_up: bool,
    ) {
        if let Ok(mut forces) = self.access.p2().get_mut(body.entity()) {
            forces.apply_linear_impulse_at_point(impulse, point);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    #[test]
    fn avian_adapter_reads_and_writes_bodies_in_one_system() {
        let mut world = World::new();
        world.init_resource::<SpatialQueryPipeline>();
        let body = world
            .spawn((RigidBody::Dynamic, Position(Vec3::new(0.0, 2.0, 0.0))))
            .id();

        let (hit, translation, velocity, valid) = world
            .run_system_once(move |mut physics: AvianPhysics| {
                let handle = BodyHandle::from(body);
                physics.set_translation(handle, Vec3::new(1.0, 2.0, 0.0), true);
                physics.set_linvel(handle, Vec3::X, true);
                (
                    physics.cast_ray(Vec3::ZERO, Dir3::NEG_Y, 10.0, true),
                    physics.translation(handle),
                    physics.linvel(handle),
                    physics.is_valid(handle),
                )
            })
            .unwrap();

        assert_eq!(hit, None);
        assert_eq!(translation, Some(Vec3::new(1.0, 2.0, 0.0)));
        assert_eq!(velocity, Some(Vec3::X));
        assert!(valid);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut world = World::new();
        world.init_resource::<SpatialQueryPipeline>();
        let gone = world.spawn_empty().id();
        world.despawn(gone);

        let (translation, valid) = world
            .run_system_once(move |mut physics: AvianPhysics| {
                let handle = BodyHandle::from(gone);
                physics.set_linvel(handle, Vec3::X, true);
                physics.apply_impulse(handle, Vec3::Y, true);
                (physics.translation(handle), physics.is_valid(handle))
            })
            .unwrap();

        assert_eq!(translation, None);
        assert!(!valid);
    }
}
