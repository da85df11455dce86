use avian3d::prelude::*;
use bevy::prelude::*;

use crate::physics::{AvianPhysics, BodyHandle, ColliderHandle, PhysicsWorld};
use crate::player::PlayerSystems;

pub struct PlatformPlugin;

impl Plugin for PlatformPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MovingPlatform>();
        app.add_systems(Update, move_platforms.before(PlayerSystems::Tick));
    }
}

/// Kinematic body swinging along X that drags whatever rides it.
#[derive(Component, Reflect, Debug, Clone)]
#[require(Transform, CollidingEntities)]
pub struct MovingPlatform {
    pub origin: Vec3,
    pub amplitude: f32,
    /// Radians per second
    pub angular_speed: f32,
    elapsed: f32,
    position: Vec3,
}

impl MovingPlatform {
    pub fn new(origin: Vec3) -> Self {
        Self {
            origin,
            amplitude: 2.0,
            angular_speed: 2.0,
            elapsed: 0.0,
            position: origin,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Steps the swing and returns how far the platform moved.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.elapsed += dt;
        let next = self.origin
            + Vec3::X * platform_offset(self.elapsed, self.amplitude, self.angular_speed);
        let delta = next - self.position;
        self.position = next;
        delta
    }
}

pub fn platform_offset(elapsed: f32, amplitude: f32, angular_speed: f32) -> f32 {
    (elapsed * angular_speed).sin() * amplitude
}

/// Bodies that follow a platform they touch.
#[derive(Component, Default)]
pub struct PlatformRider;

/// Moves the platform and shifts every rider horizontally by the same delta.
pub fn carry(
    world: &mut dyn PhysicsWorld,
    platform: BodyHandle,
    position: Vec3,
    delta: Vec3,
    riders: impl IntoIterator<Item = BodyHandle>,
) {
    world.set_translation(platform, position, true);

    let horizontal = Vec3::new(delta.x, 0.0, delta.z);
    if horizontal == Vec3::ZERO {
        return;
    }
    for rider in riders {
        if let Some(translation) = world.translation(rider) {
            world.set_translation(rider, translation + horizontal, true);
        }
    }
}

fn move_platforms(
    mut platforms: Query<(Entity, &mut MovingPlatform, &CollidingEntities)>,
    riders: Query<(), With<PlatformRider>>,
    mut physics: AvianPhysics,
    time: Res<Time>,
) {
    for (entity, mut platform, touching) in platforms.iter_mut() {
        let delta = platform.advance(time.delta_secs());

        let mut carried: Vec<BodyHandle> = Vec::new();
        for collider in touching.iter() {
            let Some(body) = physics.parent(ColliderHandle::from(*collider)) else {
                continue;
            };
            if riders.contains(body.entity()) && !carried.contains(&body) {
                carried.push(body);
            }
        }

        carry(
            &mut physics,
            entity.into(),
            platform.position(),
            delta,
            carried,
        );
    }
}
