//! Hit-scan shooting from the camera through the crosshair.

use bevy::prelude::*;
use bevy_kira_audio::prelude::*;

use crate::assets::GameAssets;
use crate::physics::{BodyHandle, PhysicsWorld};
use crate::player::controller::ControllerFrame;
use crate::settings::ShootingSettings;

/// Line from the camera through the crosshair. Rebuilt every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimRay {
    pub origin: Vec3,
    pub direction: Dir3,
}

impl AimRay {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            origin: transform.translation,
            direction: transform.forward(),
        }
    }

    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + *self.direction * distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ShotResult {
    pub impact_point: Vec3,
    pub body: BodyHandle,
    pub time_of_impact: f32,
}

/// First thing under the crosshair that is not the shooter.
///
/// With `fire` set the hit body also receives a small impulse at the exact
/// impact point, along the ray.
pub fn resolve(
    world: &mut dyn PhysicsWorld,
    ray: AimRay,
    shooter: BodyHandle,
    fire: bool,
    settings: &ShootingSettings,
) -> Option<ShotResult> {
    let hit = world.cast_ray(ray.origin, ray.direction, settings.max_range, true)?;
    let body = world.parent(hit.collider)?;

    if !world.is_valid(body) || body == shooter {
        return None;
    }

    let impact_point = ray.point_at(hit.time_of_impact);
    if fire {
        let impulse = *ray.direction * settings.impulse_strength;
        world.apply_impulse_at_point(body, impulse, impact_point, true);
        debug!("shot hit {:?} at {}", body, impact_point);
    }

    Some(ShotResult {
        impact_point,
        body,
        time_of_impact: hit.time_of_impact,
    })
}

/// Small dot showing where the crosshair currently lands.
#[derive(Component)]
pub struct HitMarker;

pub fn spawn_hit_marker(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Name::new("Hit Marker"),
        HitMarker,
        Mesh3d(meshes.add(Sphere::new(0.03))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.1, 0.1),
            unlit: true,
            ..default()
        })),
        Transform::default(),
    ));
}

/// Keeps the marker on the latest impact; it stays put while nothing is hit.
pub fn move_hit_marker(
    frames: Query<&ControllerFrame>,
    mut marker: Query<&mut Transform, With<HitMarker>>,
) {
    let Ok(frame) = frames.single() else {
        return;
    };
    let Some(impact_point) = frame.marker else {
        return;
    };
    for mut transform in marker.iter_mut() {
        transform.translation = impact_point;
    }
}

pub fn play_shot_sound(
    frames: Query<&ControllerFrame>,
    audio: Res<Audio>,
    assets: Res<GameAssets>,
) {
    for frame in frames.iter() {
        if frame.fired {
            audio.play(assets.pistol_shot.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ColliderHandle, RayHit};

    /// One collider in front of the camera, optionally invalidated.
    #[derive(Default)]
    struct Target {
        toi: Option<f32>,
        owner: u64,
        valid: bool,
        impulses: Vec<(BodyHandle, Vec3, Vec3)>,
    }

    impl PhysicsWorld for Target {
        fn cast_ray(&mut self, _: Vec3, _: Dir3, max: f32, _: bool) -> Option<RayHit> {
            self.toi.filter(|toi| *toi <= max).map(|toi| RayHit {
                time_of_impact: toi,
                collider: ColliderHandle(self.owner * 10),
            })
        }

        fn cast_ray_excluding(
            &mut self,
            origin: Vec3,
            dir: Dir3,
            max: f32,
            solid: bool,
            _excluded: BodyHandle,
        ) -> Option<RayHit> {
            self.cast_ray(origin, dir, max, solid)
        }

        fn parent(&self, collider: ColliderHandle) -> Option<BodyHandle> {
            Some(BodyHandle(collider.0 / 10))
        }

        fn is_valid(&self, _body: BodyHandle) -> bool {
            self.valid
        }

        fn translation(&mut self, _body: BodyHandle) -> Option<Vec3> {
            None
        }

        fn set_translation(&mut self, _body: BodyHandle, _translation: Vec3, _wake_up: bool) {}

        fn linvel(&mut self, _body: BodyHandle) -> Option<Vec3> {
            None
        }

        fn set_linvel(&mut self, _body: BodyHandle, _linvel: Vec3, _wake_up: bool) {}

        fn apply_impulse(&mut self, _body: BodyHandle, _impulse: Vec3, _wake_up: bool) {}

        fn apply_impulse_at_point(&mut self, body: BodyHandle, impulse: Vec3, at: Vec3, _: bool) {
            self.impulses.push((body, impulse, at));
        }
    }

    fn forward_ray() -> AimRay {
        AimRay {
            origin: Vec3::new(0.0, 2.0, 0.0),
            direction: Dir3::NEG_Z,
        }
    }

    #[test]
    fn impact_point_lies_along_the_ray() {
        let mut world = Target {
            toi: Some(5.0),
            owner: 2,
            valid: true,
            ..default()
        };
        let shot = resolve(&mut world, forward_ray(), BodyHandle(1), false, &default()).unwrap();
        assert_eq!(shot.impact_point, Vec3::new(0.0, 2.0, -5.0));
        assert_eq!(shot.body, BodyHandle(2));
        assert!(world.impulses.is_empty());
    }

    #[test]
    fn firing_pushes_the_hit_body() {
        let mut world = Target {
            toi: Some(5.0),
            owner: 2,
            valid: true,
            ..default()
        };
        resolve(&mut world, forward_ray(), BodyHandle(1), true, &default());
        assert_eq!(world.impulses.len(), 1);
        let (body, impulse, point) = world.impulses[0];
        assert_eq!(body, BodyHandle(2));
        assert!((impulse - Vec3::new(0.0, 0.0, -0.025)).length() < 1e-6);
        assert_eq!(point, Vec3::new(0.0, 2.0, -5.0));
    }

    #[test]
    fn own_body_is_never_reported() {
        let mut world = Target {
            toi: Some(0.4),
            owner: 1,
            valid: true,
            ..default()
        };
        assert_eq!(resolve(&mut world, forward_ray(), BodyHandle(1), true, &default()), None);
        assert!(world.impulses.is_empty());
    }

    #[test]
    fn stale_bodies_count_as_misses() {
        let mut world = Target {
            toi: Some(3.0),
            owner: 4,
            valid: false,
            ..default()
        };
        assert_eq!(resolve(&mut world, forward_ray(), BodyHandle(1), true, &default()), None);
    }

    #[test]
    fn out_of_range_is_a_miss() {
        let mut world = Target {
            toi: Some(150.0),
            owner: 4,
            valid: true,
            ..default()
        };
        assert_eq!(resolve(&mut world, forward_ray(), BodyHandle(1), false, &default()), None);
    }

    #[test]
    fn ray_follows_the_camera_forward() {
        let transform =
            Transform::from_xyz(0.0, 2.0, 0.0).looking_at(Vec3::new(0.0, 2.0, -10.0), Vec3::Y);
        let ray = AimRay::from_transform(&transform);
        assert!((ray.point_at(5.0) - Vec3::new(0.0, 2.0, -5.0)).length() < 1e-5);
    }
}
