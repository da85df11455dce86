use bevy::prelude::*;

use crate::physics::PhysicsWorld;
use crate::settings::{CameraModeSettings, CameraRigSettings, CollisionSettings};

/// Projection parameters that blend between the orbit and aim modes.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Lens {
    pub fov_degrees: f32,
    pub zoom: f32,
    pub near: f32,
}

impl Lens {
    pub fn of(mode: &CameraModeSettings) -> Self {
        Self {
            fov_degrees: mode.fov_degrees,
            zoom: mode.zoom,
            near: mode.near,
        }
    }

    fn approach(&mut self, target: Lens, fraction: f32) {
        self.fov_degrees += (target.fov_degrees - self.fov_degrees) * fraction;
        self.zoom += (target.zoom - self.zoom) * fraction;
        self.near += (target.near - self.near) * fraction;
    }

    /// Vertical field of view in radians with the zoom factor folded in.
    pub fn effective_fov(&self) -> f32 {
        let half = self.fov_degrees.to_radians() / 2.0;
        2.0 * (half.tan() / self.zoom.max(f32::EPSILON)).atan()
    }
}

/// Where the camera is and what it looks at for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub translation: Vec3,
    pub look_at: Vec3,
    pub lens: Lens,
}

impl CameraPose {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation).looking_at(self.look_at, Vec3::Y)
    }
}

/// Exponentially smoothed third-person camera.
///
/// `smoothed_player` is the head anchor the camera orbits; `smoothed_camera`
/// trails the resolved (collision-adjusted) camera position.
#[derive(Debug, Clone, Reflect)]
pub struct CameraRig {
    pub smoothed_player: Vec3,
    pub smoothed_camera: Vec3,
    pub lens: Lens,
}

impl CameraRig {
    pub fn new(player_translation: Vec3, settings: &CameraRigSettings) -> Self {
        Self {
            smoothed_player: player_translation,
            smoothed_camera: player_translation,
            lens: Lens::of(&settings.orbit),
        }
    }

    /// Moves the head anchor towards the body's new position.
    pub fn follow(&mut self, body_translation: Vec3, head_height: f32, smoothing: f32) {
        let target = body_translation + Vec3::Y * head_height;
        self.smoothed_player = self.smoothed_player.lerp(target, smoothing);
    }

    pub fn update(
        &mut self,
        yaw: f32,
        pitch: f32,
        zoom_active: bool,
        probe: Option<&mut (dyn PhysicsWorld + '_)>,
        settings: &CameraRigSettings,
    ) -> CameraPose {
        let mode = if zoom_active {
            &settings.aim
        } else {
            &settings.orbit
        };

        let ideal = ideal_position(self.smoothed_player, yaw, pitch, mode, settings.anchor_drop);
        let resolved = match probe {
            Some(world) if settings.collision.enabled => {
                avoid_obstructions(world, self.smoothed_player, ideal, &settings.collision)
            }
            _ => ideal,
        };

        self.smoothed_camera = self.smoothed_camera.lerp(resolved, mode.smoothing);
        self.lens.approach(Lens::of(mode), settings.lens_blend);

        let look_at = if zoom_active {
            self.smoothed_player + aim_direction(yaw, pitch) * settings.aim_lookahead
        } else {
            self.smoothed_player + Vec3::Y * settings.orbit_look_height
        };

        CameraPose {
            translation: self.smoothed_camera,
            look_at,
            lens: self.lens,
        }
    }
}

/// Unobstructed camera position for the given mode.
pub fn ideal_position(
    anchor: Vec3,
    yaw: f32,
    pitch: f32,
    mode: &CameraModeSettings,
    anchor_drop: f32,
) -> Vec3 {
    let distance = mode.distance(pitch);
    let offset = Vec3::new(
        mode.lateral_offset,
        pitch.sin() * distance + mode.height,
        -pitch.cos() * distance,
    );
    anchor + Quat::from_rotation_y(yaw) * offset - Vec3::Y * anchor_drop
}

/// Unit direction of the aim ray for the given look angles.
pub fn aim_direction(yaw: f32, pitch: f32) -> Vec3 {
    let rotation = Quat::from_euler(EulerRot::YXZ, yaw + std::f32::consts::PI, -pitch, 0.0);
    (rotation * Vec3::new(0.1, 0.0, -1.0)).normalize()
}

/// Pulls the camera in front of whatever blocks the view from `anchor`.
///
/// Casts the primary ray plus one ray per cone offset and keeps the nearest
/// hit. The result is never farther from `anchor` than `ideal`.
pub fn avoid_obstructions(
    world: &mut dyn PhysicsWorld,
    anchor: Vec3,
    ideal: Vec3,
    settings: &CollisionSettings,
) -> Vec3 {
    let natural = anchor.distance(ideal);
    let Ok(direction) = Dir3::new(ideal - anchor) else {
        return ideal;
    };

    let cone = settings.cone_offsets.iter().filter_map(|offset| {
        Dir3::new(*direction + *offset).ok()
    });

    let nearest = std::iter::once(direction)
        .chain(cone)
        .filter_map(|ray| world.cast_ray(anchor, ray, natural, true))
        .map(|hit| hit.time_of_impact)
        .reduce(f32::min);

    let Some(nearest) = nearest else {
        return ideal;
    };
    if nearest >= natural - settings.tolerance {
        return ideal;
    }

    let safe = (nearest - settings.backoff).max(settings.min_distance);
    let adjusted = anchor + *direction * safe;
    if safe < natural - settings.adoption_threshold {
        adjusted
    } else {
        ideal
    }
}
