use std::time::Duration;

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::assets::GameAssets;
use crate::camera::{CameraPose, CameraRig};
use crate::effects::{MuzzleFlash, Recoil};
use crate::locomotion::{LocomotionInput, LocomotionPose, LocomotionState};
use crate::physics::{AvianPhysics, BodyHandle, PhysicsWorld};
use crate::platform::PlatformRider;
use crate::player::animations::JumpTiming;
use crate::player::input::ControllerInput;
use crate::settings::{ControllerSettings, LookSettings, MovementSettings};
use crate::shooting::{self, AimRay, ShotResult};

#[derive(Component, Default)]
#[require(Transform, InheritedVisibility, PlatformRider)]
pub struct PlayerRoot;

/// The visual model under the player root; it turns with the yaw while the body stays upright.
#[derive(Component)]
pub struct PlayerModel;

/// Where the player is and where it looks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct PlayerPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Everything the controller decided this tick, for the presentation systems.
#[derive(Component, Debug, Clone, Default)]
pub struct ControllerFrame {
    pub pose: LocomotionPose,
    /// `None` until the first tick
    pub camera: Option<CameraPose>,
    /// What the crosshair hits this tick
    pub shot: Option<ShotResult>,
    /// Latest impact point, kept across misses
    pub marker: Option<Vec3>,
    pub fired: bool,
    pub grounded: bool,
    pub jump_triggered: bool,
}

#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub pose: PlayerPose,
    pub locomotion: LocomotionState,
    pub rig: CameraRig,
    pub recoil: Recoil,
    pub muzzle_flash: MuzzleFlash,
    /// Latest impact under the crosshair; kept while nothing is hit
    pub marker: Option<Vec3>,
}

impl PlayerController {
    pub fn new(settings: &ControllerSettings, translation: Vec3) -> Self {
        Self {
            pose: PlayerPose {
                position: translation,
                ..default()
            },
            locomotion: LocomotionState::default(),
            rig: CameraRig::new(
                translation + Vec3::Y * settings.movement.head_height,
                &settings.camera,
            ),
            recoil: Recoil::new(&settings.recoil),
            muzzle_flash: MuzzleFlash::new(&settings.muzzle_flash),
            marker: None,
        }
    }

    pub fn look(&mut self, delta: Vec2, settings: &LookSettings) {
        self.pose.yaw -= delta.x * settings.mouse_sensitivity;
        self.pose.pitch = (self.pose.pitch + delta.y * settings.mouse_sensitivity)
            .clamp(-settings.pitch_limit, settings.pitch_limit);
    }

    /// One frame of the controller.
    ///
    /// Without a physics world the player is treated as airborne, the body is
    /// not driven, the camera skips collision avoidance and nothing can be hit.
    pub fn tick(
        &mut self,
        mut world: Option<&mut dyn PhysicsWorld>,
        body: BodyHandle,
        input: &ControllerInput,
        now: Duration,
        jump_duration: Duration,
        settings: &ControllerSettings,
    ) -> ControllerFrame {
        let movement = &settings.movement;
        self.look(input.look_delta, &settings.look);

        let grounded = world
            .as_deref_mut()
            .is_some_and(|world| is_grounded(world, body, movement.ground_probe_length));

        let locomotion = self.locomotion.select(
            &LocomotionInput {
                forward: input.forward,
                backward: input.backward,
                left: input.left,
                right: input.right,
                run: input.run,
                jump: input.jump,
                grounded,
            },
            now,
            jump_duration,
            settings.diagonal_policy,
        );

        if let Some(world) = world.as_deref_mut() {
            let intent = movement_intent(input, self.pose.yaw, movement);
            if let Some(velocity) = world.linvel(body) {
                world.set_linvel(body, Vec3::new(intent.x, velocity.y, intent.z), true);
            }
            if locomotion.jump_triggered {
                world.apply_impulse(body, Vec3::Y * movement.jump_impulse, true);
            }
            match world.translation(body) {
                Some(translation) => self.pose.position = translation,
                None => warn_once!("player body {:?} has no physics state", body),
            }
        }

        self.rig.follow(
            self.pose.position,
            movement.head_height,
            movement.position_smoothing,
        );
        let camera = self.rig.update(
            self.pose.yaw,
            self.pose.pitch,
            input.zoom,
            world.as_deref_mut(),
            &settings.camera,
        );

        let ray = AimRay::from_transform(&camera.transform());
        let shot = world
            .as_deref_mut()
            .and_then(|world| shooting::resolve(world, ray, body, input.fire, &settings.shooting));
        if let Some(shot) = shot {
            self.marker = Some(shot.impact_point);
        }

        if input.fire {
            self.recoil.start(now);
            self.muzzle_flash.start(now);
        }

        ControllerFrame {
            pose: locomotion.pose,
            camera: Some(camera),
            shot,
            marker: self.marker,
            fired: input.fire,
            grounded,
            jump_triggered: locomotion.jump_triggered,
        }
    }
}

fn is_grounded(world: &mut dyn PhysicsWorld, body: BodyHandle, probe_length: f32) -> bool {
    let Some(origin) = world.translation(body) else {
        return false;
    };
    world
        .cast_ray_excluding(origin, Dir3::NEG_Y, probe_length, true, body)
        .is_some()
}

/// Horizontal velocity requested by the held keys.
///
/// The body faces `R_y(yaw)·+Z`; forward keys push along it and the right key
/// pushes towards `-X` in the body frame.
pub fn movement_intent(input: &ControllerInput, yaw: f32, settings: &MovementSettings) -> Vec3 {
    let rotation = Quat::from_rotation_y(yaw);
    let forward = rotation * Vec3::NEG_Z;
    let right = forward.cross(Vec3::Y);

    let speed = settings.move_speed
        * if input.run {
            settings.run_multiplier
        } else {
            1.0
        };
    let axis = |positive: bool, negative: bool| (positive as i8 - negative as i8) as f32;

    let move_forward = -axis(input.forward, input.backward) * speed;
    let move_right = -axis(input.right, input.left) * speed;
    forward * move_forward + right * move_right
}

pub fn on_player_spawn(
    on: On<Add, PlayerRoot>,
    mut commands: Commands,
    assets: Res<GameAssets>,
    settings: Res<ControllerSettings>,
    transforms: Query<&Transform>,
) -> Result {
    let entity = on.event_target();
    let translation = transforms.get(entity)?.translation;

    commands.entity(entity).insert((
        children![(
            Name::new("Player Model"),
            PlayerModel,
            SceneRoot(assets.player.clone()),
            // Capsule: radius 0.3, height 1.0 -> center to bottom = 0.8
            Transform::from_xyz(0.0, -0.8, 0.0),
        )],
        RigidBody::Dynamic,
        Collider::capsule(0.3, 1.0),
        LockedAxes::ROTATION_LOCKED,
        PlayerController::new(&settings, translation),
        ControllerFrame::default(),
    ));

    info!("player spawned at {}", translation);
    Ok(())
}

pub fn tick_player_controller(
    mut players: Query<(Entity, &mut PlayerController, &mut ControllerFrame)>,
    mut models: Query<&mut Transform, With<PlayerModel>>,
    mut physics: AvianPhysics,
    input: Res<ControllerInput>,
    jump_timing: Res<JumpTiming>,
    settings: Res<ControllerSettings>,
    time: Res<Time<Real>>,
) {
    let Ok((entity, mut controller, mut frame)) = players.single_mut() else {
        return;
    };

    let jump_duration = jump_timing.duration_or(settings.movement.fallback_jump_duration);
    *frame = controller.tick(
        Some(&mut physics as &mut dyn PhysicsWorld),
        entity.into(),
        &input,
        time.elapsed(),
        jump_duration,
        &settings,
    );

    for mut transform in models.iter_mut() {
        transform.rotation = Quat::from_rotation_y(controller.pose.yaw);
    }
}
