use std::time::Duration;

use avian3d::prelude::*;
use bevy::mesh::MeshPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use tps_controls::platform::{MovingPlatform, PlatformPlugin};
use tps_controls::player::animations::JumpTiming;
use tps_controls::player::controller::tick_player_controller;
use tps_controls::player::input::ControllerInput;
use tps_controls::{ControllerFrame, ControllerSettings, PlayerController, PlayerRoot};

const PLATFORM_ORIGIN: Vec3 = Vec3::new(5.0, 0.4, 5.0);

fn create_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        TransformPlugin,
        bevy::asset::AssetPlugin::default(),
        bevy::scene::ScenePlugin,
        MeshPlugin,
        PhysicsPlugins::default(),
        PlatformPlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));
    app.init_resource::<ControllerSettings>();
    app.init_resource::<ControllerInput>();
    app.init_resource::<JumpTiming>();
    app.add_systems(Update, tick_player_controller);
    app.finish();
    app.cleanup();
    app
}

fn spawn_scene(app: &mut App) -> (Entity, Entity) {
    let settings = ControllerSettings::default();
    let world = app.world_mut();

    world.spawn((
        RigidBody::Static,
        Collider::cuboid(40.0, 0.1, 40.0),
        Transform::from_xyz(0.0, -0.05, 0.0),
    ));

    let start = Vec3::new(0.0, 0.85, 0.0);
    let player = world
        .spawn((
            PlayerRoot,
            Transform::from_translation(start),
            RigidBody::Dynamic,
            Collider::capsule(0.3, 1.0),
            LockedAxes::ROTATION_LOCKED,
            PlayerController::new(&settings, start),
            ControllerFrame::default(),
        ))
        .id();

    let platform = world
        .spawn((
            MovingPlatform::new(PLATFORM_ORIGIN),
            Transform::from_translation(PLATFORM_ORIGIN),
            RigidBody::Kinematic,
            Collider::cuboid(2.5, 0.2, 2.5),
        ))
        .id();

    (player, platform)
}

#[test]
fn controller_ticks_against_avian_bodies() {
    let mut app = create_app();
    let (player, _) = spawn_scene(&mut app);

    for _ in 0..30 {
        app.update();
    }

    let world = app.world();
    let frame = world.get::<ControllerFrame>(player).unwrap();
    assert!(frame.camera.is_some());
    assert!(frame.grounded);
    assert!(!frame.jump_triggered);

    let controller = world.get::<PlayerController>(player).unwrap();
    let position = world.get::<Position>(player).unwrap();
    assert_eq!(controller.pose.position, position.0);
    assert!((0.7..0.9).contains(&position.y), "player at {}", position.0);
}

#[test]
fn walking_input_moves_the_avian_body() {
    let mut app = create_app();
    let (player, _) = spawn_scene(&mut app);
    app.insert_resource(ControllerInput {
        forward: true,
        ..default()
    });

    for _ in 0..30 {
        app.update();
    }

    let position = app.world().get::<Position>(player).unwrap();
    assert!(position.z > 0.2, "player at {}", position.0);
    assert!(position.x.abs() < 0.05);
}

#[test]
fn platforms_follow_their_swing() {
    let mut app = create_app();
    let (_, platform) = spawn_scene(&mut app);

    for _ in 0..5 {
        app.update();
    }

    let world = app.world();
    let swing = world.get::<MovingPlatform>(platform).unwrap().position();
    let position = world.get::<Position>(platform).unwrap();
    assert_eq!(position.0, swing);
    assert!(swing.x > PLATFORM_ORIGIN.x);
    assert_eq!(swing.y, PLATFORM_ORIGIN.y);
}
