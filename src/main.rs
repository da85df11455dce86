use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use bevy_inspector_egui::quick::{ResourceInspectorPlugin, WorldInspectorPlugin};
use rand::{Rng, SeedableRng, rngs::StdRng};

use tps_controls::assets::AssetState;
use tps_controls::platform::MovingPlatform;
use tps_controls::{ControllerSettings, PlayerCamera, PlayerRoot, TpsControllerPlugin};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "TPS Controls".to_string(),
                        // Bind to canvas included in `index.html`
                        canvas: Some("#bevy".to_owned()),
                        fit_canvas_to_parent: true,
                        // Tells wasm not to override default event handling, like F5 and Ctrl+R
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(bevy::asset::AssetPlugin {
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(EguiPlugin::default())
        .add_plugins(WorldInspectorPlugin::new())
        .add_plugins(ResourceInspectorPlugin::<ControllerSettings>::default())
        .add_plugins(TpsControllerPlugin)
        .insert_resource(ClearColor(Color::srgb(0.53, 0.72, 0.9)))
        .add_systems(OnEnter(AssetState::Ready), (setup, spawn_crosshair))
        .run();
}

/// Floor, a few pushable crates, steps, a moving platform and the player.
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut ambient_light: ResMut<AmbientLight>,
) {
    ambient_light.brightness = 300.0;

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: light_consts::lux::OVERCAST_DAY,
            ..default()
        },
        Transform::from_xyz(8.0, 12.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Floor"),
        Mesh3d(meshes.add(Cuboid::new(40.0, 0.1, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.55, 0.35))),
        Transform::from_xyz(0.0, -0.05, 0.0),
        RigidBody::Static,
        Collider::cuboid(40.0, 0.1, 40.0),
    ));

    // Steps low enough to jump onto.
    for (i, height) in [0.3_f32, 0.6, 0.9].into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Step {i}")),
            Mesh3d(meshes.add(Cuboid::new(2.0, height, 2.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.6, 0.6, 0.65))),
            Transform::from_xyz(-6.0, height / 2.0, 4.0 + i as f32 * 2.0),
            RigidBody::Static,
            Collider::cuboid(2.0, height, 2.0),
        ));
    }

    let mut rng = StdRng::seed_from_u64(7);
    let crate_material = materials.add(Color::srgb(0.7, 0.45, 0.2));
    let crate_mesh = meshes.add(Cuboid::new(0.5, 0.5, 0.5));
    for i in 0..12 {
        let position = Vec3::new(
            rng.random_range(-8.0..8.0),
            0.25 + rng.random_range(0.0..2.0),
            rng.random_range(6.0..14.0),
        );
        commands.spawn((
            Name::new(format!("Crate {i}")),
            Mesh3d(crate_mesh.clone()),
            MeshMaterial3d(crate_material.clone()),
            Transform::from_translation(position),
            RigidBody::Dynamic,
            Collider::cuboid(0.5, 0.5, 0.5),
            Mass(0.2),
        ));
    }

    let platform_origin = Vec3::new(5.0, 0.4, 5.0);
    commands.spawn((
        Name::new("Moving Platform"),
        MovingPlatform::new(platform_origin),
        Mesh3d(meshes.add(Cuboid::new(2.5, 0.2, 2.5))),
        MeshMaterial3d(materials.add(Color::srgb(0.22, 0.63, 0.41))),
        Transform::from_translation(platform_origin),
        RigidBody::Kinematic,
        Collider::cuboid(2.5, 0.2, 2.5),
    ));

    commands.spawn((Name::new("Camera"), PlayerCamera));

    commands.spawn((
        Name::new("Player"),
        PlayerRoot,
        Transform::from_xyz(0.0, 0.85, 0.0),
    ));
}

fn spawn_crosshair(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(6.0),
                    height: Val::Px(6.0),
                    ..default()
                },
                BackgroundColor(Color::WHITE.with_alpha(0.8)),
            ));
        });
}
