use std::time::Duration;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use rand::Rng;

use crate::camera::PlayerCamera;
use crate::effects::timed::{TimedEffect, ease_flash};
use crate::player::animations::HandBone;
use crate::player::controller::PlayerController;
use crate::settings::{ControllerSettings, MuzzleFlashSettings};

const TEXTURE_SIZE: u32 = 128;

/// Maps the unitless flash intensity onto Bevy's lumen scale.
const LUMENS_PER_INTENSITY: f32 = light_consts::lumens::LUMENS_PER_LED_WATTS * 40.0;

#[derive(Debug, Clone, Reflect)]
pub struct MuzzleFlash {
    effect: TimedEffect,
    light_intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashFrame {
    /// Eased 0..=1 intensity of sprite and light
    pub intensity: f32,
    pub light_intensity: f32,
    pub visible: bool,
}

impl MuzzleFlash {
    pub fn new(settings: &MuzzleFlashSettings) -> Self {
        Self {
            effect: TimedEffect::new(settings.duration),
            light_intensity: settings.light_intensity,
        }
    }

    pub fn start(&mut self, now: Duration) {
        self.effect.start(now);
    }

    pub fn is_active(&self) -> bool {
        self.effect.is_active()
    }

    pub fn tick(&mut self, now: Duration) -> Option<FlashFrame> {
        let progress = self.effect.tick(now)?;
        if progress >= 1.0 {
            return Some(FlashFrame {
                intensity: 0.0,
                light_intensity: 0.0,
                visible: false,
            });
        }

        let intensity = ease_flash(progress);
        Some(FlashFrame {
            intensity,
            light_intensity: self.light_intensity * intensity,
            visible: true,
        })
    }
}

/// Approximate gun barrel in world space, in front of the right hand along the aim.
pub fn barrel_position(hand: Vec3, pitch: f32, yaw: f32, offset: Vec3) -> Vec3 {
    hand + Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0) * offset
}

/// RGBA8 pixels of the radial flash gradient with some alpha grain.
pub fn flash_texture_data(rng: &mut impl Rng) -> Vec<u8> {
    // (position, rgba) from the white core out to a transparent red rim
    const STOPS: [(f32, [f32; 4]); 4] = [
        (0.0, [255.0, 255.0, 255.0, 1.0]),
        (0.3, [255.0, 200.0, 100.0, 0.8]),
        (0.6, [255.0, 100.0, 0.0, 0.4]),
        (1.0, [255.0, 0.0, 0.0, 0.0]),
    ];

    let half = TEXTURE_SIZE as f32 / 2.0;
    let mut data = Vec::with_capacity((TEXTURE_SIZE * TEXTURE_SIZE * 4) as usize);

    for y in 0..TEXTURE_SIZE {
        for x in 0..TEXTURE_SIZE {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let t = ((dx * dx + dy * dy).sqrt() / half).min(1.0);

            let upper = STOPS.iter().position(|(at, _)| *at >= t).unwrap_or(3).max(1);
            let (from_at, from) = STOPS[upper - 1];
            let (to_at, to) = STOPS[upper];
            let k = ((t - from_at) / (to_at - from_at)).clamp(0.0, 1.0);
            let channel = |i: usize| from[i] + (to[i] - from[i]) * k;

            let grain: f32 = rng.random_range(0.8..1.2);
            let alpha = (channel(3) * 255.0 * grain).clamp(0.0, 255.0);

            data.extend_from_slice(&[
                channel(0) as u8,
                channel(1) as u8,
                channel(2) as u8,
                alpha as u8,
            ]);
        }
    }

    data
}

pub fn flash_texture(rng: &mut impl Rng) -> Image {
    Image::new(
        Extent3d {
            width: TEXTURE_SIZE,
            height: TEXTURE_SIZE,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        flash_texture_data(rng),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

#[derive(Component)]
pub struct MuzzleFlashSprite;

#[derive(Component)]
pub struct MuzzleFlashLight;

pub fn spawn_muzzle_flash(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    settings: Res<ControllerSettings>,
) {
    let texture = images.add(flash_texture(&mut rand::rng()));

    commands.spawn((
        Name::new("Muzzle Flash"),
        MuzzleFlashSprite,
        Mesh3d(meshes.add(Rectangle::new(1.0, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(texture),
            alpha_mode: AlphaMode::Add,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        })),
        Transform::default(),
        Visibility::Hidden,
    ));

    commands.spawn((
        Name::new("Muzzle Flash Light"),
        MuzzleFlashLight,
        PointLight {
            intensity: 0.0,
            range: settings.muzzle_flash.light_range,
            color: Color::srgb(1.0, 0.7, 0.3),
            ..default()
        },
        Transform::default(),
        Visibility::Hidden,
    ));
}

#[allow(clippy::type_complexity)]
pub fn update_muzzle_flash(
    mut players: Query<&mut PlayerController>,
    hands: Query<(&HandBone, &GlobalTransform)>,
    camera: Query<&Transform, With<PlayerCamera>>,
    mut sprite: Query<
        (&mut Transform, &mut Visibility),
        (With<MuzzleFlashSprite>, Without<PlayerCamera>),
    >,
    mut light: Query<
        (&mut PointLight, &mut Transform, &mut Visibility),
        (
            With<MuzzleFlashLight>,
            Without<MuzzleFlashSprite>,
            Without<PlayerCamera>,
        ),
    >,
    settings: Res<ControllerSettings>,
    time: Res<Time<Real>>,
) {
    let Ok(mut controller) = players.single_mut() else {
        return;
    };

    let Some(frame) = controller.muzzle_flash.tick(time.elapsed()) else {
        return;
    };

    let Ok((mut sprite_transform, mut sprite_visibility)) = sprite.single_mut() else {
        return;
    };
    let Ok((mut point_light, mut light_transform, mut light_visibility)) = light.single_mut()
    else {
        return;
    };

    if !frame.visible {
        *sprite_visibility = Visibility::Hidden;
        *light_visibility = Visibility::Hidden;
        return;
    }

    let Some(hand) = hands
        .iter()
        .find(|(hand, _)| matches!(hand, HandBone::Right))
        .map(|(_, global)| global.translation())
    else {
        return;
    };

    let flash = &settings.muzzle_flash;
    let pose = controller.pose;
    let barrel = barrel_position(hand, pose.pitch, pose.yaw, flash.barrel_offset);

    let mut rng = rand::rng();
    sprite_transform.translation = barrel;
    if let Ok(camera) = camera.single() {
        sprite_transform.look_at(camera.translation, Vec3::Y);
    }
    sprite_transform.rotate_local_z(rng.random_range(0.0..std::f32::consts::TAU));
    sprite_transform.scale = Vec3::splat(rng.random_range(0.3..0.5) * frame.intensity);
    *sprite_visibility = Visibility::Visible;

    light_transform.translation = barrel + flash.light_offset;
    point_light.intensity = frame.light_intensity * LUMENS_PER_INTENSITY;
    *light_visibility = Visibility::Visible;
}
