//! Third-person shooter controls: locomotion, an over-the-shoulder camera,
//! hit-scan shooting and the recoil and muzzle flash that go with it.

pub mod animations_utils;
pub mod assets;
pub mod camera;
pub mod effects;
pub mod locomotion;
pub mod physics;
pub mod platform;
pub mod player;
pub mod settings;
pub mod shooting;

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;

pub use camera::PlayerCamera;
pub use physics::{BodyHandle, ColliderHandle, PhysicsWorld};
pub use player::controller::{ControllerFrame, PlayerController, PlayerRoot};
pub use settings::{ControllerSettings, KeyBindings};

/// Everything needed to drive a [`PlayerRoot`] with a [`PlayerCamera`].
///
/// Physics is not added here; the app is expected to add avian's
/// `PhysicsPlugins` itself.
pub struct TpsControllerPlugin;

impl Plugin for TpsControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControllerSettings>()
            .init_resource::<KeyBindings>()
            .register_type::<ControllerSettings>()
            .register_type::<KeyBindings>()
            .add_plugins(AudioPlugin)
            .add_plugins(assets::AssetPlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(camera::ThirdPersonCameraPlugin)
            .add_plugins(effects::ShotEffectsPlugin)
            .add_plugins(platform::PlatformPlugin);
    }
}
