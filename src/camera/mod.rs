pub mod controller;
pub mod rig;

pub use controller::*;
pub use rig::*;

use bevy::prelude::*;

use crate::player::PlayerSystems;

/// Plugin for third-person camera system
pub struct ThirdPersonCameraPlugin;

impl Plugin for ThirdPersonCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                controller::grab_cursor.before(PlayerSystems::Input),
                controller::apply_camera_pose.in_set(PlayerSystems::Present),
            ),
        );
    }
}
