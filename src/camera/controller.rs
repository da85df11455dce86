use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};

use crate::player::controller::ControllerFrame;
use crate::settings::KeyBindings;

/// Marks the camera driven by the player's camera rig.
#[derive(Component, Default)]
#[require(Camera3d, Transform)]
pub struct PlayerCamera;

/// Locks the cursor on click and releases it on the release key.
pub fn grab_cursor(
    mut cursor_options: Single<&mut CursorOptions>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Res<KeyBindings>,
) {
    if mouse.just_pressed(MouseButton::Left) && cursor_options.grab_mode == CursorGrabMode::None {
        cursor_options.grab_mode = CursorGrabMode::Locked;
        cursor_options.visible = false;
    }

    if keyboard.just_pressed(bindings.release_cursor) {
        cursor_options.grab_mode = CursorGrabMode::None;
        cursor_options.visible = true;
    }
}

/// Copies the pose computed by the rig this tick onto the camera entity.
pub fn apply_camera_pose(
    frames: Query<&ControllerFrame>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<PlayerCamera>>,
) {
    let Ok(frame) = frames.single() else {
        return;
    };

    let Ok((mut camera_transform, mut projection)) = camera_query.single_mut() else {
        return;
    };

    let Some(pose) = frame.camera else {
        return;
    };

    *camera_transform = pose.transform();

    if let Projection::Perspective(perspective) = projection.as_mut() {
        perspective.fov = pose.lens.effective_fov();
        perspective.near = pose.lens.near;
    }
}
