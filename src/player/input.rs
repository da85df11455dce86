use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions};

use crate::settings::KeyBindings;

/// Button state and mouse movement for the current frame.
#[derive(Resource, Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(Resource)]
pub struct ControllerInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
    pub jump: bool,
    /// Only true on the frame the fire button went down
    pub fire: bool,
    pub zoom: bool,
    pub look_delta: Vec2,
}

impl ControllerInput {
    pub fn from_buttons(
        keyboard: &ButtonInput<KeyCode>,
        mouse: &ButtonInput<MouseButton>,
        bindings: &KeyBindings,
    ) -> Self {
        let held = |keys: &[KeyCode]| keyboard.any_pressed(keys.iter().copied());
        Self {
            forward: held(&bindings.forward),
            backward: held(&bindings.backward),
            left: held(&bindings.left),
            right: held(&bindings.right),
            run: held(&bindings.run),
            jump: held(&bindings.jump),
            fire: mouse.just_pressed(bindings.fire),
            zoom: mouse.pressed(bindings.zoom),
            look_delta: Vec2::ZERO,
        }
    }
}

pub fn gather_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut motion: MessageReader<MouseMotion>,
    cursor: Query<&CursorOptions>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<ControllerInput>,
) {
    let delta: Vec2 = motion.read().map(|event| event.delta).sum();
    let locked = cursor
        .single()
        .is_ok_and(|options| options.grab_mode != CursorGrabMode::None);

    *input = ControllerInput {
        look_delta: if locked { delta } else { Vec2::ZERO },
        ..ControllerInput::from_buttons(&keyboard, &mouse, &bindings)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternate_keys_are_equivalent() {
        let bindings = KeyBindings::default();
        let mouse = ButtonInput::<MouseButton>::default();

        let mut arrows = ButtonInput::<KeyCode>::default();
        arrows.press(KeyCode::ArrowUp);
        arrows.press(KeyCode::ArrowLeft);
        let mut letters = ButtonInput::<KeyCode>::default();
        letters.press(KeyCode::KeyW);
        letters.press(KeyCode::KeyA);

        let from_arrows = ControllerInput::from_buttons(&arrows, &mouse, &bindings);
        assert!(from_arrows.forward && from_arrows.left);
        assert_eq!(
            from_arrows,
            ControllerInput::from_buttons(&letters, &mouse, &bindings)
        );
    }

    #[test]
    fn fire_only_on_the_press_frame() {
        let bindings = KeyBindings::default();
        let keyboard = ButtonInput::<KeyCode>::default();
        let mut mouse = ButtonInput::<MouseButton>::default();

        mouse.press(MouseButton::Left);
        mouse.press(MouseButton::Right);
        let first = ControllerInput::from_buttons(&keyboard, &mouse, &bindings);
        assert!(first.fire);
        assert!(first.zoom);

        mouse.clear();
        let held = ControllerInput::from_buttons(&keyboard, &mouse, &bindings);
        assert!(!held.fire);
        assert!(held.zoom);
    }

    #[test]
    fn run_and_jump_bindings() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyF);
        keyboard.press(KeyCode::Space);
        let input = ControllerInput::from_buttons(
            &keyboard,
            &ButtonInput::default(),
            &KeyBindings::default(),
        );
        assert!(input.run && input.jump);
        assert!(!input.forward);
    }
}
