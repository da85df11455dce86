use bevy::prelude::*;

use crate::animations_utils::LinkAnimationPlayerPluginFor;
use crate::assets::AssetState;
use crate::player::animations::*;
use crate::player::controller::*;
use crate::player::input::*;
use crate::shooting::{move_hit_marker, play_shot_sound, spawn_hit_marker};

pub mod animations;
pub mod controller;
pub mod input;

/// Frame phases of the controller, run in this order in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSystems {
    Input,
    Tick,
    Present,
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ControllerInput>();
        app.init_resource::<JumpTiming>();
        app.register_type::<ControllerInput>();
        app.add_plugins(LinkAnimationPlayerPluginFor::<PlayerRoot>::default());
        app.add_observer(on_player_spawn);
        app.add_observer(on_animation_player_loaded);
        app.configure_sets(
            Update,
            (
                PlayerSystems::Input,
                PlayerSystems::Tick,
                PlayerSystems::Present,
            )
                .chain()
                .run_if(in_state(AssetState::Ready)),
        );
        app.add_systems(Startup, spawn_hit_marker);
        app.add_systems(
            Update,
            (
                gather_input.in_set(PlayerSystems::Input),
                (update_jump_timing, tick_player_controller)
                    .chain()
                    .in_set(PlayerSystems::Tick),
                (play_selected_pose, move_hit_marker, play_shot_sound)
                    .in_set(PlayerSystems::Present),
            ),
        );
    }
}
