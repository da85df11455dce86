pub mod muzzle_flash;
pub mod recoil;
pub mod timed;

pub use muzzle_flash::*;
pub use recoil::*;
pub use timed::*;

use bevy::app::AnimationSystems;
use bevy::prelude::*;

/// Recoil and muzzle flash rendering. Both read their timers from the
/// player controller, which starts them when a shot is fired.
pub struct ShotEffectsPlugin;

impl Plugin for ShotEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, muzzle_flash::spawn_muzzle_flash);
        app.add_systems(
            PostUpdate,
            (recoil::apply_recoil, muzzle_flash::update_muzzle_flash)
                .chain()
                .after(AnimationSystems)
                .before(TransformSystems::Propagate),
        );
    }
}
