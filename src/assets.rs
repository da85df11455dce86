use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::AudioSource;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum AssetState {
    #[default]
    Loading,
    Ready,
}

#[derive(Resource, AssetCollection)]
pub struct GameAssets {
    #[asset(path = "models/player.glb#Scene0")]
    pub player: Handle<Scene>,

    /// One clip per locomotion pose, in pose order
    #[asset(
        paths(
            "models/player.glb#Animation0",
            "models/player.glb#Animation1",
            "models/player.glb#Animation2",
            "models/player.glb#Animation3",
            "models/player.glb#Animation4",
            "models/player.glb#Animation5",
            "models/player.glb#Animation6",
            "models/player.glb#Animation7",
            "models/player.glb#Animation8",
        ),
        collection(typed)
    )]
    pub player_clips: Vec<Handle<AnimationClip>>,

    #[asset(path = "sfx/pistol-shot.ogg")]
    pub pistol_shot: Handle<AudioSource>,
}

pub struct AssetPlugin;

impl Plugin for AssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AssetState>()
            .add_loading_state(
                LoadingState::new(AssetState::Loading)
                    .continue_to_state(AssetState::Ready)
                    .load_collection::<GameAssets>(),
            )
            .add_systems(OnEnter(AssetState::Ready), || info!("assets loaded"));
    }
}
