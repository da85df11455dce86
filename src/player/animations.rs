use std::time::Duration;

use bevy::prelude::*;
use strum::{EnumCount, IntoEnumIterator};

use crate::animations_utils::AnimationPlayerOf;
use crate::assets::GameAssets;
use crate::locomotion::LocomotionPose;
use crate::player::controller::ControllerFrame;

const CROSSFADE: Duration = Duration::from_millis(200);

/// Hand bone of the rigged model; recoil and the muzzle flash attach here.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandBone {
    Left,
    Right,
}

impl HandBone {
    fn from_bone_name(name: &str) -> Option<Self> {
        match name {
            "mixamorigLeftHand" | "mixamorig:LeftHand" => Some(Self::Left),
            "mixamorigRightHand" | "mixamorig:RightHand" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Graph node of every pose, indexed by the pose discriminant.
#[derive(Component, Debug)]
pub struct PoseClips {
    nodes: Vec<AnimationNodeIndex>,
    current: LocomotionPose,
}

impl PoseClips {
    pub fn node(&self, pose: LocomotionPose) -> AnimationNodeIndex {
        self.nodes[pose as usize]
    }
}

/// Intrinsic length of the jump clip, known once the clip asset has loaded.
#[derive(Resource, Debug, Default)]
pub struct JumpTiming {
    pub duration: Option<Duration>,
}

impl JumpTiming {
    pub fn duration_or(&self, fallback: Duration) -> Duration {
        self.duration.unwrap_or(fallback)
    }
}

pub fn on_animation_player_loaded(
    on: On<Add, AnimationPlayerOf>,
    assets: Res<GameAssets>,
    mut players: Query<&mut AnimationPlayer>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut commands: Commands,
    names: Query<&Name>,
    children: Query<&Children>,
) -> Result {
    let entity = on.event_target();

    if assets.player_clips.len() < LocomotionPose::COUNT {
        return Err(format!(
            "player model has {} clips, expected {}",
            assets.player_clips.len(),
            LocomotionPose::COUNT
        )
        .into());
    }

    let (graph, nodes) = AnimationGraph::from_clips(
        LocomotionPose::iter().map(|pose| assets.player_clips[pose as usize].clone()),
    );

    let mut player = players.get_mut(entity)?;
    let mut transitions = AnimationTransitions::new();
    transitions
        .play(&mut player, nodes[LocomotionPose::Idle as usize], Duration::ZERO)
        .repeat();

    for bone in children.iter_descendants(entity) {
        let Some(hand) = names
            .get(bone)
            .ok()
            .and_then(|name| HandBone::from_bone_name(name.as_str()))
        else {
            continue;
        };
        commands.entity(bone).insert(hand);
    }

    commands.entity(entity).insert((
        AnimationGraphHandle(graphs.add(graph)),
        transitions,
        PoseClips {
            nodes,
            current: LocomotionPose::Idle,
        },
    ));

    Ok(())
}

/// Crossfades to the pose the controller picked this tick.
pub fn play_selected_pose(
    mut q: Query<(
        &mut AnimationPlayer,
        &mut AnimationTransitions,
        &mut PoseClips,
        &AnimationPlayerOf,
    )>,
    frames: Query<&ControllerFrame>,
) {
    for (mut player, mut transitions, mut clips, AnimationPlayerOf(root)) in q.iter_mut() {
        let Ok(frame) = frames.get(*root) else {
            continue;
        };

        // A jump right after landing keeps the pose but must restart the clip.
        if frame.pose == clips.current && !frame.jump_triggered {
            continue;
        }

        let active = transitions.play(&mut player, clips.node(frame.pose), CROSSFADE);
        if frame.pose.is_looping() {
            active.repeat();
        }
        clips.current = frame.pose;
    }
}

pub fn update_jump_timing(
    assets: Res<GameAssets>,
    clips: Res<Assets<AnimationClip>>,
    mut timing: ResMut<JumpTiming>,
) {
    if timing.duration.is_some() {
        return;
    }

    let Some(clip) = assets
        .player_clips
        .get(LocomotionPose::JumpRise as usize)
        .and_then(|handle| clips.get(handle))
    else {
        return;
    };

    let duration = Duration::from_secs_f32(clip.duration());
    info!("jump clip lasts {:?}", duration);
    timing.duration = Some(duration);
}
