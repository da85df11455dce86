use std::time::Duration;

use bevy::prelude::*;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};

use crate::settings::DiagonalPolicy;

/// The single animation/movement mode shown for a tick.
///
/// The declaration order is also the order of the clips in the player model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, EnumIter, EnumCount, IntoStaticStr,
)]
pub enum LocomotionPose {
    #[default]
    Idle,
    WalkForward,
    WalkBackward,
    RunForward,
    RunBackward,
    StrafeLeft,
    StrafeRight,
    JumpRise,
    JumpFall,
}

impl LocomotionPose {
    /// Whether the clip loops while the pose is held.
    pub fn is_looping(self) -> bool {
        !matches!(self, Self::JumpRise | Self::JumpFall)
    }
}

/// Debounced key state plus grounding for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocomotionInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
    pub jump: bool,
    pub grounded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocomotionTick {
    pub pose: LocomotionPose,
    /// A jump started this tick; the caller applies the jump impulse
    pub jump_triggered: bool,
}

#[derive(Debug, Clone, Default, Reflect)]
pub struct LocomotionState {
    pub pose: LocomotionPose,
    /// The jump clip is still playing
    pub jumping: bool,
    /// Set on jump, cleared on the first grounded tick after the clip ended
    pub debounce: bool,
    jump_ends_at: Option<Duration>,
}

impl LocomotionState {
    pub fn select(
        &mut self,
        input: &LocomotionInput,
        now: Duration,
        jump_duration: Duration,
        diagonal: DiagonalPolicy,
    ) -> LocomotionTick {
        if self.jumping && self.jump_ends_at.is_none_or(|end| now >= end) {
            self.jumping = false;
            self.jump_ends_at = None;
        }

        if !self.debounce && !self.jumping && input.jump && input.grounded {
            self.pose = LocomotionPose::JumpRise;
            self.jumping = true;
            self.debounce = true;
            self.jump_ends_at = Some(now + jump_duration);
            debug!("jump triggered, clip ends in {:?}", jump_duration);
            return LocomotionTick {
                pose: self.pose,
                jump_triggered: true,
            };
        }

        if self.jumping || self.debounce {
            if !self.jumping {
                if input.grounded {
                    self.debounce = false;
                } else {
                    self.pose = LocomotionPose::JumpFall;
                }
            }
            return LocomotionTick {
                pose: self.pose,
                jump_triggered: false,
            };
        }

        self.pose = ground_pose(input, diagonal);
        LocomotionTick {
            pose: self.pose,
            jump_triggered: false,
        }
    }
}

fn ground_pose(input: &LocomotionInput, diagonal: DiagonalPolicy) -> LocomotionPose {
    use LocomotionPose::*;

    let longitudinal = match (input.forward, input.backward, input.run) {
        (true, _, false) => Some(WalkForward),
        (true, _, true) => Some(RunForward),
        (false, true, false) => Some(WalkBackward),
        (false, true, true) => Some(RunBackward),
        (false, false, _) => None,
    };
    let lateral = match (input.left, input.right) {
        (true, _) => Some(StrafeLeft),
        (false, true) => Some(StrafeRight),
        (false, false) => None,
    };

    match (longitudinal, lateral, diagonal) {
        (Some(pose), Some(_), DiagonalPolicy::PreferForward) => pose,
        (Some(_), Some(pose), DiagonalPolicy::PreferStrafe) => pose,
        (Some(pose), None, _) | (None, Some(pose), _) => pose,
        (None, None, _) => Idle,
    }
}
