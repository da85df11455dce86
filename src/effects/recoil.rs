use std::time::Duration;

use bevy::prelude::*;

use crate::effects::timed::{TimedEffect, ease_recoil};
use crate::player::animations::HandBone;
use crate::player::controller::PlayerController;
use crate::settings::RecoilSettings;

/// Hand-bone kick played after every shot.
#[derive(Debug, Clone, Reflect)]
pub struct Recoil {
    effect: TimedEffect,
    strength: f32,
    hand_roll: f32,
}

/// Extra roll around the local Z axis of each hand bone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecoilOffset {
    pub left_roll: f32,
    pub right_roll: f32,
}

impl Recoil {
    pub fn new(settings: &RecoilSettings) -> Self {
        Self {
            effect: TimedEffect::new(settings.duration),
            strength: settings.strength,
            hand_roll: settings.hand_roll,
        }
    }

    pub fn start(&mut self, now: Duration) {
        self.effect.start(now);
    }

    pub fn is_active(&self) -> bool {
        self.effect.is_active()
    }

    /// `None` while idle. The finishing tick returns a zero offset so the hands
    /// end up exactly on the animated pose.
    pub fn tick(&mut self, now: Duration) -> Option<RecoilOffset> {
        let progress = self.effect.tick(now)?;
        if progress >= 1.0 {
            return Some(RecoilOffset::default());
        }

        let intensity = ease_recoil(progress) * self.strength;
        Some(RecoilOffset {
            left_roll: intensity * self.hand_roll,
            right_roll: -intensity * self.hand_roll,
        })
    }
}

/// Runs after animation evaluation, so the animated rotation is the base every frame.
pub fn apply_recoil(
    mut players: Query<&mut PlayerController>,
    mut bones: Query<(&HandBone, &mut Transform)>,
    time: Res<Time<Real>>,
) {
    let Ok(mut controller) = players.single_mut() else {
        return;
    };

    let Some(offset) = controller.recoil.tick(time.elapsed()) else {
        return;
    };

    for (hand, mut transform) in bones.iter_mut() {
        let roll = match hand {
            HandBone::Left => offset.left_roll,
            HandBone::Right => offset.right_roll,
        };
        transform.rotation *= Quat::from_rotation_z(roll);
    }
}
