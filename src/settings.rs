use std::time::Duration;

use bevy::prelude::*;

/// Every tunable of the controller, grouped per subsystem.
///
/// The defaults are tuned for a pistol-carrying character; the demo
/// exposes this resource in an inspector so it can be tuned live.
#[derive(Resource, Reflect, Debug, Clone, Default)]
#[reflect(Resource)]
pub struct ControllerSettings {
    pub movement: MovementSettings,
    pub look: LookSettings,
    pub camera: CameraRigSettings,
    pub shooting: ShootingSettings,
    pub recoil: RecoilSettings,
    pub muzzle_flash: MuzzleFlashSettings,
    pub diagonal_policy: DiagonalPolicy,
}

#[derive(Reflect, Debug, Clone)]
pub struct MovementSettings {
    pub move_speed: f32,
    pub run_multiplier: f32,
    /// Vertical impulse applied to the body when a jump triggers
    pub jump_impulse: f32,
    /// Used until the jump clip has loaded and reported its own length
    pub fallback_jump_duration: Duration,
    /// Height of the head anchor above the body origin
    pub head_height: f32,
    /// Fraction of the gap the smoothed player position closes per tick
    pub position_smoothing: f32,
    /// Length of the downward grounding ray, measured from the body origin
    pub ground_probe_length: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            move_speed: 2.0,
            run_multiplier: 2.0,
            jump_impulse: 1.3,
            fallback_jump_duration: Duration::from_millis(800),
            head_height: 1.55,
            position_smoothing: 0.15,
            // Capsule: radius 0.3, height 1.0 -> center to bottom = 0.8
            ground_probe_length: 0.95,
        }
    }
}

#[derive(Reflect, Debug, Clone)]
pub struct LookSettings {
    pub mouse_sensitivity: f32,
    /// Pitch is clamped to +-`pitch_limit` radians
    pub pitch_limit: f32,
}

impl Default for LookSettings {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
            pitch_limit: std::f32::consts::FRAC_PI_2 - 0.1,
        }
    }
}

/// Placement and lens of one camera mode.
#[derive(Reflect, Debug, Clone)]
pub struct CameraModeSettings {
    pub amplitude: f32,
    pub base_distance: f32,
    pub height: f32,
    /// Sideways shift of the camera, negative puts it over the right shoulder
    pub lateral_offset: f32,
    /// Fraction of the gap the smoothed camera closes per tick
    pub smoothing: f32,
    pub fov_degrees: f32,
    pub zoom: f32,
    pub near: f32,
    /// Distance follows `cos(pitch)` instead of `sin(pitch)`
    pub distance_follows_cos: bool,
}

impl CameraModeSettings {
    pub fn orbit() -> Self {
        Self {
            amplitude: 4.0,
            base_distance: 3.0,
            height: 1.5,
            lateral_offset: 0.0,
            smoothing: 0.1,
            fov_degrees: 75.0,
            zoom: 2.0,
            near: 0.1,
            distance_follows_cos: false,
        }
    }

    pub fn aim() -> Self {
        Self {
            amplitude: 0.2,
            base_distance: 0.1,
            height: 1.65,
            lateral_offset: -0.35,
            smoothing: 0.2,
            fov_degrees: 50.0,
            zoom: 1.0,
            near: 0.01,
            distance_follows_cos: true,
        }
    }

    /// Distance between the camera and the orbit pivot for the given pitch.
    pub fn distance(&self, pitch: f32) -> f32 {
        let adjuster = if self.distance_follows_cos {
            pitch.cos()
        } else {
            pitch.sin()
        };
        self.amplitude * adjuster + self.base_distance
    }
}

#[derive(Reflect, Debug, Clone)]
pub struct CameraRigSettings {
    pub orbit: CameraModeSettings,
    pub aim: CameraModeSettings,
    /// Fraction of the remaining fov/zoom/near gap closed per tick
    pub lens_blend: f32,
    /// How far along the aim ray the zoomed camera looks
    pub aim_lookahead: f32,
    /// The ideal camera position is lowered by this much after the offset is applied
    pub anchor_drop: f32,
    /// Orbit mode looks this far above the smoothed player position
    pub orbit_look_height: f32,
    pub collision: CollisionSettings,
}

impl Default for CameraRigSettings {
    fn default() -> Self {
        Self {
            orbit: CameraModeSettings::orbit(),
            aim: CameraModeSettings::aim(),
            lens_blend: 0.15,
            aim_lookahead: 15.0,
            anchor_drop: 1.6,
            orbit_look_height: 0.5,
            collision: CollisionSettings::default(),
        }
    }
}

#[derive(Reflect, Debug, Clone)]
pub struct CollisionSettings {
    /// When false the camera always sits at its ideal position
    pub enabled: bool,
    /// Hits closer than `natural - tolerance` count as obstructions
    pub tolerance: f32,
    /// How far in front of the obstruction the camera stops
    pub backoff: f32,
    pub min_distance: f32,
    /// The clamped position must beat the natural one by this much to be used
    pub adoption_threshold: f32,
    /// Perturbations added to the probe direction to form the detection cone
    pub cone_offsets: Vec<Vec3>,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance: 0.3,
            backoff: 0.2,
            min_distance: 0.2,
            adoption_threshold: 0.1,
            cone_offsets: vec![
                Vec3::new(0.05, 0.05, 0.0),
                Vec3::new(-0.05, 0.05, 0.0),
                Vec3::new(0.05, -0.05, 0.0),
                Vec3::new(-0.05, -0.05, 0.0),
                Vec3::new(0.0, 0.08, 0.0),
                Vec3::new(0.0, -0.08, 0.0),
                Vec3::new(0.08, 0.0, 0.0),
                Vec3::new(-0.08, 0.0, 0.0),
            ],
        }
    }
}

#[derive(Reflect, Debug, Clone)]
pub struct ShootingSettings {
    pub max_range: f32,
    pub impulse_strength: f32,
}

impl Default for ShootingSettings {
    fn default() -> Self {
        Self {
            max_range: 100.0,
            impulse_strength: 0.025,
        }
    }
}

#[derive(Reflect, Debug, Clone)]
pub struct RecoilSettings {
    pub duration: Duration,
    pub strength: f32,
    /// Share of the recoil intensity that becomes hand roll
    pub hand_roll: f32,
}

impl Default for RecoilSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(150),
            strength: 0.1,
            hand_roll: 0.05,
        }
    }
}

#[derive(Reflect, Debug, Clone)]
pub struct MuzzleFlashSettings {
    pub duration: Duration,
    pub light_intensity: f32,
    pub light_range: f32,
    /// Barrel position relative to the right hand, in the aim frame
    pub barrel_offset: Vec3,
    /// Light position relative to the barrel
    pub light_offset: Vec3,
}

impl Default for MuzzleFlashSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(50),
            light_intensity: 15.0,
            light_range: 8.0,
            barrel_offset: Vec3::new(0.0, 0.2, 1.0),
            light_offset: Vec3::new(0.0, 0.1, 0.3),
        }
    }
}

/// What to show when a forward/backward key and a strafe key are held together.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagonalPolicy {
    /// Walk/run pose wins over the strafe pose
    #[default]
    PreferForward,
    /// Strafe pose wins
    PreferStrafe,
}

/// Keys and buttons feeding [`crate::player::input::ControllerInput`].
#[derive(Resource, Reflect, Debug, Clone)]
#[reflect(Resource)]
pub struct KeyBindings {
    pub forward: Vec<KeyCode>,
    pub backward: Vec<KeyCode>,
    pub left: Vec<KeyCode>,
    pub right: Vec<KeyCode>,
    pub run: Vec<KeyCode>,
    pub jump: Vec<KeyCode>,
    pub fire: MouseButton,
    pub zoom: MouseButton,
    pub release_cursor: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: vec![KeyCode::KeyW, KeyCode::ArrowUp],
            backward: vec![KeyCode::KeyS, KeyCode::ArrowDown],
            left: vec![KeyCode::KeyA, KeyCode::ArrowLeft],
            right: vec![KeyCode::KeyD, KeyCode::ArrowRight],
            run: vec![KeyCode::KeyF],
            jump: vec![KeyCode::Space],
            fire: MouseButton::Left,
            zoom: MouseButton::Right,
            release_cursor: KeyCode::Escape,
        }
    }
}
