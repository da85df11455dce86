//! Axis-aligned boxes over a flat ground plane, enough to drive the controller.

#![allow(dead_code)]

use std::collections::HashMap;

use bevy::prelude::*;
use tps_controls::physics::{BodyHandle, ColliderHandle, PhysicsWorld, RayHit};

pub const GROUND: BodyHandle = BodyHandle(0);
const GROUND_COLLIDER: ColliderHandle = ColliderHandle(0);
const COLLIDER_BASE: u64 = 1000;

#[derive(Debug, Clone)]
pub struct TestBody {
    pub translation: Vec3,
    pub velocity: Vec3,
    pub half_extents: Vec3,
    pub mass: f32,
    pub dynamic: bool,
}

pub struct TestWorld {
    next_id: u64,
    bodies: HashMap<u64, TestBody>,
    /// Height of the ground plane, `None` for a bottomless world
    pub ground: Option<f32>,
    pub gravity: f32,
    pub impulses: Vec<(BodyHandle, Vec3)>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            next_id: 1,
            bodies: HashMap::new(),
            ground: Some(0.0),
            gravity: 9.81,
            impulses: Vec::new(),
        }
    }
}

impl TestWorld {
    pub fn add_body(&mut self, translation: Vec3, half_extents: Vec3, dynamic: bool) -> BodyHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.bodies.insert(
            id,
            TestBody {
                translation,
                velocity: Vec3::ZERO,
                half_extents,
                mass: 1.0,
                dynamic,
            },
        );
        BodyHandle(id)
    }

    /// Capsule-sized box standing on the ground.
    pub fn add_player(&mut self) -> BodyHandle {
        self.add_body(Vec3::new(0.0, 0.8, 0.0), Vec3::new(0.3, 0.8, 0.3), true)
    }

    pub fn body(&self, body: BodyHandle) -> &TestBody {
        &self.bodies[&body.0]
    }

    pub fn remove(&mut self, body: BodyHandle) {
        self.bodies.remove(&body.0);
    }

    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut().filter(|body| body.dynamic) {
            body.velocity.y -= self.gravity * dt;
            body.translation += body.velocity * dt;
            if let Some(ground) = self.ground {
                let bottom = body.translation.y - body.half_extents.y;
                if bottom < ground {
                    body.translation.y += ground - bottom;
                    body.velocity.y = body.velocity.y.max(0.0);
                }
            }
        }
    }
}

fn ray_box(origin: Vec3, direction: Vec3, center: Vec3, half: Vec3, solid: bool) -> Option<f32> {
    let min = center - half;
    let max = center + half;
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let (o, d, lo, hi) = (origin[axis], direction[axis], min[axis], max[axis]);
        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (a, b) = ((lo - o) / d, (hi - o) / d);
        t_enter = t_enter.max(a.min(b));
        t_exit = t_exit.min(a.max(b));
    }

    if t_enter > t_exit || t_exit < 0.0 {
        return None;
    }
    if t_enter < 0.0 {
        // Origin inside the box.
        return if solid { Some(0.0) } else { Some(t_exit) };
    }
    Some(t_enter)
}

impl TestWorld {
    fn hits(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        solid: bool,
    ) -> impl Iterator<Item = (BodyHandle, RayHit)> + '_ {
        let ground = self.ground.and_then(|height| {
            if origin.y < height {
                return solid.then_some(0.0);
            }
            (direction.y < 0.0).then(|| (origin.y - height) / -direction.y)
        });
        let ground = ground.map(|toi| {
            (
                GROUND,
                RayHit {
                    time_of_impact: toi,
                    collider: GROUND_COLLIDER,
                },
            )
        });

        let boxes = self.bodies.iter().filter_map(move |(id, body)| {
            ray_box(origin, *direction, body.translation, body.half_extents, solid).map(|toi| {
                (
                    BodyHandle(*id),
                    RayHit {
                        time_of_impact: toi,
                        collider: ColliderHandle(COLLIDER_BASE + id),
                    },
                )
            })
        });

        ground
            .into_iter()
            .chain(boxes)
            .filter(move |(_, hit)| hit.time_of_impact <= max_distance)
    }
}

fn nearest(hits: impl Iterator<Item = (BodyHandle, RayHit)>) -> Option<RayHit> {
    hits.map(|(_, hit)| hit)
        .min_by(|a, b| a.time_of_impact.total_cmp(&b.time_of_impact))
}

impl PhysicsWorld for TestWorld {
    fn cast_ray(
        &mut self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        solid: bool,
    ) -> Option<RayHit> {
        nearest(self.hits(origin, direction, max_distance, solid))
    }

    fn cast_ray_excluding(
        &mut self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        solid: bool,
        excluded: BodyHandle,
    ) -> Option<RayHit> {
        nearest(
            self.hits(origin, direction, max_distance, solid)
                .filter(|(body, _)| *body != excluded),
        )
    }

    fn parent(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        if collider == GROUND_COLLIDER {
            return Some(GROUND);
        }
        let id = collider.0.checked_sub(COLLIDER_BASE)?;
        self.bodies.contains_key(&id).then_some(BodyHandle(id))
    }

    fn is_valid(&self, body: BodyHandle) -> bool {
        body == GROUND || self.bodies.contains_key(&body.0)
    }

    fn translation(&mut self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body.0).map(|body| body.translation)
    }

    fn set_translation(&mut self, body: BodyHandle, translation: Vec3, _wake_up: bool) {
        if let Some(body) = self.bodies.get_mut(&body.0) {
            body.translation = translation;
        }
    }

    fn linvel(&mut self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body.0).map(|body| body.velocity)
    }

    fn set_linvel(&mut self, body: BodyHandle, linvel: Vec3, _wake_up: bool) {
        if let Some(body) = self.bodies.get_mut(&body.0) {
            body.velocity = linvel;
        }
    }

    fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec3, _wake_up: bool) {
        if let Some(body) = self.bodies.get_mut(&handle.0) {
            body.velocity += impulse / body.mass;
            self.impulses.push((handle, impulse));
        }
    }

    fn apply_impulse_at_point(
        &mut self,
        body: BodyHandle,
        impulse: Vec3,
        _point: Vec3,
        wake_up: bool,
    ) {
        self.apply_impulse(body, impulse, wake_up);
    }
}
