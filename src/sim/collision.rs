//! Collision detection and response
//!
//! Two kinds of contact: the projectile against the world bounds (walls and
//! floor, top open) and the projectile against one-shot entities.

use glam::Vec2;

use super::effects::{ActiveEffects, MagnetWindow};
use super::state::{Entity, EntityKind, Layout, PowerUp, Projectile};
use crate::consts::REST_SPEED;
use crate::tuning::Tuning;

/// Which bounds the projectile touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundsContact {
    pub wall: bool,
    pub floor: bool,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Circle-circle overlap
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance_squared(b) < (a_radius + b_radius) * (a_radius + b_radius)
}

/// Keep the projectile inside the walls and above the floor, bouncing off them
pub fn resolve_bounds(
    projectile: &mut Projectile,
    layout: &Layout,
    floor_friction: f32,
) -> BoundsContact {
    let mut contact = BoundsContact::default();
    let r = projectile.radius;

    let walls = [
        (projectile.pos.x < r, r, Vec2::X),
        (projectile.pos.x > layout.width - r, layout.width - r, Vec2::NEG_X),
    ];
    for (hit, clamp_x, normal) in walls {
        if hit {
            projectile.pos.x = clamp_x;
            // Only reflect when moving into the wall
            if projectile.vel.dot(normal) < 0.0 {
                let reflected = reflect_velocity(projectile.vel, normal);
                projectile.vel.x = reflected.x * projectile.bounce;
            }
            contact.wall = true;
        }
    }

    let floor = layout.floor_y() - r;
    if projectile.pos.y >= floor {
        projectile.pos.y = floor;
        if projectile.vel.y > 0.0 {
            let reflected = reflect_velocity(projectile.vel, Vec2::NEG_Y);
            projectile.vel.y = reflected.y * projectile.bounce;
        }
        projectile.vel.x *= floor_friction;
        contact.floor = true;
    }

    contact
}

/// Touching the floor with both velocity components below the rest speed
pub fn is_resting_on_floor(projectile: &Projectile, contact: BoundsContact) -> bool {
    contact.floor && projectile.vel.x.abs() < REST_SPEED && projectile.vel.y.abs() < REST_SPEED
}

/// What a contact did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactOutcome {
    Booster,
    Obstacle,
    PowerUp(PowerUp),
}

/// Resolve a contact between the projectile and one entity.
///
/// Fires at most once per entity: a consumed entity is ignored even while it
/// still overlaps the projectile.
pub fn resolve_contact(
    projectile: &mut Projectile,
    entity: &mut Entity,
    effects: &mut ActiveEffects,
    tuning: &Tuning,
    center_x: f32,
    now_ms: f64,
) -> Option<ContactOutcome> {
    if entity.consumed || !projectile.body_enabled {
        return None;
    }
    if !circles_overlap(projectile.pos, projectile.radius, entity.pos, entity.radius) {
        return None;
    }

    entity.consumed = true;
    let outcome = match entity.kind {
        EntityKind::Booster => {
            apply_booster(projectile, tuning, center_x);
            ContactOutcome::Booster
        }
        EntityKind::Obstacle => {
            apply_obstacle(projectile, tuning);
            ContactOutcome::Obstacle
        }
        EntityKind::PowerUp(power_up) => {
            apply_power_up(projectile, effects, power_up, now_ms);
            ContactOutcome::PowerUp(power_up)
        }
    };

    log::debug!("Contact with entity {}: {:?}", entity.id, outcome);
    Some(outcome)
}

/// Upward boost plus a sideways kick away from screen centre
pub fn apply_booster(projectile: &mut Projectile, tuning: &Tuning, center_x: f32) {
    if projectile.is_falling() {
        projectile.vel.y = -tuning.booster_velocity;
    } else {
        projectile.vel.y = (projectile.vel.y - tuning.booster_boost).max(-tuning.max_up_speed);
    }

    let away = if projectile.pos.x < center_x { -1.0 } else { 1.0 };
    projectile.vel.x += away * tuning.booster_kick;
}

/// Slam the projectile downward
pub fn apply_obstacle(projectile: &mut Projectile, tuning: &Tuning) {
    projectile.vel.y = tuning.obstacle_push;
}

/// Instant part of a power-up plus its timed window
pub fn apply_power_up(
    projectile: &mut Projectile,
    effects: &mut ActiveEffects,
    power_up: PowerUp,
    now_ms: f64,
) {
    match power_up {
        PowerUp::Super { launch_speed } => projectile.vel.y = -launch_speed,
        PowerUp::IceCap { bounce, drag, .. } => {
            projectile.bounce = bounce;
            projectile.drag = drag;
        }
        PowerUp::Shield { .. } | PowerUp::SlowMo { .. } | PowerUp::Magnet { .. } => {}
    }
    effects.activate(power_up, now_ms);
}

/// Drag boosters inside the magnet radius toward the projectile
pub fn magnet_pull(entities: &mut [Entity], target: Vec2, magnet: &MagnetWindow, dt: f32) {
    let step = magnet.pull_speed * dt;
    for entity in entities.iter_mut().filter(|e| e.is_booster() && !e.consumed) {
        let offset = target - entity.pos;
        let dist = offset.length();
        if dist > magnet.radius || dist <= f32::EPSILON {
            continue;
        }
        entity.pos += offset / dist * step.min(dist);
    }
}
