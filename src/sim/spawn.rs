//! Entity field generation
//!
//! Lays out boosters, obstacles and power-ups in the column above the anchor.
//! Same RNG stream, same field.

use glam::Vec2;
use rand::Rng;

use super::state::{EntityKind, Layout, PowerUpKind};
use crate::tuning::Tuning;

/// Keep entities this far from the walls
const SIDE_MARGIN: f32 = 40.0;
/// First booster row above the anchor (clear of the sling)
const FIRST_ROW_ALTITUDE: f32 = 300.0;
/// First power-up slot above the anchor
const FIRST_POWER_UP_ALTITUDE: f32 = 900.0;
/// Vertical jitter applied to every row
const ROW_JITTER: f32 = 40.0;

/// Generate one run's field as `(kind, position, radius)` triples, bottom to top
pub fn generate_field<R: Rng>(
    rng: &mut R,
    layout: &Layout,
    tuning: &Tuning,
) -> Vec<(EntityKind, Vec2, f32)> {
    let mut field = Vec::new();
    let anchor_y = layout.anchor().y;
    let min_x = SIDE_MARGIN.min(layout.width / 2.0);
    let max_x = (layout.width - SIDE_MARGIN).max(min_x + 1.0);
    let spacing = tuning.booster_spacing.max(1.0);

    let mut altitude = FIRST_ROW_ALTITUDE;
    while altitude <= tuning.field_height {
        let y = anchor_y - altitude - rng.random_range(-ROW_JITTER..ROW_JITTER);
        let booster_x = rng.random_range(min_x..max_x);
        let booster_pos = Vec2::new(booster_x, y);
        field.push((EntityKind::Booster, booster_pos, tuning.booster_radius));

        if altitude >= tuning.obstacle_start_altitude && rng.random_bool(tuning.obstacle_chance) {
            // Opposite half of the screen so a row is never a dead end
            let (lo, hi) = if booster_x < layout.center_x() {
                (layout.center_x().max(min_x), max_x)
            } else {
                (min_x, layout.center_x().min(max_x))
            };
            // Too narrow for a second column
            if lo < hi {
                let obstacle_pos = Vec2::new(rng.random_range(lo..hi), y - spacing / 2.0);
                field.push((EntityKind::Obstacle, obstacle_pos, tuning.obstacle_radius));
            }
        }

        altitude += spacing;
    }

    let mut altitude = FIRST_POWER_UP_ALTITUDE;
    while altitude <= tuning.field_height {
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let pos = Vec2::new(rng.random_range(min_x..max_x), anchor_y - altitude);
        let power_up = EntityKind::PowerUp(tuning.power_up(kind));
        field.push((power_up, pos, tuning.power_up_radius));
        altitude += tuning.power_up_spacing.max(1.0);
    }

    log::debug!("Generated field of {} entities", field.len());
    field
}
