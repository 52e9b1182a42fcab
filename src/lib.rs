//! Troll Yeeter - spin the sling, yeet the troll, climb the zones
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machine, physics, scoring, effects)
//! - `challenge`: Daily challenge catalogue and per-run progress
//! - `service`: Leaderboard/challenge/preferences collaborator contract
//! - `highscores`: Local implementation of the service
//! - `game`: Fixed-timestep driver that ties the sim to the service
//! - `platform`: Browser/native platform glue
//! - `tuning`: Data-driven game balance

pub mod challenge;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod service;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::LocalService;
pub use service::{GameService, ServiceError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, spin speeds are expressed per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default world dimensions
    pub const WORLD_WIDTH: f32 = 480.0;
    pub const WORLD_HEIGHT: f32 = 800.0;
    /// Anchor sits this far above the floor
    pub const ANCHOR_FLOOR_OFFSET: f32 = 100.0;

    /// Projectile radius
    pub const PROJECTILE_RADIUS: f32 = 15.0;
    /// Both velocity components must be below this to count as resting
    pub const REST_SPEED: f32 = 20.0;

    /// Pixels of altitude per score point
    pub const PIXELS_PER_POINT: f32 = 10.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-6);
        assert!(normalize_angle(2.0 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_polar_to_cartesian_top() {
        let p = polar_to_cartesian(100.0, -PI / 2.0);
        assert!(p.x.abs() < 1e-3);
        assert!((p.y + 100.0).abs() < 1e-3);
    }
}
