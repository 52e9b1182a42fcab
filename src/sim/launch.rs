//! Sling release vector

use glam::Vec2;

use crate::polar_to_cartesian;

/// Velocity given to the projectile when released at spin angle `theta`.
///
/// The orbit tangent points along `theta + 90°`; turning it back by 90° throws
/// the projectile outward along the sling, so a release at the top of the
/// orbit (`theta = -90°`) goes straight up (negative y on screen).
pub fn launch_velocity(theta: f32, power: f32) -> Vec2 {
    polar_to_cartesian(power, theta)
}
