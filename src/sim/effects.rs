//! Active power-up effects
//!
//! Pure data: each timed window stores its end time on the session clock and
//! is dropped by `expire` once that time has passed.

use serde::{Deserialize, Serialize};

use super::state::{PowerUp, TimedEffect};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowMoWindow {
    pub until_ms: f64,
    pub gravity_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnetWindow {
    pub until_ms: f64,
    pub radius: f32,
    pub pull_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IceCapWindow {
    pub until_ms: f64,
    pub bounce: f32,
    pub drag: f32,
}

/// Currently active modifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    /// Armed shield: relaunch speed used when it absorbs a landing
    pub shield: Option<f32>,
    pub slow_mo: Option<SlowMoWindow>,
    pub magnet: Option<MagnetWindow>,
    pub ice_cap: Option<IceCapWindow>,
}

impl ActiveEffects {
    /// Start (or restart) the effect of a collected power-up.
    ///
    /// `Super` is instant and leaves no window behind.
    pub fn activate(&mut self, power_up: PowerUp, now_ms: f64) {
        match power_up {
            PowerUp::Super { .. } => {}
            PowerUp::Shield { relaunch_speed } => self.shield = Some(relaunch_speed),
            PowerUp::SlowMo {
                duration_ms,
                gravity_scale,
            } => {
                self.slow_mo = Some(SlowMoWindow {
                    until_ms: now_ms + duration_ms,
                    gravity_scale,
                })
            }
            PowerUp::Magnet {
                duration_ms,
                radius,
                pull_speed,
            } => {
                self.magnet = Some(MagnetWindow {
                    until_ms: now_ms + duration_ms,
                    radius,
                    pull_speed,
                })
            }
            PowerUp::IceCap {
                duration_ms,
                bounce,
                drag,
            } => {
                self.ice_cap = Some(IceCapWindow {
                    until_ms: now_ms + duration_ms,
                    bounce,
                    drag,
                })
            }
        }
    }

    /// Drop every window whose end time has passed; returns what expired
    pub fn expire(&mut self, now_ms: f64) -> Vec<TimedEffect> {
        let mut expired = Vec::new();
        if self.slow_mo.is_some_and(|w| now_ms >= w.until_ms) {
            self.slow_mo = None;
            expired.push(TimedEffect::SlowMo);
        }
        if self.magnet.is_some_and(|w| now_ms >= w.until_ms) {
            self.magnet = None;
            expired.push(TimedEffect::Magnet);
        }
        if self.ice_cap.is_some_and(|w| now_ms >= w.until_ms) {
            self.ice_cap = None;
            expired.push(TimedEffect::IceCap);
        }
        expired
    }

    /// Take the shield charge, if armed
    pub fn consume_shield(&mut self) -> Option<f32> {
        self.shield.take()
    }

    /// Multiplier applied to zone gravity
    pub fn gravity_scale(&self) -> f32 {
        self.slow_mo.map(|w| w.gravity_scale).unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_mo_expires_at_end_time() {
        let mut fx = ActiveEffects::default();
        fx.activate(
            PowerUp::SlowMo {
                duration_ms: 1000.0,
                gravity_scale: 0.5,
            },
            200.0,
        );
        assert_eq!(fx.gravity_scale(), 0.5);
        assert!(fx.expire(1199.0).is_empty());
        assert_eq!(fx.expire(1200.0), vec![TimedEffect::SlowMo]);
        assert_eq!(fx.gravity_scale(), 1.0);
        assert!(fx.expire(5000.0).is_empty());
    }

    #[test]
    fn test_recollecting_restarts_window() {
        let mut fx = ActiveEffects::default();
        let magnet = PowerUp::Magnet {
            duration_ms: 1000.0,
            radius: 100.0,
            pull_speed: 10.0,
        };
        fx.activate(magnet, 0.0);
        fx.activate(magnet, 800.0);
        assert!(fx.expire(1500.0).is_empty());
        assert_eq!(fx.expire(1800.0), vec![TimedEffect::Magnet]);
    }

    #[test]
    fn test_windows_expire_independently() {
        let mut fx = ActiveEffects::default();
        fx.activate(
            PowerUp::IceCap {
                duration_ms: 500.0,
                bounce: 0.9,
                drag: 0.0,
            },
            0.0,
        );
        fx.activate(
            PowerUp::SlowMo {
                duration_ms: 2000.0,
                gravity_scale: 0.4,
            },
            0.0,
        );
        assert_eq!(fx.expire(600.0), vec![TimedEffect::IceCap]);
        assert!(fx.slow_mo.is_some());
    }

    #[test]
    fn test_shield_is_single_charge() {
        let mut fx = ActiveEffects::default();
        fx.activate(PowerUp::Shield { relaunch_speed: 900.0 }, 0.0);
        assert_eq!(fx.consume_shield(), Some(900.0));
        assert_eq!(fx.consume_shield(), None);
    }

    #[test]
    fn test_super_leaves_no_window() {
        let mut fx = ActiveEffects::default();
        fx.activate(PowerUp::Super { launch_speed: 2500.0 }, 0.0);
        assert_eq!(fx, ActiveEffects::default());
    }
}
