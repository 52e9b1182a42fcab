//! Data-driven game balance
//!
//! Every gameplay constant lives here so the host can override values from
//! JSON (LocalStorage on the web) without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::{PowerUp, PowerUpKind, Zone};

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Sling ===
    /// Launch speed magnitude (px/s)
    pub launch_power: f32,
    /// Orbit radius around the anchor (px)
    pub spin_radius: f32,
    /// Angular speed when spinning starts (radians/tick)
    pub spin_start_speed: f32,
    /// Wind-up per tick (radians/tick²)
    pub spin_acceleration: f32,
    /// Wind-up cap (radians/tick)
    pub spin_max_speed: f32,

    // === Projectile ===
    /// Restitution on walls and floor
    pub bounce: f32,
    /// Linear air drag (fraction of velocity lost per second)
    pub drag: f32,
    /// Horizontal speed kept after each floor contact
    pub floor_friction: f32,

    // === Zones (gravity in px/s²) ===
    pub city_gravity: f32,
    pub stratosphere_gravity: f32,
    pub space_gravity: f32,
    pub beyond_gravity: f32,

    // === Boosters / obstacles ===
    /// Upward speed set when a falling projectile hits a booster
    pub booster_velocity: f32,
    /// Extra upward speed added when already rising
    pub booster_boost: f32,
    /// Upward speed cap for additive boosts
    pub max_up_speed: f32,
    /// Horizontal kick away from screen centre
    pub booster_kick: f32,
    /// Downward speed set by an obstacle
    pub obstacle_push: f32,
    pub booster_radius: f32,
    pub obstacle_radius: f32,
    pub power_up_radius: f32,

    // === Power-ups ===
    pub super_launch_speed: f32,
    pub shield_relaunch_speed: f32,
    pub slow_mo_duration_ms: f64,
    pub slow_mo_gravity_scale: f32,
    pub magnet_duration_ms: f64,
    pub magnet_radius: f32,
    pub magnet_pull_speed: f32,
    pub ice_cap_duration_ms: f64,
    pub ice_cap_bounce: f32,
    pub ice_cap_drag: f32,

    // === Field generation ===
    /// Height of the generated entity column above the anchor (px)
    pub field_height: f32,
    /// Vertical spacing between booster rows (px)
    pub booster_spacing: f32,
    /// Vertical spacing between power-up slots (px)
    pub power_up_spacing: f32,
    /// Altitude below which no obstacles spawn (px)
    pub obstacle_start_altitude: f32,
    /// Chance an obstacle accompanies a booster row above the start altitude
    pub obstacle_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            launch_power: 1500.0,
            spin_radius: 100.0,
            spin_start_speed: 0.1,
            spin_acceleration: 0.002,
            spin_max_speed: 0.3,

            bounce: 0.5,
            drag: 0.05,
            floor_friction: 0.8,

            city_gravity: 800.0,
            stratosphere_gravity: 600.0,
            space_gravity: 400.0,
            beyond_gravity: 250.0,

            booster_velocity: 1000.0,
            booster_boost: 500.0,
            max_up_speed: 2200.0,
            booster_kick: 150.0,
            obstacle_push: 600.0,
            booster_radius: 20.0,
            obstacle_radius: 22.0,
            power_up_radius: 18.0,

            super_launch_speed: 2500.0,
            shield_relaunch_speed: 1200.0,
            slow_mo_duration_ms: 5000.0,
            slow_mo_gravity_scale: 0.4,
            magnet_duration_ms: 4000.0,
            magnet_radius: 300.0,
            magnet_pull_speed: 450.0,
            ice_cap_duration_ms: 6000.0,
            ice_cap_bounce: 0.85,
            ice_cap_drag: 0.0,

            field_height: 12_000.0,
            booster_spacing: 260.0,
            power_up_spacing: 1400.0,
            obstacle_start_altitude: 1500.0,
            obstacle_chance: 0.35,
        }
    }
}

impl Tuning {
    /// Gravity for a zone (px/s²)
    pub fn gravity_for(&self, zone: Zone) -> f32 {
        match zone {
            Zone::City => self.city_gravity,
            Zone::Stratosphere => self.stratosphere_gravity,
            Zone::Space => self.space_gravity,
            Zone::Beyond => self.beyond_gravity,
        }
    }

    /// Build the power-up payload for a kind
    pub fn power_up(&self, kind: PowerUpKind) -> PowerUp {
        match kind {
            PowerUpKind::Super => PowerUp::Super {
                launch_speed: self.super_launch_speed,
            },
            PowerUpKind::Shield => PowerUp::Shield {
                relaunch_speed: self.shield_relaunch_speed,
            },
            PowerUpKind::SlowMo => PowerUp::SlowMo {
                duration_ms: self.slow_mo_duration_ms,
                gravity_scale: self.slow_mo_gravity_scale,
            },
            PowerUpKind::Magnet => PowerUp::Magnet {
                duration_ms: self.magnet_duration_ms,
                radius: self.magnet_radius,
                pull_speed: self.magnet_pull_speed,
            },
            PowerUpKind::IceCap => PowerUp::IceCap {
                duration_ms: self.ice_cap_duration_ms,
                bounce: self.ice_cap_bounce,
                drag: self.ice_cap_drag,
            },
        }
    }

    /// Parse tuning overrides from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Pull every knob back into a range the simulation can run with.
    ///
    /// Non-finite values fall back to the default.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let at_least = |v: f32, min: f32, default: f32| {
            if v.is_finite() { v.max(min) } else { default }
        };
        let within = |v: f32, lo: f32, hi: f32, default: f32| {
            if v.is_finite() { v.clamp(lo, hi) } else { default }
        };
        let duration = |v: f64, default: f64| if v.is_finite() { v.max(0.0) } else { default };

        Self {
            launch_power: at_least(self.launch_power, 0.0, d.launch_power),
            spin_radius: at_least(self.spin_radius, 0.0, d.spin_radius),
            spin_start_speed: at_least(self.spin_start_speed, 0.0, d.spin_start_speed),
            spin_acceleration: at_least(self.spin_acceleration, 0.0, d.spin_acceleration),
            spin_max_speed: at_least(self.spin_max_speed, 0.0, d.spin_max_speed),

            bounce: within(self.bounce, 0.0, 1.0, d.bounce),
            drag: at_least(self.drag, 0.0, d.drag),
            floor_friction: within(self.floor_friction, 0.0, 1.0, d.floor_friction),

            city_gravity: at_least(self.city_gravity, 0.0, d.city_gravity),
            stratosphere_gravity: at_least(self.stratosphere_gravity, 0.0, d.stratosphere_gravity),
            space_gravity: at_least(self.space_gravity, 0.0, d.space_gravity),
            beyond_gravity: at_least(self.beyond_gravity, 0.0, d.beyond_gravity),

            booster_velocity: at_least(self.booster_velocity, 0.0, d.booster_velocity),
            booster_boost: at_least(self.booster_boost, 0.0, d.booster_boost),
            max_up_speed: at_least(self.max_up_speed, 0.0, d.max_up_speed),
            booster_kick: at_least(self.booster_kick, 0.0, d.booster_kick),
            obstacle_push: at_least(self.obstacle_push, 0.0, d.obstacle_push),
            booster_radius: at_least(self.booster_radius, 0.0, d.booster_radius),
            obstacle_radius: at_least(self.obstacle_radius, 0.0, d.obstacle_radius),
            power_up_radius: at_least(self.power_up_radius, 0.0, d.power_up_radius),

            super_launch_speed: at_least(self.super_launch_speed, 0.0, d.super_launch_speed),
            shield_relaunch_speed: at_least(
                self.shield_relaunch_speed,
                0.0,
                d.shield_relaunch_speed,
            ),
            slow_mo_duration_ms: duration(self.slow_mo_duration_ms, d.slow_mo_duration_ms),
            slow_mo_gravity_scale: within(
                self.slow_mo_gravity_scale,
                0.05,
                1.0,
                d.slow_mo_gravity_scale,
            ),
            magnet_duration_ms: duration(self.magnet_duration_ms, d.magnet_duration_ms),
            magnet_radius: at_least(self.magnet_radius, 0.0, d.magnet_radius),
            magnet_pull_speed: at_least(self.magnet_pull_speed, 0.0, d.magnet_pull_speed),
            ice_cap_duration_ms: duration(self.ice_cap_duration_ms, d.ice_cap_duration_ms),
            ice_cap_bounce: within(self.ice_cap_bounce, 0.0, 1.0, d.ice_cap_bounce),
            ice_cap_drag: at_least(self.ice_cap_drag, 0.0, d.ice_cap_drag),

            field_height: at_least(self.field_height, 0.0, d.field_height),
            booster_spacing: at_least(self.booster_spacing, 1.0, d.booster_spacing),
            power_up_spacing: at_least(self.power_up_spacing, 1.0, d.power_up_spacing),
            obstacle_start_altitude: at_least(
                self.obstacle_start_altitude,
                0.0,
                d.obstacle_start_altitude,
            ),
            obstacle_chance: if self.obstacle_chance.is_finite() {
                self.obstacle_chance.clamp(0.0, 1.0)
            } else {
                d.obstacle_chance
            },
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "troll_yeeter_tuning";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning overrides from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring malformed tuning overrides: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
