//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod launch;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{BoundsContact, ContactOutcome, resolve_bounds, resolve_contact};
pub use effects::ActiveEffects;
pub use launch::launch_velocity;
pub use scoring::{Rank, Zone};
pub use spawn::generate_field;
pub use state::{
    Entity, EntityKind, GameEvent, GameSession, Layout, PowerUp, PowerUpKind, Projectile,
    RunState, SpinState, TimedEffect,
};
pub use tick::{TickInput, tick};
