//! Game state and core simulation types
//!
//! Everything a run needs lives in `GameSession`; the tick function is the only
//! thing that mutates it.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::ActiveEffects;
use super::scoring::{Rank, Zone};
use super::spawn::generate_field;
use crate::challenge::{ChallengeProgress, DailyChallenge};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{normalize_angle, polar_to_cartesian};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Projectile pinned to the anchor, waiting for the first action
    Idle,
    /// Projectile orbiting the anchor, waiting for release
    Spinning,
    /// Projectile in free flight
    Flying,
    /// Run ended, waiting for replay
    GameOver,
}

/// World dimensions (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
        }
    }
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fixed pivot the projectile orbits before launch
    pub fn anchor(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - ANCHOR_FLOOR_OFFSET)
    }

    pub fn floor_y(&self) -> f32 {
        self.height
    }

    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }
}

/// The troll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Gravity applies only while flying
    pub gravity_enabled: bool,
    /// Physics body present and active; physics is skipped when false
    pub body_enabled: bool,
    /// Restitution on walls and floor
    pub bounce: f32,
    /// Linear air drag (per second)
    pub drag: f32,
}

impl Projectile {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: PROJECTILE_RADIUS,
            gravity_enabled: false,
            body_enabled: false,
            bounce: tuning.bounce,
            drag: tuning.drag,
        }
    }

    /// Snap back to the anchor with physics off and base surface values
    pub fn pin(&mut self, anchor: Vec2, tuning: &Tuning) {
        self.pos = anchor;
        self.vel = Vec2::ZERO;
        self.gravity_enabled = false;
        self.body_enabled = false;
        self.bounce = tuning.bounce;
        self.drag = tuning.drag;
    }

    pub fn is_falling(&self) -> bool {
        self.vel.y > 0.0
    }
}

/// Sling wind-up state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinState {
    /// Orbital angle (radians); -π/2 is the top of the orbit
    pub angle: f32,
    /// Angular speed (radians/tick)
    pub speed: f32,
    /// Orbit radius (px)
    pub radius: f32,
}

/// Angle the sling starts from
pub const SPIN_START_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;

impl SpinState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            angle: SPIN_START_ANGLE,
            speed: tuning.spin_start_speed,
            radius: tuning.spin_radius,
        }
    }

    /// Advance one tick, winding up toward the speed cap
    pub fn advance(&mut self, tuning: &Tuning) {
        self.angle = normalize_angle(self.angle + self.speed);
        self.speed = (self.speed + tuning.spin_acceleration).min(tuning.spin_max_speed);
    }

    /// Orbit position around the anchor
    pub fn position(&self, anchor: Vec2) -> Vec2 {
        anchor + polar_to_cartesian(self.radius, self.angle)
    }
}

/// Power-up tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Super,
    Shield,
    SlowMo,
    Magnet,
    IceCap,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Super,
        PowerUpKind::Shield,
        PowerUpKind::SlowMo,
        PowerUpKind::Magnet,
        PowerUpKind::IceCap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PowerUpKind::Super => "Super Yeet",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::SlowMo => "Slow-Mo",
            PowerUpKind::Magnet => "Upvote Magnet",
            PowerUpKind::IceCap => "Ice Cap",
        }
    }
}

/// Power-up with its effect payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PowerUp {
    /// Instant massive upward speed
    Super { launch_speed: f32 },
    /// Absorbs the next resting floor contact and relaunches
    Shield { relaunch_speed: f32 },
    /// Scales gravity down for a while
    SlowMo { duration_ms: f64, gravity_scale: f32 },
    /// Pulls nearby boosters toward the projectile for a while
    Magnet {
        duration_ms: f64,
        radius: f32,
        pull_speed: f32,
    },
    /// Bouncier, frictionless projectile for a while
    IceCap {
        duration_ms: f64,
        bounce: f32,
        drag: f32,
    },
}

impl PowerUp {
    pub fn kind(&self) -> PowerUpKind {
        match self {
            PowerUp::Super { .. } => PowerUpKind::Super,
            PowerUp::Shield { .. } => PowerUpKind::Shield,
            PowerUp::SlowMo { .. } => PowerUpKind::SlowMo,
            PowerUp::Magnet { .. } => PowerUpKind::Magnet,
            PowerUp::IceCap { .. } => PowerUpKind::IceCap,
        }
    }
}

/// What an entity does on contact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Booster,
    Obstacle,
    PowerUp(PowerUp),
}

/// A one-shot collectible in the flight column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Set on first contact; consumed entities never fire again
    pub consumed: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            radius,
            consumed: false,
        }
    }

    pub fn is_booster(&self) -> bool {
        matches!(self.kind, EntityKind::Booster)
    }
}

/// Effects that can run out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEffect {
    SlowMo,
    Magnet,
    IceCap,
}

/// Notifications for the host (text, sounds, particles, submissions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SpinStarted,
    Launched { velocity: Vec2 },
    BoosterHit { id: u32 },
    ObstacleHit { id: u32 },
    PowerUpCollected { id: u32, kind: PowerUpKind },
    EffectExpired(TimedEffect),
    ShieldAbsorbed,
    ZoneChanged { zone: Zone },
    RankReached { rank: Rank },
    ChallengeCompleted { challenge_id: String },
    GameOver {
        score: u64,
        rank: Rank,
        completed_challenge: Option<String>,
    },
    Reset,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// One independent stream per run, so replays get a fresh field
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Session seed for reproducibility
    pub seed: u64,
    /// RNG state (stream advances per run)
    pub rng_state: RngState,
    /// Runs started in this session (1-based after the first reset)
    pub run_index: u64,
    /// Simulation tick counter (the session clock)
    pub time_ticks: u64,
    pub state: RunState,
    pub layout: Layout,
    pub tuning: Tuning,
    pub projectile: Projectile,
    pub spin: SpinState,
    /// Best score this run
    pub score: u64,
    /// Highest altitude reached this run (px above the anchor)
    pub max_altitude: f32,
    pub zone: Zone,
    /// Zone gravity before effect scaling (px/s²)
    pub gravity: f32,
    /// Highest rank already celebrated this run
    pub rank: Rank,
    /// Collectibles (sorted by id)
    pub entities: Vec<Entity>,
    pub effects: ActiveEffects,
    pub challenge: ChallengeProgress,
    /// Session time of the launch (ms)
    pub launched_at_ms: Option<f64>,
    /// Pending notifications for the host
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameSession {
    /// Create a session with the given seed, resting in `Idle`
    pub fn new(seed: u64, layout: Layout, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let anchor = layout.anchor();
        let mut session = Self {
            seed,
            rng_state: RngState::new(seed),
            run_index: 0,
            time_ticks: 0,
            state: RunState::Idle,
            layout,
            projectile: Projectile::new(anchor, &tuning),
            spin: SpinState::new(&tuning),
            score: 0,
            max_altitude: 0.0,
            zone: Zone::City,
            gravity: tuning.gravity_for(Zone::City),
            rank: Rank::lowest(),
            entities: Vec::new(),
            effects: ActiveEffects::default(),
            challenge: ChallengeProgress::default(),
            launched_at_ms: None,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        session.reset_run();
        session.events.clear();

        session
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn anchor(&self) -> Vec2 {
        self.layout.anchor()
    }

    /// Session clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.time_ticks as f64 * SIM_DT as f64 * 1000.0
    }

    /// Milliseconds since launch (0 before launch)
    pub fn flight_ms(&self) -> f64 {
        self.launched_at_ms
            .map(|t| (self.now_ms() - t).max(0.0))
            .unwrap_or(0.0)
    }

    /// Current altitude above the anchor (px, may be negative)
    pub fn altitude(&self) -> f32 {
        self.anchor().y - self.projectile.pos.y
    }

    /// Install (or clear) the daily challenge
    pub fn set_challenge(&mut self, challenge: Option<DailyChallenge>) {
        self.challenge = ChallengeProgress::new(challenge);
    }

    /// Enter `Idle`, wiping every per-run value and regenerating the field
    pub fn reset_run(&mut self) {
        self.run_index += 1;
        self.rng_state.stream = self.run_index;

        self.state = RunState::Idle;
        let anchor = self.anchor();
        self.projectile.pin(anchor, &self.tuning);
        self.spin = SpinState::new(&self.tuning);
        self.score = 0;
        self.max_altitude = 0.0;
        self.zone = Zone::City;
        self.gravity = self.tuning.gravity_for(Zone::City);
        self.rank = Rank::lowest();
        self.effects = ActiveEffects::default();
        self.challenge.reset_run();
        self.launched_at_ms = None;

        self.entities.clear();
        let mut rng = self.rng_state.to_rng();
        let field = generate_field(&mut rng, &self.layout, &self.tuning);
        for (kind, pos, radius) in field {
            let id = self.next_entity_id();
            self.entities.push(Entity::new(id, kind, pos, radius));
        }

        log::info!(
            "Run {} ready: {} entities in the column",
            self.run_index,
            self.entities.len()
        );
        self.events.push(GameEvent::Reset);
    }

    /// Hand pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.entities.sort_by_key(|e| e.id);
    }
}
