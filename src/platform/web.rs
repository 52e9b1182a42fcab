//! Browser bindings
//!
//! The page owns rendering, audio and input; it forwards clicks to
//! `primary_action`, calls `update` from requestAnimationFrame, and reads
//! `snapshot()` / `drain_events()` as JSON.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::Game;
use crate::highscores::LocalService;
use crate::sim::{EntityKind, GameEvent, Layout, PowerUpKind, RunState, Zone};
use crate::tuning::Tuning;

/// What the page needs to draw a frame
#[derive(Serialize)]
struct Snapshot<'a> {
    state: RunState,
    x: f32,
    y: f32,
    anchor_x: f32,
    anchor_y: f32,
    spin_angle: f32,
    score: u64,
    altitude: f32,
    zone: Zone,
    rank: &'a str,
    /// Score needed for the next rank (absent at the top)
    next_rank_score: Option<u64>,
    shield: bool,
    slow_mo: bool,
    magnet: bool,
    ice_cap: bool,
    entities: Vec<EntityView>,
    challenge: Option<&'a str>,
    challenge_completed: bool,
    status: Option<&'a str>,
    leaderboard: &'a [String],
    skin: &'a str,
    high_score: u64,
}

#[derive(Serialize)]
struct EntityView {
    id: u32,
    kind: &'static str,
    power_up: Option<PowerUpKind>,
    x: f32,
    y: f32,
    radius: f32,
}

/// JS handle around a `Game` backed by LocalStorage
#[wasm_bindgen]
pub struct WasmGame {
    game: Game<LocalService>,
    last_time: f64,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, username: String) -> WasmGame {
        let seed = js_sys::Date::now() as u64;
        let service = LocalService::load(&username);
        let game = Game::new(seed, Layout::new(width, height), Tuning::load(), service);
        WasmGame {
            game,
            last_time: 0.0,
        }
    }

    /// Click / tap / space
    pub fn primary_action(&mut self) {
        self.game.primary_action();
    }

    /// Advance using the requestAnimationFrame timestamp (ms)
    pub fn update(&mut self, time: f64) {
        let dt = if self.last_time > 0.0 {
            ((time - self.last_time) / 1000.0) as f32
        } else {
            crate::consts::SIM_DT
        };
        self.last_time = time;
        self.game.update(dt);
    }

    /// Persist a new skin choice
    pub fn update_skin(&mut self, skin: String) {
        self.game.update_skin(&skin);
    }

    /// Current frame as JSON
    pub fn snapshot(&self) -> String {
        let session = self.game.session();
        let effects = &session.effects;
        let anchor = session.anchor();
        let entities = session
            .entities
            .iter()
            .map(|e| {
                let (kind, power_up) = match e.kind {
                    EntityKind::Booster => ("booster", None),
                    EntityKind::Obstacle => ("obstacle", None),
                    EntityKind::PowerUp(p) => ("power_up", Some(p.kind())),
                };
                EntityView {
                    id: e.id,
                    kind,
                    power_up,
                    x: e.pos.x,
                    y: e.pos.y,
                    radius: e.radius,
                }
            })
            .collect();

        let snapshot = Snapshot {
            state: session.state,
            x: session.projectile.pos.x,
            y: session.projectile.pos.y,
            anchor_x: anchor.x,
            anchor_y: anchor.y,
            spin_angle: session.spin.angle,
            score: session.score,
            altitude: session.max_altitude,
            zone: session.zone,
            rank: session.rank.title(),
            next_rank_score: session.rank.next().map(|r| r.threshold()),
            shield: effects.shield.is_some(),
            slow_mo: effects.slow_mo.is_some(),
            magnet: effects.magnet.is_some(),
            ice_cap: effects.ice_cap.is_some(),
            entities,
            challenge: session.challenge.challenge_id(),
            challenge_completed: session.challenge.completed,
            status: self.game.status_message.as_deref(),
            leaderboard: &self.game.leaderboard_lines,
            skin: &self.game.preferences.selected_skin,
            high_score: self.game.preferences.high_score,
        };

        serde_json::to_string(&snapshot).unwrap_or_else(|e| {
            log::error!("Snapshot failed: {}", e);
            "{}".to_string()
        })
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events(&mut self) -> String {
        let events: Vec<GameEvent> = self.game.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Event encoding failed: {}", e);
            "[]".to_string()
        })
    }
}
