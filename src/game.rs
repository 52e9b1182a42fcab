//! Frame driver
//!
//! Turns variable frame deltas into fixed simulation ticks, latches the
//! primary action for exactly one tick, and talks to the service at run
//! boundaries. Service failures end up in `status_message`; they never touch
//! the session.

use crate::consts::*;
use crate::service::{GameService, Leaderboard, ServiceError, UserPreferences};
use crate::sim::{GameEvent, GameSession, Layout, RunState, TickInput, tick};
use crate::tuning::Tuning;

/// Game instance holding the session and its collaborator
pub struct Game<S: GameService> {
    session: GameSession,
    service: S,
    accumulator: f32,
    input: TickInput,
    /// Events observed since the host last drained them
    events: Vec<GameEvent>,
    /// Player-facing text for the last service problem (or result)
    pub status_message: Option<String>,
    /// Rendered global board ("1. name - score")
    pub leaderboard_lines: Vec<String>,
    pub preferences: UserPreferences,
}

impl<S: GameService> Game<S> {
    /// Start a session and pull the daily challenge, preferences and board
    pub fn new(seed: u64, layout: Layout, tuning: Tuning, service: S) -> Self {
        let mut game = Self {
            session: GameSession::new(seed, layout, tuning),
            service,
            accumulator: 0.0,
            input: TickInput::default(),
            events: Vec::new(),
            status_message: None,
            leaderboard_lines: Vec::new(),
            preferences: UserPreferences::default(),
        };

        match game.service.daily_challenge() {
            Ok(challenge) => {
                log::info!("Daily challenge: {} ({})", challenge.title, challenge.id);
                game.session.set_challenge(Some(challenge));
            }
            Err(e) => {
                game.report("Daily challenge unavailable", &e);
                game.session.set_challenge(None);
            }
        }

        match game.service.user_preferences() {
            Ok(prefs) => game.preferences = prefs,
            Err(e) => game.report("Could not load preferences", &e),
        }

        game.refresh_leaderboard();
        log::info!("Game initialized with seed: {}", seed);
        game
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn state(&self) -> RunState {
        self.session.state
    }

    /// Latch the primary action for the next tick
    pub fn primary_action(&mut self) {
        self.input.action = true;
    }

    /// Run as many fixed ticks as the frame delta covers
    pub fn update(&mut self, frame_dt: f32) {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.session, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.action = false;

            self.collect_events();
        }
    }

    /// Switch skins; on failure the current skin stays and the status says why
    pub fn update_skin(&mut self, skin: &str) {
        match self.service.update_skin(skin) {
            Ok(()) => self.preferences.selected_skin = skin.trim().to_string(),
            Err(e) => self.report("Skin not changed", &e),
        }
    }

    /// Hand everything that happened since the last call to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn collect_events(&mut self) {
        for event in self.session.drain_events() {
            match &event {
                GameEvent::GameOver {
                    score,
                    completed_challenge,
                    ..
                } => self.finish_run(*score, completed_challenge.as_deref()),
                GameEvent::Reset => self.status_message = None,
                _ => {}
            }
            self.events.push(event);
        }
    }

    /// Submit the result of a finished run
    fn finish_run(&mut self, score: u64, completed_challenge: Option<&str>) {
        match self.service.submit_score(score) {
            Ok(()) => {
                if score > self.preferences.high_score {
                    self.preferences.high_score = score;
                    self.status_message = Some(format!("New high score: {}!", score));
                }
            }
            Err(e) => self.report("Score not saved", &e),
        }

        if let Some(id) = completed_challenge {
            match self.service.submit_challenge_completion(id) {
                Ok(()) => log::info!("Challenge {} submitted", id),
                Err(e) => self.report("Challenge completion not saved", &e),
            }
        }

        self.refresh_leaderboard();
    }

    fn refresh_leaderboard(&mut self) {
        match self.service.leaderboard() {
            Ok(Leaderboard { global, .. }) => {
                self.leaderboard_lines = Leaderboard::lines(&global);
            }
            Err(e) => self.report("Leaderboard unavailable", &e),
        }
    }

    fn report(&mut self, what: &str, err: &ServiceError) {
        log::warn!("{}: {}", what, err);
        self.status_message = Some(format!("{} ({})", what, err));
    }
}
