//! Daily challenges
//!
//! One challenge is active per day (picked by UTC weekday). Progress is tracked
//! per run and completion fires once.

use serde::{Deserialize, Serialize};

/// Challenge definition as served by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub target: u64,
}

/// Window for the `fast_start` challenge
pub const FAST_START_WINDOW_MS: f64 = 5000.0;

/// The metric a challenge is judged on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ChallengeGoal {
    /// Best score of the run
    Score(u64),
    /// Boosters hit in one run
    BoosterHits(u32),
    /// Power-ups collected in one run
    PowerUps(u32),
    /// Highest altitude of the run (px above the anchor)
    Altitude(f32),
    /// Altitude reached within a time window after launch
    AltitudeWithin { altitude: f32, window_ms: f64 },
}

impl DailyChallenge {
    fn new(id: &str, title: &str, description: &str, target: u64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            target,
        }
    }

    /// Metric for a known challenge id; unknown ids have no goal
    pub fn goal(&self) -> Option<ChallengeGoal> {
        let target = self.target;
        match self.id.as_str() {
            "high_score" => Some(ChallengeGoal::Score(target)),
            "upvotes" => Some(ChallengeGoal::BoosterHits(target as u32)),
            "powerups" => Some(ChallengeGoal::PowerUps(target as u32)),
            "stratosphere" | "space" | "beyond" => Some(ChallengeGoal::Altitude(target as f32)),
            "fast_start" => Some(ChallengeGoal::AltitudeWithin {
                altitude: target as f32,
                window_ms: FAST_START_WINDOW_MS,
            }),
            _ => None,
        }
    }
}

/// The fixed rotation of daily challenges
pub fn catalogue() -> Vec<DailyChallenge> {
    vec![
        DailyChallenge::new("high_score", "Sky High", "Reach 5000 altitude", 5000),
        DailyChallenge::new("upvotes", "Karma Collector", "Hit 10 upvotes in one run", 10),
        DailyChallenge::new("powerups", "Power Lush", "Collect 3 power-ups in one run", 3),
        DailyChallenge::new("stratosphere", "Aeronaut", "Reach the Stratosphere zone", 2000),
        DailyChallenge::new("space", "Astronaut", "Reach Space zone", 5000),
        DailyChallenge::new("beyond", "Light Year", "Reach the Beyond zone", 10000),
        DailyChallenge::new("fast_start", "Fast Start", "Reach 1000 altitude in 5 seconds", 1000),
    ]
}

/// Challenge for a weekday (0 = Sunday)
pub fn daily_for_weekday(weekday: u32) -> DailyChallenge {
    let all = catalogue();
    let index = weekday as usize % all.len();
    all[index].clone()
}

/// UTC weekday (0 = Sunday) for a Unix timestamp in milliseconds
pub fn weekday_from_unix_ms(unix_ms: f64) -> u32 {
    let days = (unix_ms / 86_400_000.0).floor() as i64;
    // 1970-01-01 was a Thursday
    (days + 4).rem_euclid(7) as u32
}

/// Run snapshot the tracker judges against
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunMetrics {
    pub score: u64,
    pub max_altitude: f32,
    pub flight_ms: f64,
}

/// Active challenge plus this run's counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub challenge: Option<DailyChallenge>,
    pub goal: Option<ChallengeGoal>,
    pub booster_hits: u32,
    pub power_ups_collected: u32,
    pub completed: bool,
}

impl ChallengeProgress {
    /// Track a challenge; one with an unknown goal counts as no challenge
    pub fn new(challenge: Option<DailyChallenge>) -> Self {
        let Some(challenge) = challenge else {
            return Self::default();
        };
        match challenge.goal() {
            Some(goal) => Self {
                challenge: Some(challenge),
                goal: Some(goal),
                ..Self::default()
            },
            None => {
                log::info!("Unknown daily challenge '{}', tracking disabled", challenge.id);
                Self::default()
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.goal.is_some()
    }

    pub fn challenge_id(&self) -> Option<&str> {
        self.challenge.as_ref().map(|c| c.id.as_str())
    }

    /// Id of the challenge if it was completed this run
    pub fn completed_id(&self) -> Option<String> {
        if self.completed {
            self.challenge_id().map(str::to_string)
        } else {
            None
        }
    }

    pub fn record_booster_hit(&mut self) {
        self.booster_hits += 1;
    }

    pub fn record_power_up(&mut self) {
        self.power_ups_collected += 1;
    }

    /// Clear per-run counters, keep the challenge
    pub fn reset_run(&mut self) {
        self.booster_hits = 0;
        self.power_ups_collected = 0;
        self.completed = false;
    }

    /// Whether the goal is met by these metrics and counters
    pub fn is_met(&self, metrics: &RunMetrics) -> bool {
        match self.goal {
            None => false,
            Some(ChallengeGoal::Score(target)) => metrics.score >= target,
            Some(ChallengeGoal::BoosterHits(target)) => self.booster_hits >= target,
            Some(ChallengeGoal::PowerUps(target)) => self.power_ups_collected >= target,
            Some(ChallengeGoal::Altitude(target)) => metrics.max_altitude >= target,
            Some(ChallengeGoal::AltitudeWithin { altitude, window_ms }) => {
                metrics.max_altitude >= altitude && metrics.flight_ms <= window_ms
            }
        }
    }

    /// Re-check completion; returns true only the first time it is met
    pub fn evaluate(&mut self, metrics: &RunMetrics) -> bool {
        if self.completed || !self.is_active() {
            return false;
        }
        if self.is_met(metrics) {
            self.completed = true;
            log::info!("Daily challenge '{}' completed", self.challenge_id().unwrap_or("?"));
            return true;
        }
        false
    }
}
