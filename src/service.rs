//! Backend collaborator contract
//!
//! Leaderboards, the daily challenge and user preferences live behind this
//! trait. The game only calls it at run boundaries and never lets a failure
//! touch gameplay state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::challenge::DailyChallenge;

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub member: String,
    pub score: u64,
}

/// Top scores, globally and for the current community
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub global: Vec<LeaderboardEntry>,
    pub subreddit: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Display lines for one board ("1. name - 1234")
    pub fn lines(entries: &[LeaderboardEntry]) -> Vec<String> {
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {} - {}", i + 1, e.member, e.score))
            .collect()
    }
}

/// Per-user settings and stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub selected_skin: String,
    pub high_score: u64,
    pub avatar_url: String,
}

/// Default troll skin
pub const DEFAULT_SKIN: &str = "🧌";

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            selected_skin: DEFAULT_SKIN.to_string(),
            high_score: 0,
            avatar_url: String::new(),
        }
    }
}

/// Why a service call failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Backend could not be reached
    Unavailable { reason: String },
    /// Backend refused the request
    Rejected { reason: String },
    /// Response could not be decoded
    Malformed { reason: String },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable { reason } => write!(f, "service unavailable: {reason}"),
            Self::Rejected { reason } => write!(f, "request rejected: {reason}"),
            Self::Malformed { reason } => write!(f, "malformed response: {reason}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed {
            reason: e.to_string(),
        }
    }
}

/// Persistence/RPC collaborator
pub trait GameService {
    fn submit_score(&mut self, score: u64) -> Result<(), ServiceError>;
    fn leaderboard(&self) -> Result<Leaderboard, ServiceError>;
    fn daily_challenge(&self) -> Result<DailyChallenge, ServiceError>;
    fn user_preferences(&self) -> Result<UserPreferences, ServiceError>;
    fn submit_challenge_completion(&mut self, challenge_id: &str) -> Result<(), ServiceError>;
    /// Change the player's selected skin
    fn update_skin(&mut self, skin: &str) -> Result<(), ServiceError>;
}
