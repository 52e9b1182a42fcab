//! Local leaderboard and player data
//!
//! `LocalService` implements the backend contract without a network:
//! persisted to LocalStorage on the web, kept in memory natively.

use serde::{Deserialize, Serialize};

use crate::challenge::{DailyChallenge, daily_for_weekday, weekday_from_unix_ms};
use crate::platform::now_unix_ms;
use crate::service::{GameService, Leaderboard, LeaderboardEntry, ServiceError, UserPreferences};

/// Rows returned per board
pub const LEADERBOARD_SIZE: usize = 5;

/// One board, best score per member, sorted descending
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub entries: Vec<LeaderboardEntry>,
}

impl ScoreBoard {
    /// Record a score; a member keeps their best. Returns the member's rank (1-indexed).
    pub fn record(&mut self, member: &str, score: u64) -> usize {
        match self.entries.iter_mut().find(|e| e.member == member) {
            Some(entry) => entry.score = entry.score.max(score),
            None => self.entries.push(LeaderboardEntry {
                member: member.to_string(),
                score,
            }),
        }
        // Stable sort keeps earlier achievers ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.rank_of(member).unwrap_or(self.entries.len())
    }

    /// 1-indexed position of a member
    pub fn rank_of(&self, member: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.member == member).map(|i| i + 1)
    }

    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.entries.iter().take(n).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Local stand-in for the game backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalService {
    pub username: String,
    pub global: ScoreBoard,
    pub subreddit: ScoreBoard,
    pub preferences: UserPreferences,
    pub completed_challenges: Vec<String>,
    /// Fixed weekday instead of the clock (0 = Sunday)
    #[serde(skip)]
    pub weekday_override: Option<u32>,
    /// Simulate an unreachable backend
    #[serde(skip)]
    pub offline: bool,
}

impl Default for LocalService {
    fn default() -> Self {
        Self::new("Anonymous")
    }
}

impl LocalService {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "troll_yeeter_service";

    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            global: ScoreBoard::default(),
            subreddit: ScoreBoard::default(),
            preferences: UserPreferences::default(),
            completed_challenges: Vec::new(),
            weekday_override: None,
            offline: false,
        }
    }

    fn ensure_online(&self) -> Result<(), ServiceError> {
        if self.offline {
            return Err(ServiceError::Unavailable {
                reason: "offline".to_string(),
            });
        }
        Ok(())
    }

    pub fn has_completed(&self, challenge_id: &str) -> bool {
        self.completed_challenges.iter().any(|id| id == challenge_id)
    }

    /// Decode saved player data
    pub fn from_json(json: &str) -> Result<Self, ServiceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load saved data from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(username: &str) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(service) => {
                        log::info!("Loaded {} leaderboard entries", service.global.entries.len());
                        return service;
                    }
                    Err(e) => log::warn!("Discarding saved player data: {}", e),
                }
            }
        }

        log::info!("No saved player data, starting fresh");
        Self::new(username)
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Player data saved ({} entries)", self.global.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(username: &str) -> Self {
        Self::new(username)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl GameService for LocalService {
    fn submit_score(&mut self, score: u64) -> Result<(), ServiceError> {
        self.ensure_online()?;
        let member = self.username.clone();
        let rank = self.global.record(&member, score);
        self.subreddit.record(&member, score);
        self.preferences.high_score = self.preferences.high_score.max(score);
        log::info!("Score {} submitted for {} (global #{})", score, member, rank);
        self.save();
        Ok(())
    }

    fn leaderboard(&self) -> Result<Leaderboard, ServiceError> {
        self.ensure_online()?;
        Ok(Leaderboard {
            global: self.global.top(LEADERBOARD_SIZE),
            subreddit: self.subreddit.top(LEADERBOARD_SIZE),
        })
    }

    fn daily_challenge(&self) -> Result<DailyChallenge, ServiceError> {
        self.ensure_online()?;
        let weekday = self
            .weekday_override
            .unwrap_or_else(|| weekday_from_unix_ms(now_unix_ms()));
        Ok(daily_for_weekday(weekday))
    }

    fn user_preferences(&self) -> Result<UserPreferences, ServiceError> {
        self.ensure_online()?;
        Ok(self.preferences.clone())
    }

    fn submit_challenge_completion(&mut self, challenge_id: &str) -> Result<(), ServiceError> {
        self.ensure_online()?;
        if !self.has_completed(challenge_id) {
            self.completed_challenges.push(challenge_id.to_string());
            self.save();
        }
        log::info!("Challenge '{}' marked completed for {}", challenge_id, self.username);
        Ok(())
    }

    fn update_skin(&mut self, skin: &str) -> Result<(), ServiceError> {
        self.ensure_online()?;
        let skin = skin.trim();
        if skin.is_empty() {
            return Err(ServiceError::Rejected {
                reason: "empty skin".to_string(),
            });
        }
        self.preferences.selected_skin = skin.to_string();
        log::info!("Skin set to {} for {}", skin, self.username);
        self.save();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_keeps_best_per_member() {
        let mut board = ScoreBoard::default();
        board.record("alice", 300);
        board.record("bob", 500);
        assert_eq!(board.record("alice", 100), 2);
        assert_eq!(board.record("alice", 900), 1);
        assert_eq!(board.entries.len(), 2);
        assert_eq!(board.top_score(), Some(900));
    }

    #[test]
    fn test_leaderboard_is_top_five() {
        let mut service = LocalService::new("me");
        for (i, name) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            service.global.record(name, i as u64 * 100);
        }
        let board = service.leaderboard().unwrap();
        assert_eq!(board.global.len(), LEADERBOARD_SIZE);
        assert_eq!(board.global[0].member, "g");
        assert!(board.subreddit.is_empty());
    }

    #[test]
    fn test_submit_updates_boards_and_high_score() {
        let mut service = LocalService::new("troll");
        service.submit_score(1234).unwrap();
        service.submit_score(10).unwrap();
        assert_eq!(service.global.rank_of("troll"), Some(1));
        assert_eq!(service.subreddit.top_score(), Some(1234));
        assert_eq!(service.user_preferences().unwrap().high_score, 1234);
    }

    #[test]
    fn test_offline_calls_fail() {
        let mut service = LocalService::new("troll");
        service.offline = true;
        assert!(matches!(
            service.submit_score(5),
            Err(ServiceError::Unavailable { .. })
        ));
        assert!(service.leaderboard().is_err());
        assert!(service.global.is_empty());
    }

    #[test]
    fn test_daily_challenge_by_weekday() {
        let mut service = LocalService::new("troll");
        service.weekday_override = Some(3);
        assert_eq!(service.daily_challenge().unwrap().id, "stratosphere");
    }

    #[test]
    fn test_challenge_completion_recorded_once() {
        let mut service = LocalService::new("troll");
        service.submit_challenge_completion("space").unwrap();
        service.submit_challenge_completion("space").unwrap();
        assert_eq!(service.completed_challenges, vec!["space".to_string()]);
    }

    #[test]
    fn test_update_skin() {
        let mut service = LocalService::new("troll");
        service.update_skin("👹").unwrap();
        assert_eq!(service.user_preferences().unwrap().selected_skin, "👹");

        assert!(matches!(
            service.update_skin("  "),
            Err(ServiceError::Rejected { .. })
        ));
        service.offline = true;
        assert!(service.update_skin("🐸").is_err());
        assert_eq!(service.preferences.selected_skin, "👹");
    }

    #[test]
    fn test_corrupt_save_is_malformed() {
        assert!(matches!(
            LocalService::from_json("{\"username\": 5}"),
            Err(ServiceError::Malformed { .. })
        ));
    }

    #[test]
    fn test_round_trips_through_json() {
        let mut service = LocalService::new("troll");
        service.submit_score(77).unwrap();
        let json = serde_json::to_string(&service).unwrap();
        let restored = LocalService::from_json(&json).unwrap();
        assert_eq!(restored.global.top_score(), Some(77));
        assert!(!restored.offline);
    }
}
