//! Score, altitude zones and ranks
//!
//! All three are monotonic within a run: the score keeps its best value, the
//! zone follows the highest altitude reached, and each rank celebrates once.

use serde::{Deserialize, Serialize};

use crate::consts::PIXELS_PER_POINT;

/// Altitude band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    City,
    Stratosphere,
    Space,
    Beyond,
}

/// Altitude (px above the anchor) where each zone begins
pub const STRATOSPHERE_ALTITUDE: f32 = 2000.0;
pub const SPACE_ALTITUDE: f32 = 5000.0;
pub const BEYOND_ALTITUDE: f32 = 10000.0;

impl Zone {
    /// Step function of altitude
    pub fn for_altitude(altitude: f32) -> Self {
        if altitude >= BEYOND_ALTITUDE {
            Zone::Beyond
        } else if altitude >= SPACE_ALTITUDE {
            Zone::Space
        } else if altitude >= STRATOSPHERE_ALTITUDE {
            Zone::Stratosphere
        } else {
            Zone::City
        }
    }

    pub fn score_multiplier(&self) -> u64 {
        match self {
            Zone::Beyond => 2,
            _ => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Zone::City => "City",
            Zone::Stratosphere => "Stratosphere",
            Zone::Space => "Space",
            Zone::Beyond => "Beyond",
        }
    }
}

/// Cosmetic tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    NoobTroll,
    ApprenticeYeeter,
    ProYeeter,
    EliteLauncher,
    LegendaryTroll,
    YeetGod,
}

/// Ascending (threshold, rank) table
pub const RANK_TABLE: [(u64, Rank); 6] = [
    (0, Rank::NoobTroll),
    (500, Rank::ApprenticeYeeter),
    (1000, Rank::ProYeeter),
    (2500, Rank::EliteLauncher),
    (5000, Rank::LegendaryTroll),
    (10000, Rank::YeetGod),
];

impl Rank {
    pub fn lowest() -> Self {
        Rank::NoobTroll
    }

    pub fn for_score(score: u64) -> Self {
        RANK_TABLE
            .iter()
            .rev()
            .find(|(threshold, _)| score >= *threshold)
            .map(|&(_, rank)| rank)
            .unwrap_or(Rank::NoobTroll)
    }

    /// Next rank up, if any
    pub fn next(&self) -> Option<Rank> {
        RANK_TABLE
            .iter()
            .map(|&(_, rank)| rank)
            .find(|rank| rank > self)
    }

    pub fn threshold(&self) -> u64 {
        RANK_TABLE
            .iter()
            .find(|(_, rank)| rank == self)
            .map(|&(threshold, _)| threshold)
            .unwrap_or(0)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Rank::NoobTroll => "Noob Troll",
            Rank::ApprenticeYeeter => "Apprentice Yeeter",
            Rank::ProYeeter => "Pro Yeeter",
            Rank::EliteLauncher => "Elite Launcher",
            Rank::LegendaryTroll => "Legendary Troll",
            Rank::YeetGod => "Yeet God",
        }
    }
}

/// Raw score for an altitude in a zone (never negative)
pub fn raw_score(altitude: f32, zone: Zone) -> u64 {
    let points = (altitude.max(0.0) / PIXELS_PER_POINT).floor() as u64;
    points * zone.score_multiplier()
}

/// What changed during one scoring pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreUpdate {
    pub new_zone: Option<Zone>,
    /// Every rank threshold crossed this pass, ascending
    pub ranks_crossed: Vec<Rank>,
}

/// Fold the current altitude into the run's score, zone and rank
///
/// `zone`, `max_altitude`, `score` and `rank` are the run's running values.
pub fn evaluate(
    altitude: f32,
    max_altitude: &mut f32,
    score: &mut u64,
    zone: &mut Zone,
    rank: &mut Rank,
) -> ScoreUpdate {
    let mut update = ScoreUpdate::default();

    *max_altitude = max_altitude.max(altitude);

    let reached = Zone::for_altitude(*max_altitude);
    if reached > *zone {
        *zone = reached;
        update.new_zone = Some(reached);
    }

    *score = (*score).max(raw_score(altitude, *zone));

    let earned = Rank::for_score(*score);
    if earned > *rank {
        update.ranks_crossed = RANK_TABLE
            .iter()
            .map(|&(_, r)| r)
            .filter(|r| *r > *rank && *r <= earned)
            .collect();
        *rank = earned;
    }

    update
}
