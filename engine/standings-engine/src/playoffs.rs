//! Playoff seeding
//!
//! Seeds are always computed from the regular-season ranking, so switching a
//! view to include the postseason never changes who qualified.

use league_store::{Member, MemberId, SeasonConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{Result, StandingsError};
use crate::ranking::RankedRecord;

/// A qualified playoff team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffSeed {
    pub seed: u32,
    pub member_id: MemberId,
    pub division: Option<String>,
    pub is_division_winner: bool,
}

/// Check the invariants playoff math depends on
pub fn validate_season_config(config: &SeasonConfig) -> Result<()> {
    if config.total_weeks == 0 {
        return Err(StandingsError::ConfigInvariantViolation(format!(
            "season {} has no weeks",
            config.season
        )));
    }

    if config.playoff_start_week < 1 || config.playoff_start_week > config.total_weeks {
        return Err(StandingsError::ConfigInvariantViolation(format!(
            "playoff_start_week {} outside 1..={} for season {}",
            config.playoff_start_week, config.total_weeks, config.season
        )));
    }

    if config.playoff_spots == 0 {
        return Err(StandingsError::ConfigInvariantViolation(format!(
            "playoff_spots must be positive for season {}",
            config.season
        )));
    }

    Ok(())
}

/// Seed the playoffs from a regular-season ranking.
///
/// Without divisions the top `playoff_spots` members are seeded in ranking
/// order. With divisions each division's best member is a division winner;
/// winners take the first seeds in ranking order, then the best remaining
/// members league-wide fill the wildcard slots. Every division winner is
/// seeded even when there are more divisions than spots, in which case no
/// wildcard slots remain.
pub fn seed_playoffs(
    regular_season: &[RankedRecord],
    members: &[&Member],
    config: &SeasonConfig,
) -> Result<Vec<PlayoffSeed>> {
    validate_season_config(config)?;

    let division_of: HashMap<MemberId, &str> = members
        .iter()
        .filter_map(|m| m.division.as_deref().map(|d| (m.id, d)))
        .collect();
    let division_for = |id: MemberId| division_of.get(&id).map(|d| d.to_string());

    let spots = config.playoff_spots as usize;

    if !config.has_divisions() {
        return Ok(regular_season
            .iter()
            .take(spots)
            .enumerate()
            .map(|(i, r)| PlayoffSeed {
                seed: i as u32 + 1,
                member_id: r.member_id(),
                division: division_for(r.member_id()),
                is_division_winner: false,
            })
            .collect());
    }

    // The ranked list is already in (wins, points_for) order, so the first
    // member seen from each division is its winner.
    let mut winners: Vec<MemberId> = Vec::new();
    let mut decided: Vec<&str> = Vec::new();
    for r in regular_season {
        let Some(division) = division_of.get(&r.member_id()).copied() else {
            continue;
        };
        if !config.divisions.iter().any(|d| d == division) || decided.contains(&division) {
            continue;
        }
        decided.push(division);
        winners.push(r.member_id());
    }

    let wildcard_slots = spots.saturating_sub(winners.len());
    let wildcards: Vec<MemberId> = regular_season
        .iter()
        .map(|r| r.member_id())
        .filter(|id| !winners.contains(id))
        .take(wildcard_slots)
        .collect();

    debug!(
        season = config.season,
        division_winners = winners.len(),
        wildcards = wildcards.len(),
        "Seeded divisional playoffs"
    );

    let seeds = winners
        .iter()
        .map(|id| (*id, true))
        .chain(wildcards.iter().map(|id| (*id, false)))
        .enumerate()
        .map(|(i, (member_id, is_division_winner))| PlayoffSeed {
            seed: i as u32 + 1,
            member_id,
            division: division_for(member_id),
            is_division_winner,
        })
        .collect();

    Ok(seeds)
}
