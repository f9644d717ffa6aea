//! Cumulative win/loss/tie records and point totals

use league_store::{Matchup, MemberId, Week};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::matchup::{MatchupOutcome, MatchupResolver};
use crate::score_index::ScoreIndex;

/// A member's record up to a week cutoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub member_id: MemberId,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: Decimal,
    pub points_against: Decimal,

    /// Weeks in range with a played score
    pub games_played: u32,
}

impl TeamRecord {
    /// Empty record for a member
    pub fn new(member_id: MemberId) -> Self {
        Self {
            member_id,
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: Decimal::ZERO,
            points_against: Decimal::ZERO,
            games_played: 0,
        }
    }

    /// Head-to-head games with an outcome
    pub fn decided_games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Win percentage with ties counted as half a win. Zero before any game is decided.
    pub fn win_pct(&self) -> f64 {
        let decided = self.decided_games();
        if decided == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / decided as f64
    }
}

/// Builds records from matchups and scores
#[derive(Debug, Clone)]
pub struct RecordAggregator {
    resolver: MatchupResolver,
}

impl RecordAggregator {
    pub fn new(resolver: MatchupResolver) -> Self {
        Self { resolver }
    }

    /// Compute records for `members` over weeks `1..=max_week`.
    ///
    /// Output follows the order of `members`. A member without matchups or
    /// scores gets an all-zero record. Matchup sides outside `members` are
    /// skipped while their opponent is still credited.
    pub fn aggregate(
        &self,
        members: &[MemberId],
        scores: &ScoreIndex,
        matchups: &[Matchup],
        max_week: Week,
    ) -> Vec<TeamRecord> {
        let mut records: Vec<TeamRecord> = members.iter().map(|id| TeamRecord::new(*id)).collect();
        let position: HashMap<MemberId, usize> =
            members.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        for result in self.resolver.results(matchups, scores, max_week) {
            if !result.outcome.is_decided() {
                continue;
            }

            for (side, opponent) in [(result.team1, result.team2), (result.team2, result.team1)] {
                let Some(&idx) = position.get(&side) else {
                    continue;
                };
                let record = &mut records[idx];

                match result.outcome {
                    MatchupOutcome::Tie => record.ties += 1,
                    _ if result.winner() == Some(side) => record.wins += 1,
                    _ => record.losses += 1,
                }
                record.points_against += result.points_of(opponent);
            }
        }

        for (member_id, _, points) in scores.scores_through(max_week) {
            if let Some(&idx) = position.get(&member_id) {
                records[idx].points_for += points;
                records[idx].games_played += 1;
            }
        }

        let unscored = records.iter().filter(|r| r.games_played == 0).count();
        if unscored > 0 {
            debug!(unscored, max_week, "Members without scores in range get a zero record");
        }

        records
    }
}
