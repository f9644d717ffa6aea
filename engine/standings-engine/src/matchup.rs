//! Matchup resolution
//!
//! A matchup never stores its result. The outcome is derived from the two
//! members' scores every time it is asked for.

use league_store::{Matchup, MemberId, Week};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ScoringConfig;
use crate::score_index::ScoreIndex;

/// Result of a head-to-head pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchupOutcome {
    TeamOneWins,
    TeamTwoWins,
    Tie,
    /// Not played yet; counts for nobody
    Pending,
}

impl MatchupOutcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, MatchupOutcome::Pending)
    }
}

/// A matchup with its derived outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupResult {
    pub week: Week,
    pub team1: MemberId,
    pub team2: MemberId,
    pub team1_points: Option<Decimal>,
    pub team2_points: Option<Decimal>,
    pub outcome: MatchupOutcome,
}

impl MatchupResult {
    pub fn winner(&self) -> Option<MemberId> {
        match self.outcome {
            MatchupOutcome::TeamOneWins => Some(self.team1),
            MatchupOutcome::TeamTwoWins => Some(self.team2),
            _ => None,
        }
    }

    pub fn loser(&self) -> Option<MemberId> {
        match self.outcome {
            MatchupOutcome::TeamOneWins => Some(self.team2),
            MatchupOutcome::TeamTwoWins => Some(self.team1),
            _ => None,
        }
    }

    /// Points a side is credited with. A missing score counts as zero once the matchup is decided.
    pub fn points_of(&self, member_id: MemberId) -> Decimal {
        let points = if member_id == self.team1 {
            self.team1_points
        } else if member_id == self.team2 {
            self.team2_points
        } else {
            None
        };
        points.unwrap_or(Decimal::ZERO)
    }
}

/// Derives matchup outcomes from weekly scores
#[derive(Debug, Clone)]
pub struct MatchupResolver {
    scoreless_matchups_pending: bool,
}

impl MatchupResolver {
    pub fn new(scoring: &ScoringConfig) -> Self {
        Self { scoreless_matchups_pending: scoring.scoreless_matchups_pending }
    }

    /// Resolve two sides' played points. `None` means that side has no played score.
    ///
    /// Higher score wins and equal scores tie. Nobody having played is pending,
    /// and so is 0-0 when scoreless matchups are treated as unplayed.
    pub fn resolve(&self, team1: Option<Decimal>, team2: Option<Decimal>) -> MatchupOutcome {
        if team1.is_none() && team2.is_none() {
            return MatchupOutcome::Pending;
        }

        let a = team1.unwrap_or(Decimal::ZERO);
        let b = team2.unwrap_or(Decimal::ZERO);

        if self.scoreless_matchups_pending && a.is_zero() && b.is_zero() {
            return MatchupOutcome::Pending;
        }

        match a.cmp(&b) {
            std::cmp::Ordering::Greater => MatchupOutcome::TeamOneWins,
            std::cmp::Ordering::Less => MatchupOutcome::TeamTwoWins,
            std::cmp::Ordering::Equal => MatchupOutcome::Tie,
        }
    }

    /// Resolve a scheduled matchup against the season's scores
    pub fn resolve_matchup(&self, matchup: &Matchup, scores: &ScoreIndex) -> MatchupResult {
        let team1_points = scores.points(matchup.team1, matchup.week);
        let team2_points = scores.points(matchup.team2, matchup.week);

        MatchupResult {
            week: matchup.week,
            team1: matchup.team1,
            team2: matchup.team2,
            team1_points,
            team2_points,
            outcome: self.resolve(team1_points, team2_points),
        }
    }

    /// Resolve every matchup up to and including `max_week`, in schedule order
    pub fn results(
        &self,
        matchups: &[Matchup],
        scores: &ScoreIndex,
        max_week: Week,
    ) -> Vec<MatchupResult> {
        matchups
            .iter()
            .filter(|m| m.week <= max_week)
            .map(|m| self.resolve_matchup(m, scores))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_store::WeeklyScore;

    fn strict() -> MatchupResolver {
        MatchupResolver::new(&ScoringConfig::default())
    }

    fn legacy() -> MatchupResolver {
        MatchupResolver::new(&ScoringConfig {
            scoreless_matchups_pending: false,
            ..Default::default()
        })
    }

    fn pts(value: i64) -> Option<Decimal> {
        Some(Decimal::from(value))
    }

    #[test]
    fn test_higher_score_wins() {
        assert_eq!(strict().resolve(pts(110), pts(95)), MatchupOutcome::TeamOneWins);
        assert_eq!(strict().resolve(pts(80), pts(95)), MatchupOutcome::TeamTwoWins);
        assert_eq!(strict().resolve(pts(88), pts(88)), MatchupOutcome::Tie);
    }

    #[test]
    fn test_fractional_points_compare_exactly() {
        let a = Some(Decimal::new(10010, 2));
        let b = Some(Decimal::new(10001, 2));
        assert_eq!(strict().resolve(a, b), MatchupOutcome::TeamOneWins);
    }

    #[test]
    fn test_unplayed_matchups_are_pending() {
        assert_eq!(strict().resolve(None, None), MatchupOutcome::Pending);
        assert_eq!(legacy().resolve(None, None), MatchupOutcome::Pending);
    }

    #[test]
    fn test_scoreless_matchup_convention() {
        assert_eq!(strict().resolve(pts(0), pts(0)), MatchupOutcome::Pending);
        assert_eq!(legacy().resolve(pts(0), pts(0)), MatchupOutcome::Tie);
    }

    #[test]
    fn test_missing_side_counts_as_zero() {
        assert_eq!(strict().resolve(pts(72), None), MatchupOutcome::TeamOneWins);
        assert_eq!(strict().resolve(None, pts(1)), MatchupOutcome::TeamTwoWins);
    }

    #[test]
    fn test_results_respect_week_cutoff() {
        let scores = vec![
            WeeklyScore::new(1, 2024, 1, Decimal::from(100)),
            WeeklyScore::new(2, 2024, 1, Decimal::from(90)),
            WeeklyScore::new(1, 2024, 2, Decimal::from(60)),
            WeeklyScore::new(2, 2024, 2, Decimal::from(70)),
        ];
        let index = ScoreIndex::build(&scores, &ScoringConfig::default());
        let matchups = vec![Matchup::new(2024, 1, 1, 2), Matchup::new(2024, 2, 1, 2)];

        let results = strict().results(&matchups, &index, 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].winner(), Some(1));
        assert_eq!(results[0].loser(), Some(2));

        let results = strict().results(&matchups, &index, 2);
        assert_eq!(results[1].winner(), Some(2));
        assert_eq!(results[1].points_of(1), Decimal::from(60));
    }
}
