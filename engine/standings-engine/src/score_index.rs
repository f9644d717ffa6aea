//! Lookup index over a season's weekly score rows

use league_store::{MemberId, Week, WeeklyScore};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

use crate::config::ScoringConfig;

/// Played scores of one season, keyed by (member, week).
///
/// Rows that are not played yet are left out, so every lookup answers
/// "what did this member actually score". Input order is preserved for
/// per-week listings.
#[derive(Debug, Clone, Default)]
pub struct ScoreIndex {
    points: HashMap<(MemberId, Week), Decimal>,
    rows: Vec<(MemberId, Week, Decimal)>,
}

impl ScoreIndex {
    /// Build the index from raw score rows
    pub fn build(scores: &[WeeklyScore], scoring: &ScoringConfig) -> Self {
        let mut index = Self::default();

        for score in scores {
            let key = (score.member_id, score.week);

            // Last write wins on a duplicate key, even when the later row is unplayed
            if index.points.remove(&key).is_some() {
                index.rows.retain(|(m, w, _)| (*m, *w) != key);
            }
            if scoring.require_played_flag && !score.played {
                continue;
            }
            index.points.insert(key, score.points);
            index.rows.push((score.member_id, score.week, score.points));
        }

        index
    }

    /// Points a member scored in a week, if the week was played
    pub fn points(&self, member_id: MemberId, week: Week) -> Option<Decimal> {
        self.points.get(&(member_id, week)).copied()
    }

    /// Played scores for one week, in input order
    pub fn week_scores(&self, week: Week) -> Vec<(MemberId, Decimal)> {
        self.rows.iter().filter(|(_, w, _)| *w == week).map(|(m, _, p)| (*m, *p)).collect()
    }

    /// All played scores up to and including `max_week`, in input order
    pub fn scores_through(&self, max_week: Week) -> impl Iterator<Item = (MemberId, Week, Decimal)> + '_ {
        self.rows.iter().copied().filter(move |(_, w, _)| *w <= max_week)
    }

    /// Weeks with at least one played score
    pub fn scored_weeks(&self) -> BTreeSet<Week> {
        self.rows.iter().map(|(_, w, _)| *w).collect()
    }

    /// Weeks with at least one played score, limited to `max_week`
    pub fn scored_weeks_through(&self, max_week: Week) -> BTreeSet<Week> {
        self.scored_weeks().into_iter().filter(|w| *w <= max_week).collect()
    }

    /// Whether a member has any played score this season
    pub fn has_scores(&self, member_id: MemberId) -> bool {
        self.rows.iter().any(|(m, _, _)| *m == member_id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_rows_are_skipped() {
        let scores = vec![
            WeeklyScore::new(1, 2024, 1, Decimal::from(80)),
            WeeklyScore::pending(2, 2024, 1),
        ];

        let index = ScoreIndex::build(&scores, &ScoringConfig::default());
        assert_eq!(index.points(1, 1), Some(Decimal::from(80)));
        assert_eq!(index.points(2, 1), None);
        assert!(!index.has_scores(2));

        let lenient = ScoringConfig { require_played_flag: false, ..Default::default() };
        let index = ScoreIndex::build(&scores, &lenient);
        assert_eq!(index.points(2, 1), Some(Decimal::ZERO));
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let scores = vec![
            WeeklyScore::new(1, 2024, 3, Decimal::from(70)),
            WeeklyScore::new(2, 2024, 3, Decimal::from(75)),
            WeeklyScore::new(1, 2024, 3, Decimal::from(99)),
        ];

        let index = ScoreIndex::build(&scores, &ScoringConfig::default());
        assert_eq!(index.points(1, 3), Some(Decimal::from(99)));
        assert_eq!(index.week_scores(3), vec![(2, Decimal::from(75)), (1, Decimal::from(99))]);
        assert_eq!(index.scored_weeks().into_iter().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_later_pending_row_replaces_played_row() {
        let scores = vec![
            WeeklyScore::new(1, 2024, 2, Decimal::from(64)),
            WeeklyScore::new(2, 2024, 2, Decimal::from(51)),
            WeeklyScore::pending(1, 2024, 2),
        ];

        let index = ScoreIndex::build(&scores, &ScoringConfig::default());
        assert_eq!(index.points(1, 2), None);
        assert_eq!(index.week_scores(2), vec![(2, Decimal::from(51))]);
        assert!(!index.has_scores(1));
    }
}
