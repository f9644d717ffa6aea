//! Weekly high-score credits
//!
//! The top scorer of each week earns one credit and the week's prize. Co-winners
//! split both evenly, so a two-way tie pays each half the prize.

use league_store::{MemberId, Week};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::score_index::ScoreIndex;

/// One member's share of a week's high score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyWinner {
    pub week: Week,
    pub member_id: MemberId,
    pub points: Decimal,

    /// Number of members sharing the week
    pub co_winners: u32,

    /// Fraction of the week's credit, 1 / co_winners
    pub share: f64,

    /// Prize money for this share, never rounded
    pub prize: Decimal,
}

/// A member's accumulated weekly credits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyCredit {
    pub weekly_wins: f64,
    pub weeks_won: BTreeSet<Week>,
    pub weekly_prize_total: Decimal,
}

/// Find each week's high scorers among `eligible` members for weeks `1..=max_week`.
///
/// A week where nobody has a played score is skipped. When
/// `scoreless_weeks_pending` is set, a week whose best score is zero is
/// skipped as well.
pub fn weekly_winners(
    scores: &ScoreIndex,
    eligible: &HashSet<MemberId>,
    max_week: Week,
    prize_amount: Decimal,
    scoreless_weeks_pending: bool,
) -> Vec<WeeklyWinner> {
    let mut winners = Vec::new();

    for week in scores.scored_weeks_through(max_week) {
        let week_scores: Vec<(MemberId, Decimal)> = scores
            .week_scores(week)
            .into_iter()
            .filter(|(id, _)| eligible.contains(id))
            .collect();

        let Some(high) = week_scores.iter().map(|(_, p)| *p).max() else {
            continue;
        };
        if scoreless_weeks_pending && high.is_zero() {
            debug!(week, "Skipping scoreless week");
            continue;
        }

        let top: Vec<MemberId> =
            week_scores.iter().filter(|(_, p)| *p == high).map(|(id, _)| *id).collect();
        let co_winners = top.len() as u32;
        let prize = prize_amount / Decimal::from(co_winners);

        for member_id in top {
            winners.push(WeeklyWinner {
                week,
                member_id,
                points: high,
                co_winners,
                share: 1.0 / co_winners as f64,
                prize,
            });
        }
    }

    winners
}

/// Sum weekly winner shares per member
pub fn weekly_credits(winners: &[WeeklyWinner]) -> HashMap<MemberId, WeeklyCredit> {
    let mut credits: HashMap<MemberId, WeeklyCredit> = HashMap::new();

    for winner in winners {
        let credit = credits.entry(winner.member_id).or_default();
        credit.weekly_wins += winner.share;
        credit.weeks_won.insert(winner.week);
        credit.weekly_prize_total += winner.prize;
    }

    credits
}
