//! Prize settlement
//!
//! Placement and special prizes are paid only to members an admin recorded in
//! the season's final winners. The engine can suggest who leads each special
//! category, but a suggestion never becomes a payout on its own.

use league_store::{FinalWinners, MemberId, PrizeStructure, SpecialPrize, Week};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::score_index::ScoreIndex;
use crate::types::Standing;

/// Season points leader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsLeader {
    pub member_id: MemberId,
    pub points: Decimal,
}

/// A single-week score extreme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyExtreme {
    pub member_id: MemberId,
    pub week: Week,
    pub points: Decimal,
}

/// Advisory special-prize leaders, for the admin entering final winners
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeSuggestions {
    pub highest_points: Option<PointsLeader>,
    pub highest_weekly: Option<WeeklyExtreme>,
    pub lowest_weekly: Option<WeeklyExtreme>,
}

/// Pay placement and special prizes and total everyone's winnings.
///
/// Expects weekly credit to be applied already. Slots naming members that
/// are not in the standings are skipped. Special prizes with a zero amount
/// did not exist that season and are never paid.
pub fn settle(standings: &mut [Standing], winners: Option<&FinalWinners>, prizes: &PrizeStructure) {
    for standing in standings.iter_mut() {
        standing.placement_prize = Decimal::ZERO;
        standing.special_prizes.clear();
    }

    if let Some(winners) = winners {
        let mut placed: HashSet<MemberId> = HashSet::new();

        for (placement, member_id) in winners.placements() {
            let Some(standing) = standings.iter_mut().find(|s| s.member_id == member_id) else {
                warn!(member_id, place = placement.place(), "Placement winner not in standings, skipping");
                continue;
            };
            if !placed.insert(member_id) {
                continue;
            }
            standing.placement = Some(placement);
            standing.placement_prize = prizes.placement_amount(placement);
        }

        for category in SpecialPrize::ALL {
            let Some(member_id) = winners.special(category) else {
                continue;
            };
            if !prizes.offers(category) {
                debug!(?category, "Special prize not offered this season, ignoring winner");
                continue;
            }
            match standings.iter_mut().find(|s| s.member_id == member_id) {
                Some(standing) => {
                    standing.special_prizes.insert(category, prizes.special_amount(category));
                }
                None => warn!(member_id, ?category, "Special prize winner not in standings, skipping"),
            }
        }
    }

    for standing in standings.iter_mut() {
        let specials: Decimal = standing.special_prizes.values().copied().sum();
        standing.total_winnings = standing.weekly_prize_total + standing.placement_prize + specials;
    }
}

/// Find the current leaders of each offered special-prize category.
///
/// Ties go to the earlier standing for season points and to the earlier week
/// for single-week extremes. Zero scores are ignored for the lowest week
/// when `skip_zero_scores` is set, since they usually mean "not played".
pub fn suggest_prizes(
    standings: &[Standing],
    scores: &ScoreIndex,
    max_week: Week,
    prizes: &PrizeStructure,
    skip_zero_scores: bool,
) -> PrizeSuggestions {
    let mut suggestions = PrizeSuggestions::default();

    if prizes.offers(SpecialPrize::HighestPoints) {
        for standing in standings {
            let better = suggestions
                .highest_points
                .as_ref()
                .map_or(true, |leader| standing.points_for > leader.points);
            if better {
                suggestions.highest_points =
                    Some(PointsLeader { member_id: standing.member_id, points: standing.points_for });
            }
        }
    }

    let eligible: HashSet<MemberId> = standings.iter().map(|s| s.member_id).collect();
    let offers_high = prizes.offers(SpecialPrize::HighestWeekly);
    let offers_low = prizes.offers(SpecialPrize::LowestWeekly);

    for (member_id, week, points) in scores.scores_through(max_week) {
        if !eligible.contains(&member_id) {
            continue;
        }
        let candidate = WeeklyExtreme { member_id, week, points };

        if offers_high {
            let better = suggestions.highest_weekly.as_ref().map_or(true, |best| {
                points > best.points || (points == best.points && week < best.week)
            });
            if better {
                suggestions.highest_weekly = Some(candidate.clone());
            }
        }

        if offers_low && !(skip_zero_scores && points.is_zero()) {
            let better = suggestions.lowest_weekly.as_ref().map_or(true, |best| {
                points < best.points || (points == best.points && week < best.week)
            });
            if better {
                suggestions.lowest_weekly = Some(candidate);
            }
        }
    }

    suggestions
}
