//! League ranking
//!
//! Order is wins descending, then points for descending. Nothing else breaks
//! a tie: members level on both keep their input order, so callers must
//! feed members in a stable order (store order) to get a stable ranking.

use league_store::{FinalWinners, Member, MemberId, Placement};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::records::TeamRecord;

/// A record with its 1-based league position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRecord {
    pub rank: u32,
    pub record: TeamRecord,

    /// Set when the position comes from an admin-entered final placement
    pub placement: Option<Placement>,
}

impl RankedRecord {
    pub fn member_id(&self) -> MemberId {
        self.record.member_id
    }
}

/// Members of one division in league order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionStanding {
    pub division: String,
    pub member_ids: Vec<MemberId>,
}

/// Ranking key: wins descending, then points for descending
pub fn compare_records(a: &TeamRecord, b: &TeamRecord) -> Ordering {
    b.wins.cmp(&a.wins).then_with(|| b.points_for.cmp(&a.points_for))
}

/// Rank records. The sort is stable, so exact ties keep input order.
pub fn rank(mut records: Vec<TeamRecord>) -> Vec<RankedRecord> {
    records.sort_by(compare_records);
    assign_ranks(records.into_iter().map(|record| (record, None)))
}

/// Move admin-assigned placements to the front, in placement order.
///
/// Everyone else keeps their relative order behind them and ranks are
/// reassigned 1..N. A placement naming a member who is not in the list is
/// skipped, as is a second placement for an already placed member.
pub fn apply_final_placements(
    ranked: Vec<RankedRecord>,
    winners: &FinalWinners,
) -> Vec<RankedRecord> {
    let present: HashSet<MemberId> = ranked.iter().map(|r| r.member_id()).collect();
    let mut placed: Vec<(Placement, MemberId)> = Vec::new();

    for (placement, member_id) in winners.placements() {
        if !present.contains(&member_id) {
            warn!(
                member_id,
                place = placement.place(),
                "Final placement names a member missing from the standings, skipping"
            );
            continue;
        }
        if placed.iter().any(|(_, id)| *id == member_id) {
            warn!(member_id, place = placement.place(), "Member already holds a placement, skipping");
            continue;
        }
        placed.push((placement, member_id));
    }

    if placed.is_empty() {
        return ranked;
    }

    let mut by_id: HashMap<MemberId, TeamRecord> =
        ranked.iter().map(|r| (r.member_id(), r.record.clone())).collect();

    let mut ordered: Vec<(TeamRecord, Option<Placement>)> = Vec::with_capacity(ranked.len());
    for (placement, member_id) in &placed {
        if let Some(record) = by_id.remove(member_id) {
            ordered.push((record, Some(*placement)));
        }
    }
    for entry in ranked {
        if let Some(record) = by_id.remove(&entry.member_id()) {
            ordered.push((record, None));
        }
    }

    assign_ranks(ordered.into_iter())
}

/// Split a ranked list into per-division standings, in `divisions` order.
/// Members without a listed division are left out.
pub fn division_standings(
    ranked: &[RankedRecord],
    members: &[&Member],
    divisions: &[String],
) -> Vec<DivisionStanding> {
    let division_of: HashMap<MemberId, &str> = members
        .iter()
        .filter_map(|m| m.division.as_deref().map(|d| (m.id, d)))
        .collect();

    divisions
        .iter()
        .map(|division| DivisionStanding {
            division: division.clone(),
            member_ids: ranked
                .iter()
                .map(|r| r.member_id())
                .filter(|id| division_of.get(id) == Some(&division.as_str()))
                .collect(),
        })
        .collect()
}

fn assign_ranks(
    records: impl Iterator<Item = (TeamRecord, Option<Placement>)>,
) -> Vec<RankedRecord> {
    records
        .enumerate()
        .map(|(i, (record, placement))| RankedRecord { rank: i as u32 + 1, record, placement })
        .collect()
}
