//! Type definitions for standings reports

use league_store::{LeagueId, Member, MemberId, Placement, Season, SpecialPrize, Week};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::matchup::MatchupResult;
use crate::playoffs::PlayoffSeed;
use crate::ranking::{DivisionStanding, RankedRecord};
use crate::settlement::PrizeSuggestions;
use crate::weekly::{WeeklyCredit, WeeklyWinner};

/// Which weeks a standings query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandingsView {
    /// Weeks before the playoffs start (the live view during the season)
    RegularSeason,
    /// Every week, with admin-entered final placements applied
    Final,
}

impl StandingsView {
    pub fn includes_postseason(&self) -> bool {
        matches!(self, StandingsView::Final)
    }
}

/// A member's derived line in the standings. Recomputed on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub member_id: MemberId,
    pub manager_name: String,
    pub team_name: String,
    pub division: Option<String>,

    pub rank: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: Decimal,
    pub points_against: Decimal,
    pub games_played: u32,

    pub weekly_wins: f64,
    pub weeks_won: BTreeSet<Week>,

    pub playoff_seed: Option<u32>,
    pub is_division_winner: bool,

    pub placement: Option<Placement>,
    pub placement_prize: Decimal,
    pub special_prizes: BTreeMap<SpecialPrize, Decimal>,
    pub weekly_prize_total: Decimal,
    pub total_winnings: Decimal,
}

impl Standing {
    /// Build a standing from a ranked record, before seeds, credits and prizes
    pub fn from_ranked(ranked: &RankedRecord, member: &Member) -> Self {
        let record = &ranked.record;
        Self {
            member_id: member.id,
            manager_name: member.manager_name.clone(),
            team_name: member.team_name.clone(),
            division: member.division.clone(),
            rank: ranked.rank,
            wins: record.wins,
            losses: record.losses,
            ties: record.ties,
            points_for: record.points_for,
            points_against: record.points_against,
            games_played: record.games_played,
            weekly_wins: 0.0,
            weeks_won: BTreeSet::new(),
            playoff_seed: None,
            is_division_winner: false,
            placement: ranked.placement,
            placement_prize: Decimal::ZERO,
            special_prizes: BTreeMap::new(),
            weekly_prize_total: Decimal::ZERO,
            total_winnings: Decimal::ZERO,
        }
    }

    /// Attach weekly high-score credit
    pub fn apply_weekly_credit(&mut self, credit: &WeeklyCredit) {
        self.weekly_wins = credit.weekly_wins;
        self.weeks_won = credit.weeks_won.clone();
        self.weekly_prize_total = credit.weekly_prize_total;
    }

    /// Attach playoff qualification
    pub fn apply_seed(&mut self, seed: &PlayoffSeed) {
        self.playoff_seed = Some(seed.seed);
        self.is_division_winner = seed.is_division_winner;
    }

    /// Record line, e.g. "9-4-1", or "9-5" without ties
    pub fn record_line(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

/// How far through its schedule a season is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCompletion {
    pub weeks_scored: u32,
    pub total_weeks: u32,
}

impl SeasonCompletion {
    pub fn is_complete(&self) -> bool {
        self.weeks_scored >= self.total_weeks
    }
}

/// Everything the display layer needs for one league season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    pub league_id: LeagueId,
    pub season: Season,
    pub view: StandingsView,
    pub standings: Vec<Standing>,
    pub playoff_seeds: Vec<PlayoffSeed>,
    pub weekly_winners: Vec<WeeklyWinner>,
    pub matchup_results: Vec<MatchupResult>,
    pub division_standings: Vec<DivisionStanding>,

    /// Only present for admin callers
    pub suggestions: Option<PrizeSuggestions>,
    pub completion: SeasonCompletion,
}

impl SeasonReport {
    pub fn standing(&self, member_id: MemberId) -> Option<&Standing> {
        self.standings.iter().find(|s| s.member_id == member_id)
    }

    /// Sum of everything paid out this season
    pub fn total_payout(&self) -> Decimal {
        self.standings.iter().map(|s| s.total_winnings).sum()
    }
}
