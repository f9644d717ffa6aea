//! League data model
//!
//! These are the raw records the standings engine reads. Nothing derived from
//! them (matchup outcomes, records, ranks, payouts) is ever stored here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Member identifier, unique within a league season
pub type MemberId = i64;

/// League identifier
pub type LeagueId = i64;

/// Season identifier (e.g., 2024)
pub type Season = i32;

/// Week number, 1-based
pub type Week = u32;

/// One participant team within a specific league season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub league_id: LeagueId,
    pub season: Season,

    /// Manager name (e.g., "Dana Whitfield"), used to follow a person across seasons
    pub manager_name: String,

    /// Team name for the season (e.g., "Gridiron Ghosts")
    pub team_name: String,

    /// Division name, when the season is split into divisions
    #[serde(default)]
    pub division: Option<String>,

    /// False once the member has withdrawn. Withdrawn members stay on record.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Member {
    /// Create a new active member without a division
    pub fn new(
        id: MemberId,
        league_id: LeagueId,
        season: Season,
        manager_name: impl Into<String>,
        team_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            league_id,
            season,
            manager_name: manager_name.into(),
            team_name: team_name.into(),
            division: None,
            active: true,
        }
    }

    /// Assign the member to a division
    pub fn with_division(mut self, division: impl Into<String>) -> Self {
        self.division = Some(division.into());
        self
    }
}

/// A member's point total for one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyScore {
    pub member_id: MemberId,
    pub season: Season,
    pub week: Week,
    pub points: Decimal,

    /// False while the week is still pending. A zero with `played = true` is a real zero.
    #[serde(default = "default_true")]
    pub played: bool,
}

impl WeeklyScore {
    /// Create a played score
    pub fn new(member_id: MemberId, season: Season, week: Week, points: Decimal) -> Self {
        Self { member_id, season, week, points, played: true }
    }

    /// Create a placeholder row for a week that has not been played yet
    pub fn pending(member_id: MemberId, season: Season, week: Week) -> Self {
        Self { member_id, season, week, points: Decimal::ZERO, played: false }
    }

    /// Upsert key: at most one row exists per (member, week, season)
    pub fn key(&self) -> (MemberId, Week, Season) {
        (self.member_id, self.week, self.season)
    }
}

/// A scheduled head-to-head pairing for one week.
///
/// Only declares who plays whom. The outcome is always derived from the two
/// members' scores for that week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub season: Season,
    pub week: Week,
    pub team1: MemberId,
    pub team2: MemberId,
}

impl Matchup {
    pub fn new(season: Season, week: Week, team1: MemberId, team2: MemberId) -> Self {
        Self { season, week, team1, team2 }
    }

    /// Check if a member plays in this matchup
    pub fn involves(&self, member_id: MemberId) -> bool {
        self.team1 == member_id || self.team2 == member_id
    }

    /// Get the opponent of a member in this matchup
    pub fn opponent_of(&self, member_id: MemberId) -> Option<MemberId> {
        if self.team1 == member_id {
            Some(self.team2)
        } else if self.team2 == member_id {
            Some(self.team1)
        } else {
            None
        }
    }
}

/// Named cash amounts for a season.
///
/// Categories added in later seasons deserialize to zero when absent. A zero
/// amount means the prize did not exist that season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrizeStructure {
    pub first: Decimal,
    pub second: Decimal,
    pub third: Decimal,
    pub fourth: Decimal,
    pub highest_points: Decimal,
    pub highest_weekly: Decimal,
    pub lowest_weekly: Decimal,
}

impl PrizeStructure {
    /// Amount for a final placement
    pub fn placement_amount(&self, placement: Placement) -> Decimal {
        match placement {
            Placement::First => self.first,
            Placement::Second => self.second,
            Placement::Third => self.third,
            Placement::Fourth => self.fourth,
        }
    }

    /// Amount for a special prize category
    pub fn special_amount(&self, category: SpecialPrize) -> Decimal {
        match category {
            SpecialPrize::HighestPoints => self.highest_points,
            SpecialPrize::HighestWeekly => self.highest_weekly,
            SpecialPrize::LowestWeekly => self.lowest_weekly,
        }
    }

    /// Whether a special prize existed this season
    pub fn offers(&self, category: SpecialPrize) -> bool {
        !self.special_amount(category).is_zero()
    }
}

/// Per league season configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub league_id: LeagueId,
    pub season: Season,
    pub total_weeks: Week,

    /// First postseason week. The regular season is weeks 1..playoff_start_week-1.
    pub playoff_start_week: Week,
    pub playoff_spots: u32,
    pub weekly_prize_amount: Decimal,

    #[serde(default)]
    pub prize_structure: PrizeStructure,

    #[serde(default)]
    pub divisions: Vec<String>,
}

impl SeasonConfig {
    /// Last week of the regular season. Zero when the playoffs start in week 1.
    pub fn regular_season_end(&self) -> Week {
        self.playoff_start_week.saturating_sub(1)
    }

    /// Whether the season is split into divisions
    pub fn has_divisions(&self) -> bool {
        !self.divisions.is_empty()
    }
}

/// Final placements 1st through 4th
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    First,
    Second,
    Third,
    Fourth,
}

impl Placement {
    pub const ALL: [Placement; 4] =
        [Placement::First, Placement::Second, Placement::Third, Placement::Fourth];

    /// 1-based place number
    pub fn place(&self) -> u32 {
        match self {
            Placement::First => 1,
            Placement::Second => 2,
            Placement::Third => 3,
            Placement::Fourth => 4,
        }
    }
}

/// Prize categories awarded for a statistical extreme rather than final ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialPrize {
    HighestPoints,
    HighestWeekly,
    LowestWeekly,
}

impl SpecialPrize {
    pub const ALL: [SpecialPrize; 3] =
        [SpecialPrize::HighestPoints, SpecialPrize::HighestWeekly, SpecialPrize::LowestWeekly];
}

/// Manual final results entered by an admin. Every slot is optional until set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalWinners {
    pub first: Option<MemberId>,
    pub second: Option<MemberId>,
    pub third: Option<MemberId>,
    pub fourth: Option<MemberId>,
    pub highest_points: Option<MemberId>,
    pub highest_weekly: Option<MemberId>,
    pub lowest_weekly: Option<MemberId>,
}

impl FinalWinners {
    /// Member assigned to a placement
    pub fn placement(&self, placement: Placement) -> Option<MemberId> {
        match placement {
            Placement::First => self.first,
            Placement::Second => self.second,
            Placement::Third => self.third,
            Placement::Fourth => self.fourth,
        }
    }

    /// Member recorded for a special prize
    pub fn special(&self, category: SpecialPrize) -> Option<MemberId> {
        match category {
            SpecialPrize::HighestPoints => self.highest_points,
            SpecialPrize::HighestWeekly => self.highest_weekly,
            SpecialPrize::LowestWeekly => self.lowest_weekly,
        }
    }

    /// Placement held by a member, if any
    pub fn placement_of(&self, member_id: MemberId) -> Option<Placement> {
        Placement::ALL.into_iter().find(|p| self.placement(*p) == Some(member_id))
    }

    /// Assigned placements in order, skipping empty slots
    pub fn placements(&self) -> Vec<(Placement, MemberId)> {
        Placement::ALL
            .into_iter()
            .filter_map(|p| self.placement(p).map(|id| (p, id)))
            .collect()
    }

    /// Whether any placement slot has been filled
    pub fn has_placements(&self) -> bool {
        Placement::ALL.into_iter().any(|p| self.placement(p).is_some())
    }
}

/// Everything the engine reads for one league season, fetched in one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSnapshot {
    pub league_id: LeagueId,
    pub season: Season,
    pub members: Vec<Member>,
    pub scores: Vec<WeeklyScore>,
    pub matchups: Vec<Matchup>,
    pub config: Option<SeasonConfig>,
    pub final_winners: Option<FinalWinners>,
}

impl SeasonSnapshot {
    /// Active members in store order
    pub fn active_members(&self) -> Vec<&Member> {
        self.members.iter().filter(|m| m.active).collect()
    }
}

fn default_true() -> bool {
    true
}
