//! Cross-season participation history
//!
//! Member ids only live for one season, so a person is followed across
//! seasons by manager name. Seasons that have not scored all their weeks are
//! listed but marked ongoing, and never count toward career totals.

use league_store::{FinalWinners, Member, MemberId, Placement, Season, Week};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::config::HistoryConfig;

/// How far a member got in one season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ParticipationStatus {
    /// Finished 1st, 2nd or 3rd per the admin-entered final winners
    Winner { place: u32 },
    Playoffs,
    Participated,
    None,
}

impl ParticipationStatus {
    fn precedence(&self) -> u8 {
        match self {
            ParticipationStatus::Winner { place } => 10 - *place as u8,
            ParticipationStatus::Playoffs => 2,
            ParticipationStatus::Participated => 1,
            ParticipationStatus::None => 0,
        }
    }
}

/// A season member as seen by the history view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonEntrant {
    pub member_id: MemberId,
    pub manager_name: String,
    pub team_name: String,

    /// Final-view rank, if the member was ranked
    pub final_rank: Option<u32>,

    /// Whether the member has any played score this season
    pub has_scores: bool,
}

impl SeasonEntrant {
    pub fn new(member: &Member, final_rank: Option<u32>, has_scores: bool) -> Self {
        Self {
            member_id: member.id,
            manager_name: member.manager_name.clone(),
            team_name: member.team_name.clone(),
            final_rank,
            has_scores,
        }
    }
}

/// What one season contributes to league history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonOutcome {
    pub season: Season,
    pub total_weeks: Week,
    pub weeks_scored: u32,

    /// Entrants in final standings order
    pub entrants: Vec<SeasonEntrant>,
    pub playoff_members: Vec<MemberId>,
    pub final_winners: Option<FinalWinners>,
}

/// One manager's result in one season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationRecord {
    pub manager_name: String,
    pub season: Season,
    pub member_id: Option<MemberId>,
    pub team_name: Option<String>,
    pub final_rank: Option<u32>,
    pub status: ParticipationStatus,

    /// The season has not scored all its weeks yet
    pub ongoing: bool,
}

/// A manager's totals over completed seasons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerSummary {
    pub manager_name: String,
    pub championships: u32,
    pub runner_ups: u32,
    pub third_places: u32,
    pub playoff_appearances: u32,
    pub seasons_played: u32,
}

/// League history across every season
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationHistory {
    pub records: Vec<ParticipationRecord>,
    pub careers: Vec<CareerSummary>,
    pub completed_seasons: Vec<Season>,
    pub ongoing_seasons: Vec<Season>,
}

impl ParticipationHistory {
    /// All records for one manager, oldest season first
    pub fn records_for(&self, manager_name: &str) -> Vec<&ParticipationRecord> {
        let key = manager_key(manager_name);
        self.records.iter().filter(|r| manager_key(&r.manager_name) == key).collect()
    }

    pub fn career(&self, manager_name: &str) -> Option<&CareerSummary> {
        let key = manager_key(manager_name);
        self.careers.iter().find(|c| manager_key(&c.manager_name) == key)
    }
}

/// Classifies each manager's result in each season
#[derive(Debug, Clone, Default)]
pub struct ParticipationClassifier {
    min_completed_weeks_override: Option<u32>,
}

impl ParticipationClassifier {
    pub fn new(config: &HistoryConfig) -> Self {
        Self { min_completed_weeks_override: config.min_completed_weeks_override }
    }

    /// Whether a season counts as completed
    pub fn is_completed(&self, outcome: &SeasonOutcome) -> bool {
        let needed = self.min_completed_weeks_override.unwrap_or(outcome.total_weeks);
        outcome.weeks_scored >= needed
    }

    /// Build history records and career totals.
    ///
    /// Every manager seen in any season gets a record for every season, with
    /// status `None` where they did not take part.
    pub fn classify(&self, seasons: &[SeasonOutcome]) -> ParticipationHistory {
        let mut ordered: Vec<&SeasonOutcome> = seasons.iter().collect();
        ordered.sort_by_key(|s| s.season);

        // Display name per manager: the spelling from the latest season wins
        let mut managers: BTreeMap<String, String> = BTreeMap::new();
        for outcome in &ordered {
            for entrant in &outcome.entrants {
                managers.insert(
                    manager_key(&entrant.manager_name),
                    entrant.manager_name.trim().to_string(),
                );
            }
        }

        let mut history = ParticipationHistory::default();
        let mut careers: BTreeMap<String, CareerSummary> = managers
            .iter()
            .map(|(key, name)| {
                (key.clone(), CareerSummary { manager_name: name.clone(), ..Default::default() })
            })
            .collect();

        for outcome in ordered {
            let completed = self.is_completed(outcome);
            if completed {
                history.completed_seasons.push(outcome.season);
            } else {
                debug!(
                    season = outcome.season,
                    weeks_scored = outcome.weeks_scored,
                    total_weeks = outcome.total_weeks,
                    "Season still ongoing, excluded from career totals"
                );
                history.ongoing_seasons.push(outcome.season);
            }

            let statuses = season_statuses(outcome);

            for (key, name) in &managers {
                let entrant = outcome
                    .entrants
                    .iter()
                    .filter(|e| manager_key(&e.manager_name) == *key)
                    .max_by_key(|e| statuses.get(&e.member_id).map_or(0, |s| s.precedence()));
                let status = entrant
                    .and_then(|e| statuses.get(&e.member_id).copied())
                    .unwrap_or(ParticipationStatus::None);

                if completed {
                    if let Some(career) = careers.get_mut(key) {
                        tally(career, status);
                    }
                }

                history.records.push(ParticipationRecord {
                    manager_name: name.clone(),
                    season: outcome.season,
                    member_id: entrant.map(|e| e.member_id),
                    team_name: entrant.map(|e| e.team_name.clone()),
                    final_rank: entrant.and_then(|e| e.final_rank),
                    status,
                    ongoing: !completed,
                });
            }
        }

        let mut careers: Vec<CareerSummary> = careers.into_values().collect();
        careers.sort_by(|a, b| {
            b.championships
                .cmp(&a.championships)
                .then(b.runner_ups.cmp(&a.runner_ups))
                .then(b.third_places.cmp(&a.third_places))
                .then(b.playoff_appearances.cmp(&a.playoff_appearances))
                .then_with(|| a.manager_name.cmp(&b.manager_name))
        });
        history.careers = careers;

        history
    }
}

/// Status of every entrant in one season
fn season_statuses(outcome: &SeasonOutcome) -> BTreeMap<MemberId, ParticipationStatus> {
    let entrant_ids: HashSet<MemberId> = outcome.entrants.iter().map(|e| e.member_id).collect();
    let playoff: HashSet<MemberId> = outcome.playoff_members.iter().copied().collect();

    let mut statuses: BTreeMap<MemberId, ParticipationStatus> = outcome
        .entrants
        .iter()
        .map(|e| {
            // Seeds from a season with no scores are only store order
            let status = if !e.has_scores {
                ParticipationStatus::None
            } else if playoff.contains(&e.member_id) {
                ParticipationStatus::Playoffs
            } else {
                ParticipationStatus::Participated
            };
            (e.member_id, status)
        })
        .collect();

    if let Some(winners) = &outcome.final_winners {
        for (placement, member_id) in winners.placements() {
            if placement == Placement::Fourth {
                continue;
            }
            if !entrant_ids.contains(&member_id) {
                warn!(
                    season = outcome.season,
                    member_id,
                    "Final placement names an unknown member, skipping"
                );
                continue;
            }
            let status = ParticipationStatus::Winner { place: placement.place() };
            let current = statuses.entry(member_id).or_insert(ParticipationStatus::None);
            if status.precedence() > current.precedence() {
                *current = status;
            }
        }
    }

    statuses
}

fn tally(career: &mut CareerSummary, status: ParticipationStatus) {
    match status {
        ParticipationStatus::Winner { place } => {
            match place {
                1 => career.championships += 1,
                2 => career.runner_ups += 1,
                _ => career.third_places += 1,
            }
            career.seasons_played += 1;
        }
        ParticipationStatus::Playoffs => {
            career.playoff_appearances += 1;
            career.seasons_played += 1;
        }
        ParticipationStatus::Participated => career.seasons_played += 1,
        ParticipationStatus::None => {}
    }
}

fn manager_key(name: &str) -> String {
    name.trim().to_lowercase()
}
