//! In-memory score store with last-write-wins upserts

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::store::ScoreStore;
use crate::types::{
    FinalWinners, LeagueId, Matchup, Member, MemberId, Season, SeasonConfig, Week, WeeklyScore,
};

type SeasonKey = (LeagueId, Season);

/// Serialized form of a league's data, used to seed a store from JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueData {
    pub league_id: LeagueId,
    #[serde(default)]
    pub seasons: Vec<SeasonConfig>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub scores: Vec<WeeklyScore>,
    #[serde(default)]
    pub matchups: Vec<Matchup>,
    #[serde(default)]
    pub final_winners: Vec<SeasonWinners>,
}

/// Final winners entry keyed by season
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonWinners {
    pub season: Season,
    pub winners: FinalWinners,
}

#[derive(Debug, Default)]
struct Tables {
    /// Members per league season, in insertion order
    members: HashMap<SeasonKey, Vec<Member>>,

    /// Scores per league season keyed by (member, week)
    scores: HashMap<SeasonKey, BTreeMap<(MemberId, Week), WeeklyScore>>,

    matchups: HashMap<SeasonKey, Vec<Matchup>>,
    configs: HashMap<SeasonKey, SeasonConfig>,
    final_winners: HashMap<SeasonKey, FinalWinners>,
}

impl Tables {
    fn member_exists(&self, key: SeasonKey, member_id: MemberId) -> bool {
        self.members.get(&key).is_some_and(|members| members.iter().any(|m| m.id == member_id))
    }
}

/// Score store kept entirely in process memory
#[derive(Debug, Default)]
pub struct InMemoryScoreStore {
    tables: RwLock<Tables>,
}

impl InMemoryScoreStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from serialized league data
    pub fn from_data(data: LeagueData) -> Result<Self> {
        let store = Self::new();
        let league_id = data.league_id;

        for config in data.seasons {
            if config.league_id != league_id {
                return Err(StoreError::SeasonMismatch {
                    league_id,
                    season: config.season,
                    reason: format!("season config belongs to league {}", config.league_id),
                });
            }
            store.put_season_config(config);
        }
        for member in data.members {
            if member.league_id != league_id {
                return Err(StoreError::SeasonMismatch {
                    league_id,
                    season: member.season,
                    reason: format!("member {} belongs to league {}", member.id, member.league_id),
                });
            }
            store.add_member(member);
        }
        for score in data.scores {
            store.upsert_score(league_id, score)?;
        }
        for matchup in data.matchups {
            store.add_matchup(league_id, matchup)?;
        }
        for entry in data.final_winners {
            store.set_final_winners(league_id, entry.season, entry.winners);
        }

        Ok(store)
    }

    /// Parse league data from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let data: LeagueData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Load league data from a JSON file
    pub async fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        info!("Loading league data from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let store = Self::from_json_str(&json_content)?;

        info!("Loaded league data for {} seasons", store.tables.read().configs.len());
        Ok(store)
    }

    /// Insert a member, replacing any existing member with the same id in that season
    pub fn add_member(&self, member: Member) {
        let mut tables = self.tables.write();
        let members = tables.members.entry((member.league_id, member.season)).or_default();

        match members.iter_mut().find(|m| m.id == member.id) {
            Some(existing) => *existing = member,
            None => members.push(member),
        }
    }

    /// Logically remove a member. The member row and its scores are kept.
    pub fn withdraw_member(
        &self,
        league_id: LeagueId,
        season: Season,
        member_id: MemberId,
    ) -> Result<()> {
        let mut tables = self.tables.write();
        let member = tables
            .members
            .get_mut(&(league_id, season))
            .and_then(|members| members.iter_mut().find(|m| m.id == member_id))
            .ok_or(StoreError::MemberNotFound(member_id))?;

        member.active = false;
        debug!(league_id, season, member_id, "Member withdrawn");
        Ok(())
    }

    /// Insert or replace a weekly score. At most one row exists per (member, week, season).
    pub fn upsert_score(&self, league_id: LeagueId, score: WeeklyScore) -> Result<()> {
        if score.week == 0 {
            return Err(StoreError::InvalidScore {
                member_id: score.member_id,
                week: score.week,
                reason: "week numbers start at 1".to_string(),
            });
        }
        if score.points < Decimal::ZERO {
            return Err(StoreError::InvalidScore {
                member_id: score.member_id,
                week: score.week,
                reason: format!("points must not be negative, got {}", score.points),
            });
        }

        let mut tables = self.tables.write();
        let key = (league_id, score.season);
        if !tables.member_exists(key, score.member_id) {
            return Err(StoreError::MemberNotFound(score.member_id));
        }

        tables.scores.entry(key).or_default().insert((score.member_id, score.week), score);
        Ok(())
    }

    /// Schedule a matchup
    pub fn add_matchup(&self, league_id: LeagueId, matchup: Matchup) -> Result<()> {
        if matchup.team1 == matchup.team2 {
            return Err(StoreError::InvalidMatchup {
                week: matchup.week,
                member_id: matchup.team1,
            });
        }

        let mut tables = self.tables.write();
        let key = (league_id, matchup.season);
        for member_id in [matchup.team1, matchup.team2] {
            if !tables.member_exists(key, member_id) {
                return Err(StoreError::MemberNotFound(member_id));
            }
        }

        tables.matchups.entry(key).or_default().push(matchup);
        Ok(())
    }

    /// Insert or replace a season's configuration
    pub fn put_season_config(&self, config: SeasonConfig) {
        let mut tables = self.tables.write();
        tables.configs.insert((config.league_id, config.season), config);
    }

    /// Admin write path: record the final results of a season
    pub fn set_final_winners(&self, league_id: LeagueId, season: Season, winners: FinalWinners) {
        let mut tables = self.tables.write();
        tables.final_winners.insert((league_id, season), winners);
        info!(league_id, season, "Final winners updated");
    }

    /// Clear the final results of a season
    pub fn clear_final_winners(&self, league_id: LeagueId, season: Season) {
        self.tables.write().final_winners.remove(&(league_id, season));
    }
}

#[async_trait]
impl ScoreStore for InMemoryScoreStore {
    async fn list_members(&self, league_id: LeagueId, season: Season) -> Result<Vec<Member>> {
        let tables = self.tables.read();
        Ok(tables.members.get(&(league_id, season)).cloned().unwrap_or_default())
    }

    async fn list_weekly_scores(
        &self,
        league_id: LeagueId,
        season: Season,
    ) -> Result<Vec<WeeklyScore>> {
        let tables = self.tables.read();
        Ok(tables
            .scores
            .get(&(league_id, season))
            .map(|scores| scores.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn list_matchups(&self, league_id: LeagueId, season: Season) -> Result<Vec<Matchup>> {
        let tables = self.tables.read();
        Ok(tables.matchups.get(&(league_id, season)).cloned().unwrap_or_default())
    }

    async fn get_season_config(
        &self,
        league_id: LeagueId,
        season: Season,
    ) -> Result<Option<SeasonConfig>> {
        Ok(self.tables.read().configs.get(&(league_id, season)).cloned())
    }

    async fn get_final_winners(
        &self,
        league_id: LeagueId,
        season: Season,
    ) -> Result<Option<FinalWinners>> {
        Ok(self.tables.read().final_winners.get(&(league_id, season)).cloned())
    }

    async fn list_seasons(&self, league_id: LeagueId) -> Result<Vec<Season>> {
        let tables = self.tables.read();
        let seasons: BTreeSet<Season> = tables
            .configs
            .keys()
            .chain(tables.members.keys())
            .filter(|(league, _)| *league == league_id)
            .map(|(_, season)| *season)
            .collect();

        Ok(seasons.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_members() -> InMemoryScoreStore {
        let store = InMemoryScoreStore::new();
        store.add_member(Member::new(1, 7, 2024, "Alex", "Sack Lunch"));
        store.add_member(Member::new(2, 7, 2024, "Blair", "Bye Week Heroes"));
        store
    }

    #[tokio::test]
    async fn test_score_upsert_last_write_wins() {
        let store = store_with_members();

        store.upsert_score(7, WeeklyScore::new(1, 2024, 1, Decimal::from(90))).unwrap();
        store.upsert_score(7, WeeklyScore::new(1, 2024, 1, Decimal::from(104))).unwrap();

        let scores = store.list_weekly_scores(7, 2024).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].points, Decimal::from(104));
    }

    #[test]
    fn test_rejects_invalid_rows() {
        let store = store_with_members();

        let negative = WeeklyScore::new(1, 2024, 1, Decimal::from(-3));
        assert!(matches!(store.upsert_score(7, negative), Err(StoreError::InvalidScore { .. })));

        let week_zero = WeeklyScore::new(1, 2024, 0, Decimal::from(3));
        assert!(matches!(store.upsert_score(7, week_zero), Err(StoreError::InvalidScore { .. })));

        let unknown = WeeklyScore::new(9, 2024, 1, Decimal::from(3));
        assert!(matches!(store.upsert_score(7, unknown), Err(StoreError::MemberNotFound(9))));

        let self_match = Matchup::new(2024, 1, 1, 1);
        assert!(matches!(store.add_matchup(7, self_match), Err(StoreError::InvalidMatchup { .. })));
    }

    #[tokio::test]
    async fn test_withdraw_keeps_member_row() {
        let store = store_with_members();
        store.withdraw_member(7, 2024, 2).unwrap();

        let members = store.list_members(7, 2024).await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(!members[1].active);
        assert!(store.withdraw_member(7, 2024, 42).is_err());
    }

    #[tokio::test]
    async fn test_load_snapshot_from_json() {
        let json = r#"{
            "league_id": 7,
            "seasons": [{
                "league_id": 7, "season": 2024, "total_weeks": 17,
                "playoff_start_week": 15, "playoff_spots": 4,
                "weekly_prize_amount": 20,
                "prize_structure": {"first": 400}
            }],
            "members": [
                {"id": 1, "league_id": 7, "season": 2024, "manager_name": "Alex", "team_name": "A"},
                {"id": 2, "league_id": 7, "season": 2024, "manager_name": "Blair", "team_name": "B"}
            ],
            "scores": [{"member_id": 1, "season": 2024, "week": 1, "points": 88.5}],
            "matchups": [{"season": 2024, "week": 1, "team1": 1, "team2": 2}],
            "final_winners": [{"season": 2024, "winners": {"first": 2}}]
        }"#;

        let store = InMemoryScoreStore::from_json_str(json).unwrap();
        let snapshot = store.load_snapshot(7, 2024).await.unwrap();

        assert_eq!(snapshot.members.len(), 2);
        assert_eq!(snapshot.scores.len(), 1);
        assert_eq!(snapshot.matchups.len(), 1);
        assert_eq!(snapshot.config.unwrap().prize_structure.first, Decimal::from(400));
        assert_eq!(snapshot.final_winners.unwrap().first, Some(2));
        assert_eq!(store.list_seasons(7).await.unwrap(), vec![2024]);
    }

    #[test]
    fn test_rejects_records_from_another_league() {
        let json = r#"{
            "league_id": 7,
            "members": [
                {"id": 1, "league_id": 7, "season": 2024, "manager_name": "Alex", "team_name": "Sack Lunch"},
                {"id": 2, "league_id": 8, "season": 2024, "manager_name": "Blair", "team_name": "Bye Week Heroes"}
            ]
        }"#;

        let err = InMemoryScoreStore::from_json_str(json).unwrap_err();
        assert!(matches!(err, StoreError::SeasonMismatch { league_id: 7, season: 2024, .. }));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("league.json");
        std::fs::write(&path, r#"{"league_id": 3, "members": []}"#).unwrap();

        let store = InMemoryScoreStore::load_from_file(&path).await.unwrap();
        assert!(store.list_seasons(3).await.unwrap().is_empty());
    }
}
