//! The score store collaborator
//!
//! The standings engine never talks to storage directly. It reads one
//! snapshot per query through this trait and computes everything else.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    FinalWinners, LeagueId, Matchup, Member, Season, SeasonConfig, SeasonSnapshot, WeeklyScore,
};

/// Read side of league storage
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// All members of a league season, including withdrawn ones
    async fn list_members(&self, league_id: LeagueId, season: Season) -> Result<Vec<Member>>;

    /// All weekly score rows of a league season
    async fn list_weekly_scores(
        &self,
        league_id: LeagueId,
        season: Season,
    ) -> Result<Vec<WeeklyScore>>;

    /// All scheduled matchups of a league season
    async fn list_matchups(&self, league_id: LeagueId, season: Season) -> Result<Vec<Matchup>>;

    /// Season configuration, if the season has been configured
    async fn get_season_config(
        &self,
        league_id: LeagueId,
        season: Season,
    ) -> Result<Option<SeasonConfig>>;

    /// Manual final results, if an admin has entered any
    async fn get_final_winners(
        &self,
        league_id: LeagueId,
        season: Season,
    ) -> Result<Option<FinalWinners>>;

    /// Every season the league has run, oldest first
    async fn list_seasons(&self, league_id: LeagueId) -> Result<Vec<Season>>;

    /// Fetch everything for one league season
    async fn load_snapshot(&self, league_id: LeagueId, season: Season) -> Result<SeasonSnapshot> {
        let members = self.list_members(league_id, season).await?;
        let scores = self.list_weekly_scores(league_id, season).await?;
        let matchups = self.list_matchups(league_id, season).await?;
        let config = self.get_season_config(league_id, season).await?;
        let final_winners = self.get_final_winners(league_id, season).await?;

        Ok(SeasonSnapshot { league_id, season, members, scores, matchups, config, final_winners })
    }
}
