//! League ledger: store-backed standings queries
//!
//! Each query loads one season snapshot from the store and runs the pure
//! pipeline over it. No derived state is cached between queries.

use league_store::{LeagueId, ScoreStore, Season, SeasonSnapshot};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::matchup::MatchupResult;
use crate::participation::{ParticipationClassifier, ParticipationHistory};
use crate::pipeline::SeasonPipeline;
use crate::playoffs::PlayoffSeed;
use crate::types::{SeasonReport, Standing, StandingsView};
use crate::weekly::WeeklyWinner;

/// Standings, payouts and history for the leagues in a store
pub struct LeagueLedger<S: ScoreStore> {
    store: Arc<S>,
    config: EngineConfig,
}

impl<S: ScoreStore> LeagueLedger<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn snapshot(&self, league_id: LeagueId, season: Season) -> Result<SeasonSnapshot> {
        Ok(self.store.load_snapshot(league_id, season).await?)
    }

    /// Full season report: standings, seeds, weekly winners, payouts.
    ///
    /// `admin` unlocks special-prize suggestions.
    pub async fn season_report(
        &self,
        league_id: LeagueId,
        season: Season,
        view: StandingsView,
        admin: bool,
    ) -> Result<SeasonReport> {
        let snapshot = self.snapshot(league_id, season).await?;
        let report = SeasonPipeline::new(&snapshot, &self.config).report(view, admin)?;

        info!(
            league_id,
            season,
            ?view,
            members = report.standings.len(),
            payout = %report.total_payout(),
            "Season report computed"
        );
        Ok(report)
    }

    /// Ranked standings with weekly credit. Works even when the season's
    /// playoff configuration is invalid.
    pub async fn standings(
        &self,
        league_id: LeagueId,
        season: Season,
        view: StandingsView,
    ) -> Result<Vec<Standing>> {
        let snapshot = self.snapshot(league_id, season).await?;
        SeasonPipeline::new(&snapshot, &self.config).standings(view)
    }

    /// Playoff seeds, frozen at the regular-season boundary
    pub async fn playoff_seeds(&self, league_id: LeagueId, season: Season) -> Result<Vec<PlayoffSeed>> {
        let snapshot = self.snapshot(league_id, season).await?;
        SeasonPipeline::new(&snapshot, &self.config).playoff_seeds()
    }

    pub async fn weekly_winners(
        &self,
        league_id: LeagueId,
        season: Season,
        view: StandingsView,
    ) -> Result<Vec<WeeklyWinner>> {
        let snapshot = self.snapshot(league_id, season).await?;
        SeasonPipeline::new(&snapshot, &self.config).weekly_winners(view)
    }

    pub async fn matchup_results(
        &self,
        league_id: LeagueId,
        season: Season,
        view: StandingsView,
    ) -> Result<Vec<MatchupResult>> {
        let snapshot = self.snapshot(league_id, season).await?;
        SeasonPipeline::new(&snapshot, &self.config).matchup_results(view)
    }

    /// Participation history across every season of a league.
    ///
    /// Seasons without a configuration are skipped.
    pub async fn history(&self, league_id: LeagueId) -> Result<ParticipationHistory> {
        let seasons = self.store.list_seasons(league_id).await?;

        let mut outcomes = Vec::with_capacity(seasons.len());
        for season in seasons {
            let snapshot = self.snapshot(league_id, season).await?;
            if snapshot.config.is_none() {
                warn!(league_id, season, "Season not configured, left out of history");
                continue;
            }
            outcomes.push(SeasonPipeline::new(&snapshot, &self.config).outcome()?);
        }

        let history = ParticipationClassifier::new(&self.config.history).classify(&outcomes);
        info!(
            league_id,
            completed = history.completed_seasons.len(),
            ongoing = history.ongoing_seasons.len(),
            managers = history.careers.len(),
            "League history computed"
        );
        Ok(history)
    }
}
