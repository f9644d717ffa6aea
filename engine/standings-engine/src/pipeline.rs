//! Per-season standings pipeline
//!
//! Runs matchup resolution, record aggregation, ranking, seeding, weekly
//! credit and settlement over one immutable snapshot. Nothing here touches
//! the store, so every query is recomputed from the raw rows.

use league_store::{Member, MemberId, SeasonConfig, SeasonSnapshot, Week};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{Result, StandingsError};
use crate::matchup::{MatchupResolver, MatchupResult};
use crate::participation::{SeasonEntrant, SeasonOutcome};
use crate::playoffs::{seed_playoffs, validate_season_config, PlayoffSeed};
use crate::ranking::{apply_final_placements, division_standings, rank, RankedRecord};
use crate::records::RecordAggregator;
use crate::score_index::ScoreIndex;
use crate::settlement::{settle, suggest_prizes};
use crate::types::{SeasonCompletion, SeasonReport, Standing, StandingsView};
use crate::weekly::{weekly_credits, weekly_winners, WeeklyWinner};

/// Derived views over one league season
pub struct SeasonPipeline<'a> {
    snapshot: &'a SeasonSnapshot,
    config: &'a EngineConfig,
    scores: ScoreIndex,
    members: Vec<&'a Member>,
    resolver: MatchupResolver,
}

impl<'a> SeasonPipeline<'a> {
    pub fn new(snapshot: &'a SeasonSnapshot, config: &'a EngineConfig) -> Self {
        Self {
            scores: ScoreIndex::build(&snapshot.scores, &config.scoring),
            members: snapshot.active_members(),
            resolver: MatchupResolver::new(&config.scoring),
            snapshot,
            config,
        }
    }

    /// The season's configuration, without checking its invariants
    pub fn season_config(&self) -> Result<&'a SeasonConfig> {
        self.snapshot.config.as_ref().ok_or(StandingsError::MissingConfig {
            league_id: self.snapshot.league_id,
            season: self.snapshot.season,
        })
    }

    /// Last week included by a view
    pub fn cutoff(&self, view: StandingsView) -> Result<Week> {
        let config = self.season_config()?;
        Ok(match view {
            StandingsView::RegularSeason => config.regular_season_end(),
            StandingsView::Final => config.total_weeks,
        })
    }

    fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|m| m.id).collect()
    }

    /// Algorithmic ranking of active members over weeks `1..=max_week`
    pub fn ranked(&self, max_week: Week) -> Vec<RankedRecord> {
        let aggregator = RecordAggregator::new(self.resolver.clone());
        let records =
            aggregator.aggregate(&self.member_ids(), &self.scores, &self.snapshot.matchups, max_week);
        rank(records)
    }

    /// Ranking for a view. The final view honours admin-entered placements.
    pub fn ranked_for_view(&self, view: StandingsView) -> Result<Vec<RankedRecord>> {
        let ranked = self.ranked(self.cutoff(view)?);
        Ok(match (&self.snapshot.final_winners, view.includes_postseason()) {
            (Some(winners), true) => apply_final_placements(ranked, winners),
            _ => ranked,
        })
    }

    /// Weekly high scorers for a view's weeks
    pub fn weekly_winners(&self, view: StandingsView) -> Result<Vec<WeeklyWinner>> {
        let config = self.season_config()?;
        let eligible: HashSet<MemberId> = self.members.iter().map(|m| m.id).collect();
        Ok(weekly_winners(
            &self.scores,
            &eligible,
            self.cutoff(view)?,
            config.weekly_prize_amount,
            self.config.scoring.scoreless_matchups_pending,
        ))
    }

    /// Ranked standings with weekly credit, without seeds or prize settlement.
    ///
    /// Config invariants are not checked here, so a season with a broken
    /// playoff setup still has a table.
    pub fn standings(&self, view: StandingsView) -> Result<Vec<Standing>> {
        let ranked = self.ranked_for_view(view)?;
        let credits = weekly_credits(&self.weekly_winners(view)?);
        let by_id: HashMap<MemberId, &Member> = self.members.iter().map(|m| (m.id, *m)).collect();

        let standings = ranked
            .iter()
            .filter_map(|r| by_id.get(&r.member_id()).map(|m| Standing::from_ranked(r, m)))
            .map(|mut standing| {
                if let Some(credit) = credits.get(&standing.member_id) {
                    standing.apply_weekly_credit(credit);
                }
                standing.total_winnings = standing.weekly_prize_total;
                standing
            })
            .collect();

        Ok(standings)
    }

    /// Playoff seeds from the regular-season ranking
    pub fn playoff_seeds(&self) -> Result<Vec<PlayoffSeed>> {
        let config = self.season_config()?;
        validate_season_config(config)?;
        let regular = self.ranked(config.regular_season_end());
        seed_playoffs(&regular, &self.members, config)
    }

    /// Matchup outcomes for a view's weeks, in schedule order
    pub fn matchup_results(&self, view: StandingsView) -> Result<Vec<MatchupResult>> {
        Ok(self.resolver.results(&self.snapshot.matchups, &self.scores, self.cutoff(view)?))
    }

    pub fn completion(&self) -> Result<SeasonCompletion> {
        let config = self.season_config()?;
        Ok(SeasonCompletion {
            weeks_scored: self.scores.scored_weeks_through(config.total_weeks).len() as u32,
            total_weeks: config.total_weeks,
        })
    }

    /// Full report for a view. Fails on missing or invalid season config.
    ///
    /// Prize suggestions are only computed for admin callers.
    pub fn report(&self, view: StandingsView, admin: bool) -> Result<SeasonReport> {
        let config = self.season_config()?;
        validate_season_config(config)?;

        let max_week = self.cutoff(view)?;
        let ranked = self.ranked_for_view(view)?;
        let weekly = self.weekly_winners(view)?;
        let seeds = self.playoff_seeds()?;

        let mut standings = self.standings(view)?;
        for seed in &seeds {
            if let Some(standing) = standings.iter_mut().find(|s| s.member_id == seed.member_id) {
                standing.apply_seed(seed);
            }
        }
        settle(&mut standings, self.snapshot.final_winners.as_ref(), &config.prize_structure);

        let suggestions = admin.then(|| {
            suggest_prizes(
                &standings,
                &self.scores,
                max_week,
                &config.prize_structure,
                self.config.scoring.scoreless_matchups_pending,
            )
        });

        debug!(
            league_id = self.snapshot.league_id,
            season = self.snapshot.season,
            ?view,
            members = standings.len(),
            seeds = seeds.len(),
            weekly_winners = weekly.len(),
            "Built season report"
        );

        Ok(SeasonReport {
            league_id: self.snapshot.league_id,
            season: self.snapshot.season,
            view,
            division_standings: division_standings(&ranked, &self.members, &config.divisions),
            matchup_results: self.matchup_results(view)?,
            completion: self.completion()?,
            standings,
            playoff_seeds: seeds,
            weekly_winners: weekly,
            suggestions,
        })
    }

    /// What this season contributes to league history.
    ///
    /// A broken playoff setup only drops the playoff set for this season.
    pub fn outcome(&self) -> Result<SeasonOutcome> {
        let config = self.season_config()?;
        let ranked = self.ranked_for_view(StandingsView::Final)?;
        let by_id: HashMap<MemberId, &Member> = self.members.iter().map(|m| (m.id, *m)).collect();

        let entrants = ranked
            .iter()
            .filter_map(|r| {
                by_id
                    .get(&r.member_id())
                    .map(|m| SeasonEntrant::new(m, Some(r.rank), self.scores.has_scores(m.id)))
            })
            .collect();

        let playoff_members = match self.playoff_seeds() {
            Ok(seeds) => seeds.into_iter().map(|s| s.member_id).collect(),
            Err(e) => {
                warn!(
                    league_id = self.snapshot.league_id,
                    season = self.snapshot.season,
                    error = %e,
                    "Cannot seed playoffs for history"
                );
                Vec::new()
            }
        };

        Ok(SeasonOutcome {
            season: self.snapshot.season,
            total_weeks: config.total_weeks,
            weeks_scored: self.completion()?.weeks_scored,
            entrants,
            playoff_members,
            final_winners: self.snapshot.final_winners.clone(),
        })
    }
}
