//! # Standings Engine
//!
//! Derives standings, playoff seeds, weekly high-score credits, prize payouts
//! and cross-season participation history from raw league data.
//!
//! Nothing derived is ever stored. Matchup outcomes come from the two sides'
//! weekly scores at read time, and every query rebuilds its results from one
//! snapshot of the [`league_store::ScoreStore`].

pub mod config;
pub mod error;
pub mod ledger;
pub mod matchup;
pub mod participation;
pub mod pipeline;
pub mod playoffs;
pub mod ranking;
pub mod records;
pub mod score_index;
pub mod settlement;
pub mod types;
pub mod weekly;

#[cfg(test)]
mod integration_tests;

pub use config::{EngineConfig, HistoryConfig, ReportConfig, ScoringConfig};
pub use error::{Result, StandingsError};
pub use ledger::LeagueLedger;
pub use matchup::{MatchupOutcome, MatchupResolver, MatchupResult};
pub use participation::{
    CareerSummary, ParticipationClassifier, ParticipationHistory, ParticipationRecord,
    ParticipationStatus, SeasonEntrant, SeasonOutcome,
};
pub use pipeline::SeasonPipeline;
pub use playoffs::{seed_playoffs, validate_season_config, PlayoffSeed};
pub use ranking::{apply_final_placements, rank, DivisionStanding, RankedRecord};
pub use records::{RecordAggregator, TeamRecord};
pub use score_index::ScoreIndex;
pub use settlement::{settle, suggest_prizes, PointsLeader, PrizeSuggestions, WeeklyExtreme};
pub use types::{SeasonCompletion, SeasonReport, Standing, StandingsView};
pub use weekly::{weekly_credits, weekly_winners, WeeklyCredit, WeeklyWinner};

/// Current version of the standings engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
