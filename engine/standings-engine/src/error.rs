//! Error types for the standings engine

use league_store::{LeagueId, Season, StoreError};
use thiserror::Error;

/// Result type for standings engine operations
pub type Result<T> = std::result::Result<T, StandingsError>;

/// Errors that can occur computing standings and payouts
#[derive(Error, Debug)]
pub enum StandingsError {
    #[error("Season not configured: league {league_id}, season {season}")]
    MissingConfig { league_id: LeagueId, season: Season },

    #[error("Invalid season configuration: {0}")]
    ConfigInvariantViolation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
