//! Error types for the league store

use thiserror::Error;

use crate::types::{LeagueId, MemberId, Season, Week};

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur reading or writing league data
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid matchup in week {week}: member {member_id} cannot play itself")]
    InvalidMatchup { week: Week, member_id: MemberId },

    #[error("Invalid score for member {member_id} in week {week}: {reason}")]
    InvalidScore { member_id: MemberId, week: Week, reason: String },

    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Season {season} of league {league_id} does not match the record: {reason}")]
    SeasonMismatch { league_id: LeagueId, season: Season, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
