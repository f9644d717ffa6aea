//! League Store - league data model and score store collaborator
//!
//! Holds members, weekly scores, matchups, season configuration and manual
//! final results for multi-season fantasy leagues. The standings engine reads
//! from any [`ScoreStore`]; [`InMemoryScoreStore`] is the in-process version
//! with last-write-wins upserts and JSON snapshot loading.

pub mod error;
pub mod memory;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use memory::{InMemoryScoreStore, LeagueData, SeasonWinners};
pub use store::ScoreStore;
pub use types::{
    FinalWinners, LeagueId, Matchup, Member, MemberId, Placement, PrizeStructure, Season,
    SeasonConfig, SeasonSnapshot, SpecialPrize, Week, WeeklyScore,
};
