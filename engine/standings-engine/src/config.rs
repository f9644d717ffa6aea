//! Configuration for the standings engine

use serde::{Deserialize, Serialize};

use crate::error::{Result, StandingsError};

/// Configuration for the standings engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How raw score rows are interpreted
    pub scoring: ScoringConfig,

    /// Cross-season history rules
    pub history: HistoryConfig,

    /// Report rendering
    pub report: ReportConfig,
}

/// Score interpretation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Treat a matchup where both sides scored exactly zero as not yet played.
    ///
    /// Also skips weeks whose top score is zero, both for weekly high-score
    /// credit and for admin prize suggestions.
    pub scoreless_matchups_pending: bool,

    /// Honour the `played` flag on score rows. When false every row counts as played.
    pub require_played_flag: bool,
}

/// Cross-season history rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Scored weeks needed for a season to count as completed. Defaults to the season's total weeks.
    pub min_completed_weeks_override: Option<u32>,
}

/// Report rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places used when displaying money. Computation is never rounded.
    pub money_decimal_places: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { scoreless_matchups_pending: true, require_played_flag: true }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { money_decimal_places: 2 }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("LEDGER_SCORELESS_PENDING") {
            config.scoring.scoreless_matchups_pending = parse_env("LEDGER_SCORELESS_PENDING", &value)?;
        }

        if let Ok(value) = std::env::var("LEDGER_REQUIRE_PLAYED_FLAG") {
            config.scoring.require_played_flag = parse_env("LEDGER_REQUIRE_PLAYED_FLAG", &value)?;
        }

        if let Ok(value) = std::env::var("LEDGER_COMPLETED_WEEKS") {
            config.history.min_completed_weeks_override =
                Some(parse_env("LEDGER_COMPLETED_WEEKS", &value)?);
        }

        if let Ok(value) = std::env::var("LEDGER_MONEY_DP") {
            config.report.money_decimal_places = parse_env("LEDGER_MONEY_DP", &value)?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML. Missing sections and keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| StandingsError::Configuration(format!("Invalid engine config: {e}")))
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| StandingsError::Configuration(format!("Invalid {name}: {value}")))
}
