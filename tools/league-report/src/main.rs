//! League Report
//!
//! Loads a league data file into the in-memory score store and prints the
//! season table, playoff seeds, weekly winners and payouts, or the league's
//! participation history.

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use league_store::{InMemoryScoreStore, LeagueId, ScoreStore, Season};
use standings_engine::{
    EngineConfig, LeagueLedger, ParticipationHistory, ParticipationStatus, SeasonReport,
    StandingsView,
};

#[derive(Parser)]
#[command(name = "league-report")]
#[command(about = "Standings, playoff seeds, weekly winners and payouts for a fantasy league")]
#[command(version = "0.1.0")]
struct Cli {
    /// League data file (JSON)
    #[arg(short, long)]
    data: PathBuf,

    /// League id
    #[arg(short, long, default_value = "1")]
    league: LeagueId,

    /// Season to report. Defaults to the latest season in the file.
    #[arg(short, long)]
    season: Option<Season>,

    /// Which weeks to include
    #[arg(long, value_enum, default_value = "regular")]
    view: ViewArg,

    /// Show special-prize suggestions
    #[arg(long)]
    admin: bool,

    /// Print participation history instead of a season report
    #[arg(long)]
    history: bool,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Engine configuration file (TOML). Environment overrides apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format: pretty, json or compact
    #[arg(long, default_value = "compact")]
    log_format: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Regular,
    Final,
}

impl From<ViewArg> for StandingsView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Regular => StandingsView::RegularSeason,
            ViewArg::Final => StandingsView::Final,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize_logging(&cli.log_level, &cli.log_format)?;

    let config = load_config(cli.config.as_ref()).await?;
    debug!(?config, "Engine configuration loaded");

    let store = InMemoryScoreStore::load_from_file(&cli.data)
        .await
        .with_context(|| format!("Failed to load league data from {}", cli.data.display()))?;
    let ledger = LeagueLedger::new(Arc::new(store), config);

    if cli.history {
        let history = ledger.history(cli.league).await?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&history)?);
        } else {
            print_history(&history);
        }
        return Ok(());
    }

    let season = match cli.season {
        Some(season) => season,
        None => latest_season(ledger.store().as_ref(), cli.league).await?,
    };
    info!(league_id = cli.league, season, "Building season report");

    let report = ledger.season_report(cli.league, season, cli.view.into(), cli.admin).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, ledger.config().report.money_decimal_places);
    }

    Ok(())
}

async fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            Ok(EngineConfig::from_toml_str(&content)?)
        }
        None => Ok(EngineConfig::from_env()?),
    }
}

async fn latest_season(store: &InMemoryScoreStore, league_id: LeagueId) -> Result<Season> {
    store
        .list_seasons(league_id)
        .await?
        .last()
        .copied()
        .with_context(|| format!("League {league_id} has no seasons"))
}

fn money(amount: Decimal, dp: u32) -> String {
    format!("${:.*}", dp as usize, amount.round_dp(dp))
}

fn print_report(report: &SeasonReport, dp: u32) {
    let view = match report.view {
        StandingsView::RegularSeason => "regular season",
        StandingsView::Final => "final",
    };
    let progress = if report.completion.is_complete() {
        "complete".green()
    } else {
        format!("{}/{} weeks", report.completion.weeks_scored, report.completion.total_weeks).yellow()
    };

    println!(
        "{} {} ({}, {})",
        "Season".bold(),
        report.season.to_string().bold(),
        view,
        progress
    );
    println!();

    println!(
        "{:>4}  {:<24} {:<20} {:>8} {:>9} {:>9} {:>6} {:>5} {:>10}",
        "Rank", "Team", "Manager", "Record", "PF", "PA", "WkW", "Seed", "Winnings"
    );
    for s in &report.standings {
        let seed = match (s.playoff_seed, s.is_division_winner) {
            (Some(seed), true) => format!("{seed}*"),
            (Some(seed), false) => seed.to_string(),
            (None, _) => "-".to_string(),
        };
        let line = format!(
            "{:>4}  {:<24} {:<20} {:>8} {:>9} {:>9} {:>6.2} {:>5} {:>10}",
            s.rank,
            s.team_name,
            s.manager_name,
            s.record_line(),
            s.points_for,
            s.points_against,
            s.weekly_wins,
            seed,
            money(s.total_winnings, dp)
        );
        if s.placement.is_some() {
            println!("{}", line.bold());
        } else {
            println!("{line}");
        }
    }

    if !report.division_standings.is_empty() {
        println!();
        println!("{}", "Divisions".bold());
        for division in &report.division_standings {
            let teams: Vec<String> = division
                .member_ids
                .iter()
                .filter_map(|id| report.standing(*id))
                .map(|s| s.team_name.clone())
                .collect();
            println!("  {:<16} {}", division.division, teams.join(", "));
        }
    }

    println!();
    println!("{}", "Weekly high scores".bold());
    for winner in &report.weekly_winners {
        let team = report.standing(winner.member_id).map_or("?", |s| s.team_name.as_str());
        let shared = if winner.co_winners > 1 {
            format!(" (shared {} ways)", winner.co_winners)
        } else {
            String::new()
        };
        println!(
            "  Week {:>2}  {:<24} {:>8}  {}{}",
            winner.week,
            team,
            winner.points,
            money(winner.prize, dp),
            shared
        );
    }

    let payouts: Vec<_> =
        report.standings.iter().filter(|s| !s.total_winnings.is_zero()).collect();
    if !payouts.is_empty() {
        println!();
        println!("{}", "Payouts".bold());
        for s in payouts {
            let mut parts = vec![format!("weekly {}", money(s.weekly_prize_total, dp))];
            if let Some(placement) = s.placement {
                parts.push(format!("place {} {}", placement.place(), money(s.placement_prize, dp)));
            }
            for (category, amount) in &s.special_prizes {
                parts.push(format!("{category:?} {}", money(*amount, dp)));
            }
            println!("  {:<24} {:>10}  {}", s.team_name, money(s.total_winnings, dp), parts.join(", "));
        }
        println!("  {:<24} {:>10}", "Total".bold(), money(report.total_payout(), dp));
    }

    if let Some(suggestions) = &report.suggestions {
        let team = |id| report.standing(id).map_or("?".to_string(), |s| s.team_name.clone());
        println!();
        println!("{}", "Prize suggestions (not binding)".bold());
        if let Some(leader) = &suggestions.highest_points {
            println!("  Highest points: {} ({})", team(leader.member_id), leader.points);
        }
        if let Some(high) = &suggestions.highest_weekly {
            println!("  Highest week:   {} ({} in week {})", team(high.member_id), high.points, high.week);
        }
        if let Some(low) = &suggestions.lowest_weekly {
            println!("  Lowest week:    {} ({} in week {})", team(low.member_id), low.points, low.week);
        }
    }
}

fn print_history(history: &ParticipationHistory) {
    println!("{}", "Careers (completed seasons)".bold());
    println!(
        "  {:<20} {:>7} {:>7} {:>7} {:>9} {:>8}",
        "Manager", "Titles", "2nd", "3rd", "Playoffs", "Seasons"
    );
    for career in &history.careers {
        println!(
            "  {:<20} {:>7} {:>7} {:>7} {:>9} {:>8}",
            career.manager_name,
            career.championships,
            career.runner_ups,
            career.third_places,
            career.playoff_appearances,
            career.seasons_played
        );
    }

    println!();
    println!("{}", "Seasons".bold());
    for career in &history.careers {
        let cells: Vec<String> = history
            .records_for(&career.manager_name)
            .iter()
            .map(|record| {
                let status = match record.status {
                    ParticipationStatus::Winner { place } => format!("#{place}"),
                    ParticipationStatus::Playoffs => "P".to_string(),
                    ParticipationStatus::Participated => "x".to_string(),
                    ParticipationStatus::None => "-".to_string(),
                };
                let marker = if record.ongoing { "~" } else { "" };
                format!("{}:{}{}", record.season, status, marker)
            })
            .collect();
        println!("  {:<20} {}", career.manager_name, cells.join("  "));
    }

    if !history.ongoing_seasons.is_empty() {
        println!();
        println!("  ~ ongoing, not counted: {:?}", history.ongoing_seasons);
    }
}
