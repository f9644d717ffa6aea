//! Integration tests for LeagueLedger over the in-memory score store
//! These run the whole pipeline from stored rows to season reports and history

use std::sync::Arc;

use league_store::{
    FinalWinners, InMemoryScoreStore, Matchup, Member, MemberId, PrizeStructure, Season,
    SeasonConfig, Week, WeeklyScore,
};
use rust_decimal::Decimal;

use crate::{
    EngineConfig, LeagueLedger, ParticipationStatus, StandingsError, StandingsView,
};

const LEAGUE: i64 = 1;

fn season_config(season: Season, playoff_spots: u32) -> SeasonConfig {
    SeasonConfig {
        league_id: LEAGUE,
        season,
        total_weeks: 4,
        playoff_start_week: 4,
        playoff_spots,
        weekly_prize_amount: Decimal::from(10),
        prize_structure: PrizeStructure {
            first: Decimal::from(500),
            second: Decimal::from(250),
            third: Decimal::from(100),
            fourth: Decimal::from(50),
            highest_points: Decimal::from(75),
            highest_weekly: Decimal::from(25),
            lowest_weekly: Decimal::ZERO,
        },
        divisions: Vec::new(),
    }
}

/// Six members over three regular weeks and one playoff week.
///
/// Member i scores 200 - 10i in every regular week, so member 1 wins every
/// regular-season game. Week 4 reshuffles the full-season table.
fn create_season_store() -> InMemoryScoreStore {
    let store = InMemoryScoreStore::new();
    store.put_season_config(season_config(2024, 4));

    for i in 1..=6 {
        store.add_member(Member::new(i, LEAGUE, 2024, format!("Manager {i}"), format!("Team {i}")));
    }

    let schedule: [(Week, MemberId, MemberId); 12] = [
        (1, 1, 2), (1, 3, 4), (1, 5, 6),
        (2, 1, 3), (2, 2, 5), (2, 4, 6),
        (3, 1, 4), (3, 2, 6), (3, 3, 5),
        (4, 1, 2), (4, 3, 4), (4, 5, 6),
    ];
    for (week, team1, team2) in schedule {
        store.add_matchup(LEAGUE, Matchup::new(2024, week, team1, team2)).unwrap();
    }

    for week in 1..=3 {
        for i in 1..=6i64 {
            let points = Decimal::from(200 - 10 * i);
            store.upsert_score(LEAGUE, WeeklyScore::new(i, 2024, week, points)).unwrap();
        }
    }
    for (i, points) in [(1, 150i64), (2, 140), (3, 170), (4, 400), (5, 100), (6, 500)] {
        store.upsert_score(LEAGUE, WeeklyScore::new(i, 2024, 4, Decimal::from(points))).unwrap();
    }

    store
}

fn create_ledger(store: InMemoryScoreStore) -> LeagueLedger<InMemoryScoreStore> {
    LeagueLedger::new(Arc::new(store), EngineConfig::default())
}

fn order(ids: impl Iterator<Item = MemberId>) -> Vec<MemberId> {
    ids.collect()
}

#[tokio::test]
async fn test_regular_and_final_tables() {
    let ledger = create_ledger(create_season_store());

    let regular = ledger.standings(LEAGUE, 2024, StandingsView::RegularSeason).await.unwrap();
    assert_eq!(order(regular.iter().map(|s| s.member_id)), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(regular[0].record_line(), "3-0");
    assert_eq!(regular[0].weekly_wins, 3.0);

    // Week 4 lifts member 4 and member 6 by points within their win groups
    let full = ledger.standings(LEAGUE, 2024, StandingsView::Final).await.unwrap();
    assert_eq!(order(full.iter().map(|s| s.member_id)), vec![1, 4, 2, 3, 6, 5]);
    assert_eq!(full.iter().map(|s| s.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6]);

    let total_wins: u32 = full.iter().map(|s| s.wins).sum();
    let total_losses: u32 = full.iter().map(|s| s.losses).sum();
    assert_eq!(total_wins, 12);
    assert_eq!(total_losses, 12);
}

#[tokio::test]
async fn test_final_winner_override_moves_member_to_front() {
    let store = create_season_store();
    store.set_final_winners(LEAGUE, 2024, FinalWinners { first: Some(3), ..Default::default() });
    let ledger = create_ledger(store);

    let report = ledger.season_report(LEAGUE, 2024, StandingsView::Final, false).await.unwrap();

    assert_eq!(order(report.standings.iter().map(|s| s.member_id)), vec![3, 1, 4, 2, 6, 5]);
    let champion = report.standing(3).unwrap();
    assert_eq!(champion.rank, 1);
    assert_eq!(champion.placement_prize, Decimal::from(500));
    assert_eq!(champion.total_winnings, Decimal::from(500));

    let m1 = report.standing(1).unwrap();
    assert_eq!(m1.rank, 2);
    assert_eq!(m1.total_winnings, Decimal::from(30));

    // The regular-season view keeps the algorithmic order but still pays the placement
    let regular = ledger.season_report(LEAGUE, 2024, StandingsView::RegularSeason, false).await.unwrap();
    assert_eq!(regular.standings[0].member_id, 1);
    assert_eq!(regular.standing(3).unwrap().placement_prize, Decimal::from(500));
}

#[tokio::test]
async fn test_postseason_toggle_never_changes_seeds() {
    let ledger = create_ledger(create_season_store());

    let regular = ledger.season_report(LEAGUE, 2024, StandingsView::RegularSeason, false).await.unwrap();
    let full = ledger.season_report(LEAGUE, 2024, StandingsView::Final, false).await.unwrap();

    assert_eq!(regular.playoff_seeds, full.playoff_seeds);
    assert_eq!(order(full.playoff_seeds.iter().map(|s| s.member_id)), vec![1, 2, 3, 4]);
    assert_eq!(full.standing(4).unwrap().playoff_seed, Some(4));
    assert_eq!(full.standing(6).unwrap().playoff_seed, None);

    let seeds = ledger.playoff_seeds(LEAGUE, 2024).await.unwrap();
    assert_eq!(seeds, full.playoff_seeds);
}

#[tokio::test]
async fn test_weekly_credit_follows_view() {
    let ledger = create_ledger(create_season_store());

    let regular = ledger.weekly_winners(LEAGUE, 2024, StandingsView::RegularSeason).await.unwrap();
    assert_eq!(regular.len(), 3);
    assert!(regular.iter().all(|w| w.member_id == 1));

    let report = ledger.season_report(LEAGUE, 2024, StandingsView::Final, false).await.unwrap();
    assert_eq!(report.weekly_winners.len(), 4);
    let m6 = report.standing(6).unwrap();
    assert_eq!(m6.weeks_won.iter().copied().collect::<Vec<_>>(), vec![4]);
    assert_eq!(m6.weekly_prize_total, Decimal::from(10));
    assert_eq!(report.total_payout(), Decimal::from(40));
}

#[tokio::test]
async fn test_prize_suggestions_are_admin_only() {
    let ledger = create_ledger(create_season_store());

    let public = ledger.season_report(LEAGUE, 2024, StandingsView::Final, false).await.unwrap();
    assert!(public.suggestions.is_none());

    let admin = ledger.season_report(LEAGUE, 2024, StandingsView::Final, true).await.unwrap();
    let suggestions = admin.suggestions.unwrap();
    assert_eq!(suggestions.highest_points.unwrap().member_id, 6);
    let high = suggestions.highest_weekly.unwrap();
    assert_eq!((high.member_id, high.week), (6, 4));
    assert!(suggestions.lowest_weekly.is_none());

    // Suggestions never pay anyone
    assert!(admin.standings.iter().all(|s| s.special_prizes.is_empty()));
}

#[tokio::test]
async fn test_withdrawn_member_placement_is_skipped() {
    let store = create_season_store();
    store.set_final_winners(
        LEAGUE,
        2024,
        FinalWinners { first: Some(2), second: Some(3), ..Default::default() },
    );
    store.withdraw_member(LEAGUE, 2024, 2).unwrap();
    let ledger = create_ledger(store);

    let report = ledger.season_report(LEAGUE, 2024, StandingsView::Final, false).await.unwrap();

    assert_eq!(report.standings.len(), 5);
    assert!(report.standing(2).is_none());
    assert_eq!(report.standings[0].member_id, 3);
    assert_eq!(report.standings[0].placement_prize, Decimal::from(250));
    assert!(report.standings.iter().all(|s| s.placement_prize != Decimal::from(500)));
}

#[tokio::test]
async fn test_missing_config_is_reported() {
    let store = create_season_store();
    store.add_member(Member::new(21, LEAGUE, 2023, "Manager 1", "Old Team"));
    let ledger = create_ledger(store);

    let result = ledger.season_report(LEAGUE, 2023, StandingsView::Final, false).await;
    assert!(matches!(
        result,
        Err(StandingsError::MissingConfig { league_id: LEAGUE, season: 2023 })
    ));

    let result = ledger.standings(LEAGUE, 2023, StandingsView::RegularSeason).await;
    assert!(matches!(result, Err(StandingsError::MissingConfig { .. })));
}

#[tokio::test]
async fn test_invalid_config_still_ranks() {
    let store = create_season_store();
    store.put_season_config(season_config(2024, 0));
    let ledger = create_ledger(store);

    let report = ledger.season_report(LEAGUE, 2024, StandingsView::Final, false).await;
    assert!(matches!(report, Err(StandingsError::ConfigInvariantViolation(_))));

    let seeds = ledger.playoff_seeds(LEAGUE, 2024).await;
    assert!(matches!(seeds, Err(StandingsError::ConfigInvariantViolation(_))));

    let standings = ledger.standings(LEAGUE, 2024, StandingsView::Final).await.unwrap();
    assert_eq!(standings.len(), 6);
}

#[tokio::test]
async fn test_score_corrections_show_up_immediately() {
    let store = Arc::new(create_season_store());
    let ledger = LeagueLedger::new(store.clone(), EngineConfig::default());

    let before = ledger.standings(LEAGUE, 2024, StandingsView::RegularSeason).await.unwrap();
    assert_eq!(before[0].weekly_wins, 3.0);

    store.upsert_score(LEAGUE, WeeklyScore::new(6, 2024, 1, Decimal::from(300))).unwrap();

    let after = ledger.standings(LEAGUE, 2024, StandingsView::RegularSeason).await.unwrap();
    assert_eq!(after[0].member_id, 1);
    assert_eq!(after[0].weekly_wins, 2.0);
    let m6 = after.iter().find(|s| s.member_id == 6).unwrap();
    assert_eq!(m6.record_line(), "1-2");
    assert_eq!(m6.weekly_wins, 1.0);
}

#[tokio::test]
async fn test_history_marks_ongoing_seasons() {
    let store = create_season_store();
    store.set_final_winners(
        LEAGUE,
        2024,
        FinalWinners { first: Some(3), second: Some(1), third: Some(4), ..Default::default() },
    );

    // An unconfigured season is left out of history entirely
    store.add_member(Member::new(21, LEAGUE, 2023, "Someone Else", "Ghosts"));

    store.put_season_config(season_config(2025, 2));
    store.add_member(Member::new(31, LEAGUE, 2025, "manager 3 ", "Team Three"));
    store.add_member(Member::new(32, LEAGUE, 2025, "Manager 1", "Team One"));
    store.add_matchup(LEAGUE, Matchup::new(2025, 1, 31, 32)).unwrap();
    store.upsert_score(LEAGUE, WeeklyScore::new(31, 2025, 1, Decimal::from(120))).unwrap();
    store.upsert_score(LEAGUE, WeeklyScore::new(32, 2025, 1, Decimal::from(80))).unwrap();

    let ledger = create_ledger(store);
    let history = ledger.history(LEAGUE).await.unwrap();

    assert_eq!(history.completed_seasons, vec![2024]);
    assert_eq!(history.ongoing_seasons, vec![2025]);
    assert!(history.records_for("Someone Else").is_empty());

    let records = history.records_for("Manager 3");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].status, ParticipationStatus::Winner { place: 1 });
    assert!(records[1].ongoing);
    assert_eq!(records[1].member_id, Some(31));

    let career = history.career("Manager 3").unwrap();
    assert_eq!(career.championships, 1);
    assert_eq!(career.seasons_played, 1);

    let m2 = history.records_for("Manager 2");
    assert_eq!(m2[0].status, ParticipationStatus::Playoffs);
    assert_eq!(m2[1].status, ParticipationStatus::None);

    let m5 = history.career("Manager 5").unwrap();
    assert_eq!(m5.playoff_appearances, 0);
    assert_eq!(m5.seasons_played, 1);
    assert_eq!(history.careers[0].manager_name, "manager 3");
}

#[tokio::test]
async fn test_history_season_without_scores_has_no_playoff_members() {
    let store = InMemoryScoreStore::new();
    store.put_season_config(season_config(2025, 2));
    store.add_member(Member::new(1, LEAGUE, 2025, "Manager 1", "Team One"));
    store.add_member(Member::new(2, LEAGUE, 2025, "Manager 2", "Team Two"));
    store.add_member(Member::new(3, LEAGUE, 2025, "Manager 3", "Team Three"));

    let ledger = create_ledger(store);
    let history = ledger.history(LEAGUE).await.unwrap();

    assert_eq!(history.ongoing_seasons, vec![2025]);
    assert_eq!(history.records.len(), 3);
    assert!(history.records.iter().all(|r| r.status == ParticipationStatus::None));
}
