//! Tests for the streak evaluator.

use chrono::{Duration, NaiveDate};
use ladder_core::streak::{evaluate_streak, StreakPolicy, StreakState};

// 2026-10-12 is a Monday
fn mon() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
}

fn run_ending(end: NaiveDate, n: i64) -> Vec<NaiveDate> {
    (0..n).rev().map(|i| end - Duration::days(i)).collect()
}

#[test]
fn test_run_of_n_ending_today_is_active() {
    let today = mon() + Duration::days(60);
    for n in 1..=40 {
        let status = evaluate_streak(&run_ending(today, n), today).unwrap();
        assert_eq!(status.current_streak, n as u32);
        assert_eq!(status.state, StreakState::Active);
        assert_eq!(status.longest_streak, n as u32);
    }
}

#[test]
fn test_two_day_gap_is_lost_regardless_of_run() {
    let today = mon() + Duration::days(200);
    for n in [1, 7, 30, 150] {
        let status = evaluate_streak(&run_ending(today - Duration::days(2), n), today).unwrap();
        assert_eq!(status.state, StreakState::Lost);
        assert_eq!(status.current_streak, 0);
        assert!(!status.is_milestone);
        assert_eq!(status.longest_streak, n as u32);
    }
}

#[test]
fn test_scenario_mon_tue_wed() {
    let wed = mon() + Duration::days(2);
    let status = evaluate_streak(&[mon(), mon() + Duration::days(1), wed], wed).unwrap();
    assert_eq!(status.current_streak, 3);
    assert_eq!(status.state, StreakState::Active);
    assert!(!status.is_milestone);
}

#[test]
fn test_scenario_mon_then_wed_is_lost() {
    let wed = mon() + Duration::days(2);
    let status = evaluate_streak(&[mon()], wed).unwrap();
    assert_eq!(status.current_streak, 0);
    assert_eq!(status.state, StreakState::Lost);
}

#[test]
fn test_yesterday_is_at_risk() {
    let today = mon() + Duration::days(10);
    let status = evaluate_streak(&run_ending(today - Duration::days(1), 5), today).unwrap();
    assert_eq!(status.state, StreakState::AtRisk);
    assert_eq!(status.current_streak, 5);
}

#[test]
fn test_milestones_do_not_change_state() {
    let today = mon() + Duration::days(120);
    for m in [7, 30, 100] {
        let status = evaluate_streak(&run_ending(today - Duration::days(1), m), today).unwrap();
        assert!(status.is_milestone);
        assert_eq!(status.milestone_value, Some(m as u32));
        assert_eq!(status.state, StreakState::AtRisk);
    }
}

#[test]
fn test_policy_without_milestones() {
    let policy = StreakPolicy::with_milestones(vec![]).unwrap();
    let status = policy.evaluate(&run_ending(mon(), 7), mon()).unwrap();
    assert!(!status.is_milestone);
}

#[test]
fn test_duplicate_days_are_idempotent() {
    let tue = mon() + Duration::days(1);
    let once = evaluate_streak(&[mon(), tue], tue).unwrap();
    let twice = evaluate_streak(&[mon(), mon(), tue, tue], tue).unwrap();
    assert_eq!(once, twice);
}
