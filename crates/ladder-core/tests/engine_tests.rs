//! End-to-end tests: JSON snapshot in, progress report out.

use chrono::NaiveDate;
use ladder_core::engine::{ProgressReport, ProgressionEngine};
use ladder_core::snapshot::ActivitySnapshot;
use ladder_core::streak::StreakState;
use tempfile::TempDir;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_report_from_json_snapshot() {
    let snap = ActivitySnapshot::from_json(
        r#"{
            "total_xp": 1250,
            "lessons_completed": 12,
            "check_ins": ["2026-10-12", "2026-10-13", "2026-10-13", "2026-10-14"],
            "badges_unlocked": ["first_lesson"],
            "counters": {"quizzes_passed": 2}
        }"#,
    )
    .unwrap();

    let engine = ProgressionEngine::default();
    let report = engine.report(&snap, day("2026-10-15")).unwrap();

    assert_eq!(report.level.level, 3);
    assert_eq!(report.streak.state, StreakState::AtRisk);
    assert_eq!(report.streak.current_streak, 3);
    assert_eq!(report.badges.newly_unlocked, vec!["lessons_10", "xp_1000", "streak_3"]);
}

#[test]
fn test_report_does_not_mutate_snapshot() {
    let snap = ActivitySnapshot::new(2_000, 20);
    let before = snap.clone();
    let engine = ProgressionEngine::default();
    let _ = engine.report(&snap, day("2026-10-15")).unwrap();
    assert_eq!(snap, before);
}

#[test]
fn test_invalid_snapshot_is_explicit_error() {
    let err = ActivitySnapshot::from_json(
        r#"{"total_xp": 10, "lessons_completed": 0, "check_ins": ["2026-10-14", "2026-10-12"]}"#,
    )
    .unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_report_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("last_report.json");

    let engine = ProgressionEngine::default();
    let report = engine.report(&ActivitySnapshot::new(600, 1), day("2026-10-15")).unwrap();
    report.save(&path).unwrap();

    assert_eq!(ProgressReport::load(&path).unwrap(), report);
}

#[test]
fn test_concurrent_reports_agree() {
    let engine = ProgressionEngine::default();
    let snap = ActivitySnapshot::new(7_777, 40);
    let today = day("2026-10-15");

    let reports: Vec<ProgressReport> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| s.spawn(|| engine.report(&snap, today).unwrap())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(reports.windows(2).all(|w| w[0] == w[1]));
}
