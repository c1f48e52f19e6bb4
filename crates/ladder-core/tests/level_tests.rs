//! Tests for the level calculator.
//!
//! Tests verify:
//! - Level is monotonic in XP and progress stays inside the level width
//! - Repeated calls give identical results
//! - Fixed scenarios from the product rules

use ladder_core::level::{compute_level, LevelTable, TitleBand};

#[test]
fn test_level_monotonic_and_bounded() {
    let table = LevelTable::default();
    let mut prev = table.level_for(0);

    for xp in 1..=20_000u64 {
        let info = table.level_for(xp);
        assert!(info.level >= prev.level, "level dropped at {} XP", xp);
        assert!(info.xp_into_level < table.xp_per_level);
        assert_eq!(info.xp_into_level + info.xp_to_next_level, table.xp_per_level);
        assert_eq!(info.level, xp / table.xp_per_level + 1);
        prev = info;
    }
}

#[test]
fn test_level_idempotent() {
    for xp in [0i64, 1, 499, 500, 1250, 99_999] {
        assert_eq!(compute_level(xp).unwrap(), compute_level(xp).unwrap());
    }
}

#[test]
fn test_scenario_1250_xp() {
    let info = compute_level(1250).unwrap();
    assert_eq!(info.level, 3);
    assert_eq!(info.xp_into_level, 250);
    assert_eq!(info.xp_to_next_level, 250);
    assert_eq!(info.title, "Prompt Apprentice");
    assert!((info.progress() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_negative_xp_never_looks_like_level_one() {
    let err = compute_level(-500).unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn test_title_progression_with_custom_table() {
    let bands = vec![
        TitleBand::new(1, 2, "Reader"),
        TitleBand::new(3, 5, "Builder"),
    ];
    let table = LevelTable::new(10, bands, "Maintainer").unwrap();

    let titles: Vec<_> = (0..7u64).map(|lvl| table.level_for(lvl * 10).title).collect();
    assert_eq!(
        titles,
        vec!["Reader", "Reader", "Builder", "Builder", "Builder", "Maintainer", "Maintainer"]
    );
}
