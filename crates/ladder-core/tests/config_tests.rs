//! Tests for loading configuration files.

use ladder_core::config::LadderConfig;
use ladder_core::engine::ProgressionEngine;
use ladder_core::snapshot::ActivitySnapshot;
use ladder_core::LadderError;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_from_file_drives_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[leveling]
xp_per_level = 100
top_title = "Oracle"

[[leveling.title_bands]]
min_level = 1
max_level = 2
title = "Novice"

[[badges]]
id = "hundred"
symbol = "(100)"
name = "Hundred"
description = "Earn 100 XP"
rule = { kind = "min_xp", xp = 100 }
"#,
    )
    .unwrap();

    let engine = ProgressionEngine::new(LadderConfig::load_from(&path).unwrap()).unwrap();
    let snap = ActivitySnapshot::new(250, 0);

    let level = engine.level(&snap);
    assert_eq!(level.level, 3);
    assert_eq!(level.title, "Oracle");
    assert_eq!(engine.badges(&snap).newly_unlocked, vec!["hundred".to_string()]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = LadderConfig::load_from(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, LadderError::Io(_)));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = LadderConfig::default();
    config.streak.milestones = vec![5, 50];
    config.save_to(&path).unwrap();

    assert_eq!(LadderConfig::load_from(&path).unwrap(), config);
}
