//! Command implementations for ladderctl.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use ladder_core::calendar;
use ladder_core::config::LadderConfig;
use ladder_core::engine::{ProgressReport, ProgressionEngine};
use ladder_core::leaderboard::Leaderboard;
use ladder_core::snapshot::ActivitySnapshot;
use std::path::Path;
use tracing::warn;

use crate::output;

/// Build the engine from an explicit config file or the default location
pub fn load_engine(config_path: Option<&Path>) -> Result<ProgressionEngine> {
    let config = match config_path {
        Some(path) => LadderConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LadderConfig::load(),
    };
    ProgressionEngine::new(config).context("invalid configuration")
}

fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => Ok(calendar::parse_day(s)?),
        None => Ok(calendar::local_today()),
    }
}

fn load_snapshot(path: &Path) -> Result<ActivitySnapshot> {
    ActivitySnapshot::load(path).with_context(|| format!("failed to read snapshot {}", path.display()))
}

pub fn level(engine: &ProgressionEngine, xp: i64) -> Result<()> {
    let info = engine.levels().compute_level(xp)?;
    println!("{}", output::format_level(&info));
    Ok(())
}

pub fn streak(engine: &ProgressionEngine, snapshot: &Path, today: Option<&str>) -> Result<()> {
    let today = resolve_today(today)?;
    let snap = load_snapshot(snapshot)?;
    let status = engine.streak(&snap, today)?;
    println!("{}", output::format_streak(&status));
    Ok(())
}

pub fn badges(engine: &ProgressionEngine, snapshot: &Path) -> Result<()> {
    let snap = load_snapshot(snapshot)?;
    let eval = engine.badges(&snap);
    let text = output::format_badge_evaluation(&eval, engine.catalog());
    if text.is_empty() {
        println!("No new badges.");
    } else {
        println!("{}", text);
    }
    Ok(())
}

pub fn report(
    engine: &ProgressionEngine,
    snapshot: &Path,
    today: Option<&str>,
    json: bool,
    fallback: Option<&Path>,
) -> Result<()> {
    let today = resolve_today(today)?;
    let outcome = ActivitySnapshot::load(snapshot).and_then(|snap| engine.report(&snap, today));

    let (report, stale) = match (outcome, fallback) {
        (Ok(report), _) => {
            if let Some(path) = fallback {
                report
                    .save(path)
                    .with_context(|| format!("failed to save report to {}", path.display()))?;
            }
            (report, false)
        }
        (Err(e), Some(path)) if e.is_invalid_input() => {
            warn!(error = %e, "snapshot rejected, using last known good report");
            let cached = ProgressReport::load(path).with_context(|| {
                format!("snapshot invalid ({}) and no usable report at {}", e, path.display())
            })?;
            (cached, true)
        }
        (Err(e), _) => {
            return Err(e).with_context(|| format!("cannot build report for {}", snapshot.display()));
        }
    };

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", output::format_report(&report, engine.catalog(), stale));
    }
    Ok(())
}

pub fn leaderboard(entries: &Path, top: usize, user: Option<&str>) -> Result<()> {
    let board = Leaderboard::load(entries)
        .with_context(|| format!("failed to rank entries in {}", entries.display()))?;
    let window = board.window(top, user);
    println!("{}", output::format_leaderboard(&window));
    if let (Some(id), None) = (user, &window.viewer) {
        println!("User '{}' is not on the leaderboard.", id);
    }
    Ok(())
}

pub fn config(engine: &ProgressionEngine, default: bool) -> Result<()> {
    let text = if default {
        LadderConfig::default().to_toml()?
    } else {
        engine.config().to_toml()?
    };
    print!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ladder_core::streak::StreakState;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_today() {
        assert_eq!(
            resolve_today(Some("2026-10-17")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
        assert!(resolve_today(Some("yesterday")).is_err());
        assert!(resolve_today(None).is_ok());
    }

    #[test]
    fn test_report_refreshes_and_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        let cache = dir.path().join("last.json");
        fs::write(&good, r#"{"total_xp": 800, "lessons_completed": 2, "check_ins": ["2026-10-16"]}"#).unwrap();
        fs::write(&bad, r#"{"total_xp": -1, "lessons_completed": 2}"#).unwrap();

        let engine = ProgressionEngine::default();
        report(&engine, &good, Some("2026-10-17"), true, Some(cache.as_path())).unwrap();

        let cached = ProgressReport::load(&cache).unwrap();
        assert_eq!(cached.level.level, 2);
        assert_eq!(cached.streak.state, StreakState::AtRisk);

        // Invalid snapshot degrades to the cached report and leaves it untouched
        report(&engine, &bad, Some("2026-10-17"), true, Some(cache.as_path())).unwrap();
        assert_eq!(ProgressReport::load(&cache).unwrap(), cached);

        // Without a fallback the error surfaces
        assert!(report(&engine, &bad, Some("2026-10-17"), true, None).is_err());
    }

    #[test]
    fn test_missing_snapshot_does_not_use_fallback() {
        let dir = TempDir::new().unwrap();
        let cache = dir.path().join("last.json");
        let engine = ProgressionEngine::default();
        let missing = dir.path().join("missing.json");
        assert!(report(&engine, &missing, Some("2026-10-17"), true, Some(cache.as_path())).is_err());
    }

    #[test]
    fn test_load_engine_with_explicit_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[leveling]\nxp_per_level = 100\n").unwrap();
        let engine = load_engine(Some(path.as_path())).unwrap();
        assert_eq!(engine.levels().xp_per_level, 100);

        fs::write(&path, "[leveling]\nxp_per_level = 0\n").unwrap();
        assert!(load_engine(Some(path.as_path())).is_err());
    }
}
