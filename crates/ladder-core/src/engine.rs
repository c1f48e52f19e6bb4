//! Progression engine facade.
//!
//! Runs the level -> streak -> badge pipeline over one snapshot. Holds only
//! configuration, so a single engine can serve any number of threads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::badges::{BadgeCatalog, BadgeEvaluation};
use crate::config::LadderConfig;
use crate::error::Result;
use crate::level::{LevelInfo, LevelTable};
use crate::snapshot::ActivitySnapshot;
use crate::streak::{StreakPolicy, StreakStatus};

/// Everything derived from one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Day the report was computed for
    pub as_of: NaiveDate,
    pub level: LevelInfo,
    pub streak: StreakStatus,
    pub badges: BadgeEvaluation,
}

impl ProgressReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressionEngine {
    config: LadderConfig,
}

impl ProgressionEngine {
    /// Build an engine from a config, validating it first
    pub fn new(config: LadderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LadderConfig {
        &self.config
    }

    pub fn levels(&self) -> &LevelTable {
        &self.config.leveling
    }

    pub fn streaks(&self) -> &StreakPolicy {
        &self.config.streak
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.config.badges
    }

    pub fn level(&self, snapshot: &ActivitySnapshot) -> LevelInfo {
        self.levels().level_for(snapshot.total_xp)
    }

    pub fn streak(&self, snapshot: &ActivitySnapshot, today: NaiveDate) -> Result<StreakStatus> {
        self.streaks().evaluate(&snapshot.check_ins, today)
    }

    pub fn badges(&self, snapshot: &ActivitySnapshot) -> BadgeEvaluation {
        self.catalog().evaluate(snapshot)
    }

    /// Derive level, streak and newly unlocked badges as of `today`
    pub fn report(&self, snapshot: &ActivitySnapshot, today: NaiveDate) -> Result<ProgressReport> {
        let level = self.level(snapshot);
        let streak = self.streak(snapshot, today)?;
        let badges = self.badges(snapshot);

        info!(
            level = level.level,
            streak = streak.current_streak,
            state = streak.state.label(),
            new_badges = badges.newly_unlocked.len(),
            "progress report ready"
        );

        Ok(ProgressReport {
            as_of: today,
            level,
            streak,
            badges,
        })
    }
}
