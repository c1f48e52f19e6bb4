//! Level calculator.
//!
//! Fixed-width leveling: every level costs the same `xp_per_level`.
//! Titles come from an ordered band table; anything past the last band
//! gets the top-tier title. There is no level cap.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LadderError, Result};

pub const DEFAULT_XP_PER_LEVEL: u64 = 500;

/// Title bands by level
/// Level 1-4: Prompt Apprentice
/// Level 5-9: Token Tinkerer
/// Level 10-19: Context Crafter
/// Level 20-34: Retrieval Ranger
/// Level 35-49: Agent Architect
/// Level 50+: LLM Luminary
pub const DEFAULT_TITLE_BANDS: &[(u64, u64, &str)] = &[
    (1, 4, "Prompt Apprentice"),
    (5, 9, "Token Tinkerer"),
    (10, 19, "Context Crafter"),
    (20, 34, "Retrieval Ranger"),
    (35, 49, "Agent Architect"),
];

pub const DEFAULT_TOP_TITLE: &str = "LLM Luminary";

/// One row of the title table (inclusive on both ends)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleBand {
    pub min_level: u64,
    pub max_level: u64,
    pub title: String,
}

impl TitleBand {
    pub fn new(min_level: u64, max_level: u64, title: &str) -> Self {
        Self {
            min_level,
            max_level,
            title: title.to_string(),
        }
    }
}

/// Derived level state for an XP total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u64,
    pub title: String,
    /// Always in [0, xp_per_level)
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
}

impl LevelInfo {
    /// Fraction of the current level completed (0.0-1.0)
    pub fn progress(&self) -> f64 {
        let width = self.xp_into_level + self.xp_to_next_level;
        if width == 0 {
            return 0.0;
        }
        self.xp_into_level as f64 / width as f64
    }
}

/// XP-per-level threshold plus the title table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTable {
    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u64,
    #[serde(default = "default_title_bands")]
    pub title_bands: Vec<TitleBand>,
    #[serde(default = "default_top_title")]
    pub top_title: String,
}

fn default_xp_per_level() -> u64 {
    DEFAULT_XP_PER_LEVEL
}

fn default_title_bands() -> Vec<TitleBand> {
    DEFAULT_TITLE_BANDS
        .iter()
        .map(|(min, max, title)| TitleBand::new(*min, *max, title))
        .collect()
}

fn default_top_title() -> String {
    DEFAULT_TOP_TITLE.to_string()
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            xp_per_level: default_xp_per_level(),
            title_bands: default_title_bands(),
            top_title: default_top_title(),
        }
    }
}

impl LevelTable {
    pub fn new(xp_per_level: u64, title_bands: Vec<TitleBand>, top_title: &str) -> Result<Self> {
        let table = Self {
            xp_per_level,
            title_bands,
            top_title: top_title.to_string(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Check the threshold and that bands tile levels 1..=last without gaps
    pub fn validate(&self) -> Result<()> {
        if self.xp_per_level == 0 {
            return Err(LadderError::Config("xp_per_level must be positive".to_string()));
        }
        let first = self
            .title_bands
            .first()
            .ok_or_else(|| LadderError::Config("title table is empty".to_string()))?;
        if first.min_level != 1 {
            return Err(LadderError::Config(format!(
                "first title band must start at level 1, not {}",
                first.min_level
            )));
        }
        for band in &self.title_bands {
            if band.min_level > band.max_level {
                return Err(LadderError::Config(format!(
                    "title band '{}' has min_level {} above max_level {}",
                    band.title, band.min_level, band.max_level
                )));
            }
        }
        for pair in self.title_bands.windows(2) {
            if pair[0].max_level.checked_add(1) != Some(pair[1].min_level) {
                return Err(LadderError::Config(format!(
                    "title bands '{}' and '{}' are not contiguous",
                    pair[0].title, pair[1].title
                )));
            }
        }
        Ok(())
    }

    /// Level width actually used for arithmetic (a zero width is clamped to 1)
    pub fn effective_xp_per_level(&self) -> u64 {
        self.xp_per_level.max(1)
    }

    /// Level info for a raw XP value; negative XP is malformed input
    pub fn compute_level(&self, total_xp: i64) -> Result<LevelInfo> {
        if self.xp_per_level == 0 {
            return Err(LadderError::Config("xp_per_level must be positive".to_string()));
        }
        let xp = u64::try_from(total_xp)
            .map_err(|_| LadderError::invalid(format!("negative XP: {}", total_xp)))?;
        Ok(self.level_for(xp))
    }

    /// Level info for an XP value already known to be valid.
    /// Expects a validated table; an unvalidated zero width is clamped.
    pub fn level_for(&self, total_xp: u64) -> LevelInfo {
        let width = self.effective_xp_per_level();
        let level = self.level_number(total_xp);
        let xp_into_level = total_xp % width;
        let info = LevelInfo {
            level,
            title: self.title_for(level).to_string(),
            xp_into_level,
            xp_to_next_level: width - xp_into_level,
        };
        debug!(total_xp, level, "computed level");
        info
    }

    /// 1-based level for an XP total
    pub fn level_number(&self, total_xp: u64) -> u64 {
        total_xp / self.effective_xp_per_level() + 1
    }

    /// Title for a level: highest band starting at or below it,
    /// top-tier title once past the last band
    pub fn title_for(&self, level: u64) -> &str {
        match self.title_bands.last() {
            Some(last) if level > last.max_level => &self.top_title,
            _ => self
                .title_bands
                .iter()
                .rev()
                .find(|band| band.min_level <= level)
                .map(|band| band.title.as_str())
                .unwrap_or(&self.top_title),
        }
    }

    /// Total XP at which `level` begins
    pub fn xp_for_level(&self, level: u64) -> u64 {
        level.saturating_sub(1).saturating_mul(self.effective_xp_per_level())
    }
}

/// Level info using the default table
pub fn compute_level(total_xp: i64) -> Result<LevelInfo> {
    LevelTable::default().compute_level(total_xp)
}
