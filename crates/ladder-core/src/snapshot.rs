//! Activity snapshots: the immutable input to every engine call.
//!
//! `ActivityRecord` is the shape the persistence layer hands us (signed
//! counts, unchecked dates). `ActivitySnapshot` is the validated form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::{LadderError, Result};

/// Raw user-progress record as persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub total_xp: i64,
    pub lessons_completed: i64,
    /// Check-in days, expected ascending
    #[serde(default)]
    pub check_ins: Vec<NaiveDate>,
    #[serde(default)]
    pub badges_unlocked: Vec<String>,
    /// Named activity counters (e.g. "quizzes_passed")
    #[serde(default)]
    pub counters: BTreeMap<String, u64>,
}

/// Validated, point-in-time view of a user's progression stats
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivitySnapshot {
    pub total_xp: u64,
    pub lessons_completed: u64,
    /// Ascending, one entry per calendar day
    pub check_ins: Vec<NaiveDate>,
    pub badges_unlocked: BTreeSet<String>,
    pub counters: BTreeMap<String, u64>,
}

impl ActivitySnapshot {
    pub fn new(total_xp: u64, lessons_completed: u64) -> Self {
        Self {
            total_xp,
            lessons_completed,
            ..Default::default()
        }
    }

    /// Set check-ins (must already be ascending; same-day repeats collapse)
    pub fn with_check_ins(mut self, check_ins: Vec<NaiveDate>) -> Result<Self> {
        ensure_ascending(&check_ins)?;
        self.check_ins = collapse_days(check_ins);
        Ok(self)
    }

    pub fn with_unlocked<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.badges_unlocked.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_counter(mut self, name: &str, value: u64) -> Self {
        self.counters.insert(name.to_string(), value);
        self
    }

    /// Parse and validate a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        let record: ActivityRecord = serde_json::from_str(json)?;
        Self::try_from(record)
    }

    /// Load and validate a JSON snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn is_unlocked(&self, badge_id: &str) -> bool {
        self.badges_unlocked.contains(badge_id)
    }

    pub fn last_check_in(&self) -> Option<NaiveDate> {
        self.check_ins.last().copied()
    }
}

impl TryFrom<ActivityRecord> for ActivitySnapshot {
    type Error = LadderError;

    fn try_from(record: ActivityRecord) -> Result<Self> {
        let total_xp = u64::try_from(record.total_xp)
            .map_err(|_| LadderError::invalid(format!("negative XP: {}", record.total_xp)))?;
        let lessons_completed = u64::try_from(record.lessons_completed).map_err(|_| {
            LadderError::invalid(format!(
                "negative lesson count: {}",
                record.lessons_completed
            ))
        })?;
        ensure_ascending(&record.check_ins)?;

        Ok(Self {
            total_xp,
            lessons_completed,
            check_ins: collapse_days(record.check_ins),
            badges_unlocked: record.badges_unlocked.into_iter().collect(),
            counters: record.counters,
        })
    }
}

/// Reject any pair of check-ins that goes backwards in time
pub(crate) fn ensure_ascending(days: &[NaiveDate]) -> Result<()> {
    match days.windows(2).find(|w| w[1] < w[0]) {
        Some(w) => Err(LadderError::invalid(format!(
            "check-ins not sorted ascending: {} before {}",
            w[0], w[1]
        ))),
        None => Ok(()),
    }
}

pub(crate) fn collapse_days(mut days: Vec<NaiveDate>) -> Vec<NaiveDate> {
    days.dedup();
    days
}
