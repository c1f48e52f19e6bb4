//! Streak evaluator.
//!
//! Streak health is recomputed on every call from the gap between "now" and
//! the latest check-in. There is no stored state to advance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::days_between;
use crate::error::{LadderError, Result};
use crate::snapshot::{collapse_days, ensure_ascending};

pub const DEFAULT_MILESTONES: &[u32] = &[7, 30, 100];

/// Streak health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreakState {
    /// Checked in today
    Active,
    /// Last check-in was yesterday; lapses at the end of today
    AtRisk,
    /// Missed at least one full day (or never checked in)
    Lost,
}

impl StreakState {
    pub fn label(&self) -> &'static str {
        match self {
            StreakState::Active => "active",
            StreakState::AtRisk => "at-risk",
            StreakState::Lost => "lost",
        }
    }

    /// Classify the gap in days between the latest check-in and now
    pub fn from_gap(gap_days: i64) -> Self {
        match gap_days {
            0 => StreakState::Active,
            1 => StreakState::AtRisk,
            _ => StreakState::Lost,
        }
    }
}

impl std::fmt::Display for StreakState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Derived streak view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStatus {
    pub current_streak: u32,
    pub state: StreakState,
    pub is_milestone: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone_value: Option<u32>,
    /// Longest run anywhere in history; a lapse does not reset it
    pub longest_streak: u32,
    /// Distinct days with a check-in
    pub active_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check_in: Option<NaiveDate>,
}

impl StreakStatus {
    fn lost_empty() -> Self {
        Self {
            current_streak: 0,
            state: StreakState::Lost,
            is_milestone: false,
            milestone_value: None,
            longest_streak: 0,
            active_days: 0,
            last_check_in: None,
        }
    }
}

/// Milestone thresholds for streak evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakPolicy {
    #[serde(default = "default_milestones")]
    pub milestones: Vec<u32>,
}

fn default_milestones() -> Vec<u32> {
    DEFAULT_MILESTONES.to_vec()
}

impl Default for StreakPolicy {
    fn default() -> Self {
        Self {
            milestones: default_milestones(),
        }
    }
}

impl StreakPolicy {
    pub fn with_milestones(milestones: Vec<u32>) -> Result<Self> {
        let policy = Self { milestones };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.milestones.contains(&0) {
            return Err(LadderError::Config("streak milestone of 0 days".to_string()));
        }
        Ok(())
    }

    pub fn is_milestone(&self, streak: u32) -> bool {
        self.milestones.contains(&streak)
    }

    /// Evaluate streak health as of `now`
    pub fn evaluate(&self, check_ins: &[NaiveDate], now: NaiveDate) -> Result<StreakStatus> {
        ensure_ascending(check_ins)?;
        let days = collapse_days(check_ins.to_vec());

        let Some(&last) = days.last() else {
            return Ok(StreakStatus::lost_empty());
        };
        if last > now {
            return Err(LadderError::invalid(format!(
                "check-in {} is after {}",
                last, now
            )));
        }

        let state = StreakState::from_gap(days_between(last, now));
        let current_streak = match state {
            StreakState::Lost => 0,
            _ => trailing_run(&days),
        };
        let is_milestone = self.is_milestone(current_streak);
        let active_days = u32::try_from(days.len())
            .map_err(|_| LadderError::invalid(format!("{} active days exceeds u32", days.len())))?;

        debug!(current_streak, state = state.label(), "evaluated streak");

        Ok(StreakStatus {
            current_streak,
            state,
            is_milestone,
            milestone_value: is_milestone.then_some(current_streak),
            longest_streak: longest_run(&days),
            active_days,
            last_check_in: Some(last),
        })
    }
}

/// Evaluate with the default milestones
pub fn evaluate_streak(check_ins: &[NaiveDate], now: NaiveDate) -> Result<StreakStatus> {
    StreakPolicy::default().evaluate(check_ins, now)
}

fn is_next_day(prev: NaiveDate, next: NaiveDate) -> bool {
    prev.succ_opt() == Some(next)
}

/// Length of the consecutive-day run ending at the last entry
fn trailing_run(days: &[NaiveDate]) -> u32 {
    if days.is_empty() {
        return 0;
    }
    let mut run = 1u32;
    for i in (0..days.len() - 1).rev() {
        if is_next_day(days[i], days[i + 1]) {
            run += 1;
        } else {
            break;
        }
    }
    run
}

/// Longest consecutive-day run anywhere in the history
pub fn longest_run(days: &[NaiveDate]) -> u32 {
    if days.is_empty() {
        return 0;
    }
    let mut best = 1u32;
    let mut run = 1u32;
    for w in days.windows(2) {
        if is_next_day(w[0], w[1]) {
            run += 1;
            best = best.max(run);
        } else {
            run = 1;
        }
    }
    best
}
