//! Badge evaluator and catalog.
//!
//! Badges are unlocked once and never revoked. The evaluator only reports
//! badges that are newly eligible for a snapshot; recording them is the
//! persistence layer's job, and the next snapshot will list them in
//! `badges_unlocked`.
//!
//! Unlock rules are data (`BadgeRule`), so catalogs can be stored and
//! versioned in config files apart from the evaluator.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{LadderError, Result};
use crate::snapshot::ActivitySnapshot;
use crate::streak::longest_run;

const BADGE_ID_PATTERN: &str = r"^[a-z0-9][a-z0-9_]*$";

/// Why a predicate could not decide
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleFault {
    #[error("counter '{0}' not present in snapshot")]
    MissingCounter(String),

    #[error("empty {0} group")]
    EmptyGroup(&'static str),

    #[error("{0}")]
    Predicate(String),
}

/// Anything that can decide whether one badge is unlocked for a snapshot
pub trait UnlockPredicate {
    fn badge_id(&self) -> &str;

    fn is_unlocked(&self, snapshot: &ActivitySnapshot) -> std::result::Result<bool, RuleFault>;
}

impl<P: UnlockPredicate + ?Sized> UnlockPredicate for Box<P> {
    fn badge_id(&self) -> &str {
        (**self).badge_id()
    }

    fn is_unlocked(&self, snapshot: &ActivitySnapshot) -> std::result::Result<bool, RuleFault> {
        (**self).is_unlocked(snapshot)
    }
}

/// Declarative unlock rule: threshold comparisons over snapshot fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BadgeRule {
    MinXp { xp: u64 },
    MinLessons { lessons: u64 },
    MinActiveDays { days: u32 },
    MinLongestStreak { days: u32 },
    Counter { name: String, min: u64 },
    AllOf { rules: Vec<BadgeRule> },
    AnyOf { rules: Vec<BadgeRule> },
}

impl BadgeRule {
    pub fn check(&self, snapshot: &ActivitySnapshot) -> std::result::Result<bool, RuleFault> {
        match self {
            BadgeRule::MinXp { xp } => Ok(snapshot.total_xp >= *xp),
            BadgeRule::MinLessons { lessons } => Ok(snapshot.lessons_completed >= *lessons),
            BadgeRule::MinActiveDays { days } => Ok(snapshot.check_ins.len() as u64 >= u64::from(*days)),
            BadgeRule::MinLongestStreak { days } => Ok(longest_run(&snapshot.check_ins) >= *days),
            BadgeRule::Counter { name, min } => snapshot
                .counters
                .get(name)
                .map(|value| *value >= *min)
                .ok_or_else(|| RuleFault::MissingCounter(name.clone())),
            BadgeRule::AllOf { rules } => {
                if rules.is_empty() {
                    return Err(RuleFault::EmptyGroup("all_of"));
                }
                for rule in rules {
                    if !rule.check(snapshot)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            BadgeRule::AnyOf { rules } => {
                if rules.is_empty() {
                    return Err(RuleFault::EmptyGroup("any_of"));
                }
                for rule in rules {
                    if rule.check(snapshot)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn validate(&self) -> std::result::Result<(), RuleFault> {
        match self {
            BadgeRule::AllOf { rules } | BadgeRule::AnyOf { rules } => {
                if rules.is_empty() {
                    let kind = if matches!(self, BadgeRule::AllOf { .. }) { "all_of" } else { "any_of" };
                    return Err(RuleFault::EmptyGroup(kind));
                }
                rules.iter().try_for_each(BadgeRule::validate)
            }
            _ => Ok(()),
        }
    }
}

/// Badge with ASCII symbol, description and unlock rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    /// Unique identifier
    pub id: String,
    /// ASCII badge symbol (e.g., "[1]", "<7d>")
    pub symbol: String,
    pub name: String,
    /// How to earn it
    pub description: String,
    pub rule: BadgeRule,
}

impl BadgeDefinition {
    pub fn new(id: &str, symbol: &str, name: &str, description: &str, rule: BadgeRule) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            rule,
        }
    }
}

impl UnlockPredicate for BadgeDefinition {
    fn badge_id(&self) -> &str {
        &self.id
    }

    fn is_unlocked(&self, snapshot: &ActivitySnapshot) -> std::result::Result<bool, RuleFault> {
        self.rule.check(snapshot)
    }
}

/// A badge whose predicate faulted during evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateFault {
    pub badge_id: String,
    pub reason: String,
}

/// Result of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeEvaluation {
    /// Newly eligible badge ids, in catalog order
    pub newly_unlocked: Vec<String>,
    /// Badges skipped because their predicate faulted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<PredicateFault>,
}

impl BadgeEvaluation {
    pub fn is_partial(&self) -> bool {
        !self.faults.is_empty()
    }
}

/// Evaluate a catalog against a snapshot.
///
/// Badges already in `snapshot.badges_unlocked` are skipped without running
/// their predicate, so a stat that later drops can never revoke one. A
/// faulting predicate only loses its own badge for this pass.
pub fn evaluate_badges<P: UnlockPredicate>(snapshot: &ActivitySnapshot, catalog: &[P]) -> BadgeEvaluation {
    let mut result = BadgeEvaluation::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for badge in catalog {
        let id = badge.badge_id();
        if !seen.insert(id) || snapshot.is_unlocked(id) {
            continue;
        }
        match badge.is_unlocked(snapshot) {
            Ok(true) => result.newly_unlocked.push(id.to_string()),
            Ok(false) => {}
            Err(fault) => {
                warn!(badge = id, %fault, "badge predicate faulted; treating as locked");
                result.faults.push(PredicateFault {
                    badge_id: id.to_string(),
                    reason: fault.to_string(),
                });
            }
        }
    }

    debug!(
        unlocked = result.newly_unlocked.len(),
        faults = result.faults.len(),
        "evaluated badges"
    );
    result
}

/// Ordered list of badge definitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeCatalog {
    badges: Vec<BadgeDefinition>,
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        default_catalog()
    }
}

impl BadgeCatalog {
    pub fn new(badges: Vec<BadgeDefinition>) -> Self {
        Self { badges }
    }

    pub fn badges(&self) -> &[BadgeDefinition] {
        &self.badges
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn evaluate(&self, snapshot: &ActivitySnapshot) -> BadgeEvaluation {
        evaluate_badges(snapshot, &self.badges)
    }

    /// Check ids, names and rule structure
    pub fn validate(&self) -> Result<()> {
        let id_re = Regex::new(BADGE_ID_PATTERN).map_err(|e| LadderError::Config(e.to_string()))?;
        let mut seen = HashSet::new();

        for badge in &self.badges {
            if !id_re.is_match(&badge.id) {
                return Err(LadderError::Config(format!("invalid badge id '{}'", badge.id)));
            }
            if !seen.insert(badge.id.as_str()) {
                return Err(LadderError::Config(format!("duplicate badge id '{}'", badge.id)));
            }
            if badge.name.trim().is_empty() {
                return Err(LadderError::Config(format!("badge '{}' has no name", badge.id)));
            }
            badge
                .rule
                .validate()
                .map_err(|e| LadderError::Config(format!("badge '{}': {}", badge.id, e)))?;
        }
        Ok(())
    }

    /// Format badge symbols for display (ASCII style)
    pub fn format_badges(&self, ids: &[String], max_display: usize) -> String {
        let known: Vec<_> = ids.iter().filter_map(|id| self.get(id)).collect();
        if known.is_empty() {
            return String::new();
        }

        let symbols = known
            .iter()
            .take(max_display)
            .map(|b| b.symbol.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if known.len() > max_display {
            format!("{} +{} more", symbols, known.len() - max_display)
        } else {
            symbols
        }
    }
}

/// Format a single badge for an unlock notification
pub fn format_unlock(badge: &BadgeDefinition) -> String {
    format!("{} Badge unlocked: {} - {}", badge.symbol, badge.name, badge.description)
}

/// Built-in catalog for the lesson platform
pub fn default_catalog() -> BadgeCatalog {
    use BadgeRule::*;

    BadgeCatalog::new(vec![
        // Lessons
        BadgeDefinition::new("first_lesson", "[1]", "First Prompt", "Complete your first lesson", MinLessons { lessons: 1 }),
        BadgeDefinition::new("lessons_10", "[10]", "Getting Started", "Complete 10 lessons", MinLessons { lessons: 10 }),
        BadgeDefinition::new("lessons_50", "[50]", "Course Regular", "Complete 50 lessons", MinLessons { lessons: 50 }),

        // XP
        BadgeDefinition::new("xp_1000", "(1k)", "Token Collector", "Earn 1,000 XP", MinXp { xp: 1_000 }),
        BadgeDefinition::new("xp_10000", "(10k)", "Context Window", "Earn 10,000 XP", MinXp { xp: 10_000 }),

        // Streaks
        BadgeDefinition::new("streak_3", "<3d>", "On Fire", "Check in 3 days in a row", MinLongestStreak { days: 3 }),
        BadgeDefinition::new("streak_7", "<7d>", "Week Warrior", "Check in 7 days in a row", MinLongestStreak { days: 7 }),
        BadgeDefinition::new("streak_30", "<30d>", "Monthly Master", "Check in 30 days in a row", MinLongestStreak { days: 30 }),
        BadgeDefinition::new("streak_100", "<100d>", "Centurion", "Check in 100 days in a row", MinLongestStreak { days: 100 }),

        // Tenure
        BadgeDefinition::new("active_30", "|30|", "Regular", "Check in on 30 different days", MinActiveDays { days: 30 }),

        // Combined
        BadgeDefinition::new(
            "dedicated_learner",
            "{*}",
            "Dedicated Learner",
            "Complete 25 lessons and hold a 14-day streak",
            AllOf { rules: vec![MinLessons { lessons: 25 }, MinLongestStreak { days: 14 }] },
        ),
    ])
}
