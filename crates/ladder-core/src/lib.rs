//! Ladder progression engine.
//!
//! Turns a user's activity snapshot into derived gamification state:
//! level and title, streak health, newly unlocked badges, and leaderboard
//! rank. Every component is a pure function of its input; nothing here
//! does I/O except the config and file loaders.

pub mod badges;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod level;
pub mod snapshot;
pub mod streak;

pub use badges::{
    default_catalog, evaluate_badges, BadgeCatalog, BadgeDefinition, BadgeEvaluation, BadgeRule,
    PredicateFault, RuleFault, UnlockPredicate,
};
pub use config::LadderConfig;
pub use engine::{ProgressReport, ProgressionEngine};
pub use error::LadderError;
pub use leaderboard::{
    find_rank, rank, Leaderboard, LeaderboardEntry, LeaderboardWindow, RankedEntry,
    RawLeaderboardEntry,
};
pub use level::{compute_level, LevelInfo, LevelTable, TitleBand};
pub use snapshot::{ActivityRecord, ActivitySnapshot};
pub use streak::{evaluate_streak, StreakPolicy, StreakState, StreakStatus};
