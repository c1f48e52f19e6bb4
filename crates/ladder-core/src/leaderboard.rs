//! Leaderboard ranking.
//!
//! Ordering is a strict total order on (total_xp desc, user_id asc), so
//! equal-XP users always come back in the same positions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{LadderError, Result};

/// One user's XP, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub total_xp: u64,
}

/// Entry as read from an external file, before the XP sign check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLeaderboardEntry {
    pub user_id: String,
    pub total_xp: i64,
}

impl TryFrom<RawLeaderboardEntry> for LeaderboardEntry {
    type Error = LadderError;

    fn try_from(raw: RawLeaderboardEntry) -> Result<Self> {
        let total_xp = u64::try_from(raw.total_xp).map_err(|_| {
            LadderError::invalid(format!(
                "negative XP {} for user '{}'",
                raw.total_xp, raw.user_id
            ))
        })?;
        Ok(Self {
            user_id: raw.user_id,
            total_xp,
        })
    }
}

impl LeaderboardEntry {
    pub fn new(user_id: &str, total_xp: u64) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_xp,
        }
    }
}

/// Entry with its 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub user_id: String,
    pub total_xp: u64,
    pub rank: u32,
}

/// Top-N slice plus the viewer's own row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardWindow {
    pub top: Vec<RankedEntry>,
    /// Viewer's entry, present even when outside `top`
    pub viewer: Option<RankedEntry>,
    pub total: usize,
}

impl LeaderboardWindow {
    /// Whether the viewer is already shown in the top slice
    pub fn viewer_in_top(&self) -> bool {
        match &self.viewer {
            Some(v) => self.top.iter().any(|e| e.user_id == v.user_id),
            None => false,
        }
    }
}

/// 1-based rank for a sorted position
fn rank_at(index: usize) -> Result<u32> {
    index
        .checked_add(1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            LadderError::invalid(format!("leaderboard position {} exceeds u32 ranks", index))
        })
}

fn leaderboard_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_xp
        .cmp(&a.total_xp)
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Fully ordered leaderboard, computed once per input set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    ranked: Vec<RankedEntry>,
}

impl Leaderboard {
    pub fn build(entries: &[LeaderboardEntry]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in entries {
            if !seen.insert(entry.user_id.as_str()) {
                return Err(LadderError::invalid(format!(
                    "user '{}' appears more than once",
                    entry.user_id
                )));
            }
        }

        let mut sorted: Vec<&LeaderboardEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| leaderboard_order(a, b));

        let ranked = sorted
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                Ok(RankedEntry {
                    user_id: e.user_id.clone(),
                    total_xp: e.total_xp,
                    rank: rank_at(i)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(users = ranked.len(), "built leaderboard");
        Ok(Self { ranked })
    }

    /// Parse a JSON array of entries; negative XP is InvalidInput
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawLeaderboardEntry> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(LeaderboardEntry::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::build(&entries)
    }

    /// Load a JSON array of entries
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.ranked
    }

    pub fn into_entries(self) -> Vec<RankedEntry> {
        self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn top(&self, n: usize) -> &[RankedEntry] {
        &self.ranked[..n.min(self.ranked.len())]
    }

    pub fn get(&self, user_id: &str) -> Option<&RankedEntry> {
        self.ranked.iter().find(|e| e.user_id == user_id)
    }

    pub fn rank_of(&self, user_id: &str) -> Option<u32> {
        self.get(user_id).map(|e| e.rank)
    }

    pub fn window(&self, n: usize, user_id: Option<&str>) -> LeaderboardWindow {
        LeaderboardWindow {
            top: self.top(n).to_vec(),
            viewer: user_id.and_then(|id| self.get(id)).cloned(),
            total: self.ranked.len(),
        }
    }
}

/// Rank all entries
pub fn rank(entries: &[LeaderboardEntry]) -> Result<Vec<RankedEntry>> {
    Ok(Leaderboard::build(entries)?.into_entries())
}

/// Rank of one user, or None if absent
pub fn find_rank(entries: &[LeaderboardEntry], user_id: &str) -> Result<Option<u32>> {
    Ok(Leaderboard::build(entries)?.rank_of(user_id))
}
