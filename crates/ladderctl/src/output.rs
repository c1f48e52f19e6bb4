//! Output formatting - ASCII-only terminal output.

use ladder_core::badges::{format_unlock, BadgeCatalog, BadgeEvaluation};
use ladder_core::engine::ProgressReport;
use ladder_core::leaderboard::LeaderboardWindow;
use ladder_core::level::LevelInfo;
use ladder_core::streak::{StreakState, StreakStatus};
use owo_colors::OwoColorize;

const BAR_WIDTH: usize = 20;

/// Generate a progress bar string
/// progress: percentage (0-100)
pub fn progress_bar(progress: usize, width: usize) -> String {
    let filled = (progress.min(100) * width) / 100;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), "-".repeat(empty))
}

pub fn format_level(info: &LevelInfo) -> String {
    let pct = (info.progress() * 100.0) as usize;
    format!(
        "Level {} - {}\n{} {}%  ({} XP to level {})",
        info.level,
        info.title.bold(),
        progress_bar(pct, BAR_WIDTH),
        pct,
        info.xp_to_next_level,
        info.level + 1
    )
}

fn state_tag(state: StreakState) -> String {
    match state {
        StreakState::Active => "[ACTIVE]".bright_green().to_string(),
        StreakState::AtRisk => "[AT RISK]".yellow().to_string(),
        StreakState::Lost => "[LOST]".bright_red().to_string(),
    }
}

pub fn format_streak(status: &StreakStatus) -> String {
    let days = match status.current_streak {
        1 => "1 day".to_string(),
        n => format!("{} days", n),
    };
    let mut text = format!("{} Streak: {}", state_tag(status.state), days);

    if status.state == StreakState::AtRisk {
        text.push_str("  (check in today to keep it)");
    }
    if let Some(m) = status.milestone_value {
        text.push_str(&format!("\n{} {}-day milestone!", "<*>".cyan(), m));
    }
    text.push_str(&format!(
        "\nLongest: {}  Active days: {}",
        status.longest_streak, status.active_days
    ));
    text
}

pub fn format_badge_evaluation(eval: &BadgeEvaluation, catalog: &BadgeCatalog) -> String {
    let mut lines = Vec::new();
    for id in &eval.newly_unlocked {
        match catalog.get(id) {
            Some(def) => lines.push(format_unlock(def)),
            None => lines.push(format!("Badge unlocked: {}", id)),
        }
    }
    for fault in &eval.faults {
        lines.push(format!(
            "{} badge '{}' skipped: {}",
            "[!]".yellow(),
            fault.badge_id,
            fault.reason
        ));
    }
    lines.join("\n")
}

pub fn format_report(report: &ProgressReport, catalog: &BadgeCatalog, stale: bool) -> String {
    let mut sections = Vec::new();
    if stale {
        sections.push(format!(
            "{} snapshot rejected; showing last known good report from {}",
            "[NOTE]".yellow(),
            report.as_of
        ));
    }
    sections.push(format_level(&report.level));
    sections.push(format_streak(&report.streak));

    let badges = format_badge_evaluation(&report.badges, catalog);
    if !badges.is_empty() {
        sections.push(badges);
    }
    sections.join("\n\n")
}

pub fn format_leaderboard(window: &LeaderboardWindow) -> String {
    let viewer_id = window.viewer.as_ref().map(|v| v.user_id.as_str());
    let row = |rank: u32, user: &str, xp: u64| {
        let marker = if Some(user) == viewer_id { ">" } else { " " };
        format!("{} {:>4}  {:<24} {:>10}", marker, rank, user, xp)
    };

    let mut lines = vec![format!("  {:>4}  {:<24} {:>10}", "RANK", "USER", "XP")];
    for entry in &window.top {
        lines.push(row(entry.rank, &entry.user_id, entry.total_xp));
    }
    if let Some(viewer) = &window.viewer {
        if !window.viewer_in_top() {
            lines.push("       ...".to_string());
            lines.push(row(viewer.rank, &viewer.user_id, viewer.total_xp));
        }
    }
    lines.push(format!("{} users ranked", window.total));
    lines.join("\n")
}
