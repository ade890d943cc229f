use super::{humanize_number, rank_label, truncate_name};
use crate::constants::{MIN_PROGRESS_FILL, PROGRESS_BAR_WIDTH};
use crate::score::ScoreSnapshot;

/// Renders a member's rank card:
///
/// ```text
/// alice                RANK #2  LEVEL 1.7
///                      100 / 204.08 XP
/// [###################.....................]
/// ```
pub fn render(display_name: &str, snapshot: &ScoreSnapshot) -> String {
    let name = truncate_name(display_name);
    let rank = rank_label(snapshot.rank);
    let level = humanize_number(snapshot.level);
    let score = humanize_number(snapshot.score);
    let next = humanize_number(snapshot.next_level_score);

    format!(
        "{name:<21}RANK #{rank}  LEVEL {level}\n{:<21}{score} / {next} XP\n[{}]\n",
        "",
        progress_bar(snapshot.progress, PROGRESS_BAR_WIDTH),
    )
}

/// Fixed-width bar. Zero progress stays empty; anything above it fills at least
/// `MIN_PROGRESS_FILL` percent.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = if progress > 0.0 {
        let pct = progress.max(MIN_PROGRESS_FILL).min(100.0);
        ((pct / 100.0) * width as f64).round() as usize
    } else {
        0
    };

    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}
