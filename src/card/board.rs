use super::{CardResult, humanize_number, rank_label, truncate_name};
use crate::constants::{GRID_CELL_WIDTH, MAX_COLS};
use crate::db::repositories::ScoreStore;
use crate::scoreboard::Scoreboard;

/// Cells of `#rank` over the member name, `MAX_COLS` to a row.
///
/// The title header is only drawn once the board spans more than one column.
pub async fn render_grid<S: ScoreStore + ?Sized>(
    board: &Scoreboard<'_, S>,
    title: &str,
) -> CardResult<String> {
    let columns = board.len().min(MAX_COLS);
    let cell = GRID_CELL_WIDTH;
    let row_width = columns * cell;
    let mut out = String::new();

    if columns > 1 {
        let header = format!("Scoreboard @ {title}");
        out.push_str(&format!("{header:^row_width$}\n"));
        out.push_str(&"=".repeat(row_width));
        out.push('\n');
    }

    for row in board.entries.chunks(MAX_COLS) {
        let mut ranks = String::new();
        let mut names = String::new();

        for entry in row {
            let rank = format!("#{}", rank_label(entry.score.rank().await?));
            let name = truncate_name(&entry.display_name);
            ranks.push_str(&format!("{rank:^cell$}"));
            names.push_str(&format!("{name:^cell$}"));
        }

        out.push_str(ranks.trim_end());
        out.push('\n');
        out.push_str(names.trim_end());
        out.push('\n');
    }

    Ok(out)
}

/// One line per member: rank, name, level and total score.
pub async fn render_list<S: ScoreStore + ?Sized>(board: &Scoreboard<'_, S>) -> CardResult<String> {
    let mut out = String::new();

    for entry in &board.entries {
        let rank = rank_label(entry.score.rank().await?);
        let name = truncate_name(&entry.display_name);
        out.push_str(&format!(
            "{rank:>4}. {name:<15}  LEVEL {:<6} {} XP\n",
            humanize_number(entry.score.level()),
            humanize_number(entry.score.total_score() as f64),
        ));
    }

    Ok(out)
}
