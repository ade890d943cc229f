//! Plain-text cards for the terminal: a single member's rank card and the guild scoreboard.

use core::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::MAX_NAME_LEN;
use crate::db::models::GuildId;
use crate::db::repositories::ScoreStore;
use crate::score::ScoreError;
use crate::scoreboard::Scoreboard;

pub mod board;
pub mod rank_card;

pub type CardResult<T> = core::result::Result<T, CardError>;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("invalid scoreboard style '{0}' (expected one of: grid, list)")]
    InvalidStyle(String),

    #[error("scoreboard for guild {0} has no active members")]
    EmptyScoreboard(GuildId),

    #[error(transparent)]
    Score(#[from] ScoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreboardStyle {
    #[default]
    Grid,
    List,
}

impl FromStr for ScoreboardStyle {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(ScoreboardStyle::Grid),
            "list" => Ok(ScoreboardStyle::List),
            _ => Err(CardError::InvalidStyle(s.to_string())),
        }
    }
}

impl fmt::Display for ScoreboardStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreboardStyle::Grid => write!(f, "grid"),
            ScoreboardStyle::List => write!(f, "list"),
        }
    }
}

pub async fn render_scoreboard<S: ScoreStore + ?Sized>(
    board: &Scoreboard<'_, S>,
    style: ScoreboardStyle,
    title: &str,
) -> CardResult<String> {
    if board.is_empty() {
        return Err(CardError::EmptyScoreboard(board.guild_id));
    }

    match style {
        ScoreboardStyle::Grid => board::render_grid(board, title).await,
        ScoreboardStyle::List => board::render_list(board).await,
    }
}

const SUFFIXES: [(f64, &str); 5] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K"), (1.0, "")];

/// Compact number form: `1.7`, `204.08`, `12.5K`, `3M`.
pub fn humanize_number(value: f64) -> String {
    let mut tier = SUFFIXES
        .iter()
        .position(|&(scale, _)| value.abs() >= scale)
        .unwrap_or(SUFFIXES.len() - 1);

    // two-place rounding can carry into the next suffix, e.g. 999_999 -> 1000K
    let rounded = (value / SUFFIXES[tier].0 * 100.0).round() / 100.0;
    if tier > 0 && rounded.abs() >= 1e3 {
        tier -= 1;
    }

    let (scale, suffix) = SUFFIXES[tier];
    let fixed = format!("{:.2}", value / scale);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}{suffix}")
}

/// Cuts a display name to the width the cards reserve for it.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_LEN {
        tracing::debug!(name, "name is too long, shortening");
    }
    name.chars().take(MAX_NAME_LEN).collect()
}

pub(crate) fn rank_label(rank: Option<i64>) -> String {
    match rank {
        Some(r) => r.to_string(),
        None => crate::constants::UNRANKED_LABEL.to_string(),
    }
}
