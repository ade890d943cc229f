use std::num::NonZeroU32;

/// Slope of the square-root level curve: `level = LEVEL_COEFFICIENT * sqrt(score) + 1`.
pub const LEVEL_COEFFICIENT: f64 = 0.07;

/// Number of members fetched for a guild scoreboard unless configured otherwise.
pub const SCOREBOARD_LIMIT: NonZeroU32 = NonZeroU32::new(30).unwrap();

// Text card layout
pub const MAX_COLS: usize = 6;
pub const MAX_NAME_LEN: usize = 15;
pub const GRID_CELL_WIDTH: usize = 22;
pub const PROGRESS_BAR_WIDTH: usize = 40;
/// Smallest fill drawn for a non-empty progress bar, so a sliver of progress stays visible.
pub const MIN_PROGRESS_FILL: f64 = 5.0;

pub const UNRANKED_LABEL: &str = "-";
