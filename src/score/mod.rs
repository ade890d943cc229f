use thiserror::Error;

use crate::db::StoreError;

pub mod curve;
pub mod object;

pub use object::{ScoreObject, ScoreSnapshot};

pub type ScoreResult<T> = core::result::Result<T, ScoreError>;

#[derive(Debug, Error)]
pub enum ScoreError {
    /// The level boundaries around a score coincide, leaving nothing to divide progress by.
    #[error("degenerate level span for total score {total_score}: next = prev = {threshold}")]
    DegenerateProgress { total_score: i64, threshold: f64 },

    #[error(transparent)]
    Store(#[from] StoreError),
}
