//! Square-root level curve.
//!
//! `level(s) = 0.07 * sqrt(max(s, 1)) + 1`, so every level costs more raw score than the one
//! before it. Whole-number levels are the boundaries; the fractional part of [`level`] is not
//! used as progress (see [`ScoreObject::progress`](super::object::ScoreObject::progress)).

use crate::constants::LEVEL_COEFFICIENT;

/// Continuous level for an accumulated score. Always `>= 1`.
pub fn level(total_score: i64) -> f64 {
    LEVEL_COEFFICIENT * (total_score.max(1) as f64).sqrt() + 1.0
}

/// Raw score at which the linear part of the curve reaches `boundary`.
///
/// Inverse of `level` without its `+ 1` offset: `level(score_threshold(l)) == l + 1`.
pub fn score_threshold(boundary: f64) -> f64 {
    (boundary / LEVEL_COEFFICIENT).powi(2)
}

pub fn next_level_score(total_score: i64) -> f64 {
    score_threshold((level(total_score) - 1.0).ceil())
}

/// Threshold of the level the score currently sits in.
///
/// The boundary is not clamped. A negative boundary would square into a positive threshold, but
/// with `level >= 1` the argument is at least `ceil(-1 + 0.07) == -0.0`, which maps to `0.0`.
pub fn prev_level_score(total_score: i64) -> f64 {
    score_threshold((level(total_score) - 2.0).ceil())
}
