use core::fmt;

use serde::Serialize;
use tracing::instrument;

use super::curve;
use super::{ScoreError, ScoreResult};
use crate::db::models::{GuildId, MemberId};
use crate::db::repositories::ScoreStore;

/// Per-request projection of one member's stored score.
///
/// Holds a snapshot of the total taken at construction; every derived value is recomputed from
/// that snapshot on each call, and [`rank`](Self::rank) goes back to the store every time.
pub struct ScoreObject<'s, S: ScoreStore + ?Sized> {
    pub member_id: MemberId,
    pub guild_id: GuildId,
    total_score: i64,
    store: &'s S,
}

/// Every derived value of a [`ScoreObject`] evaluated once, for renderers and JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSnapshot {
    pub member_id: MemberId,
    pub guild_id: GuildId,
    pub total_score: i64,
    pub level: f64,
    pub score: f64,
    pub next_level_score: f64,
    pub prev_level_score: f64,
    pub progress: f64,
    pub rank: Option<i64>,
}

impl<'s, S: ScoreStore + ?Sized> ScoreObject<'s, S> {
    pub fn new(member_id: MemberId, guild_id: GuildId, total_score: i64, store: &'s S) -> Self {
        Self {
            member_id,
            guild_id,
            total_score,
            store,
        }
    }

    /// Reads the member's score once and binds it; a missing record counts as zero.
    #[instrument(skip(store))]
    pub async fn fetch(store: &'s S, member_id: MemberId, guild_id: GuildId) -> ScoreResult<Self> {
        let total_score = match store.get_score(member_id, guild_id).await? {
            Some(score) => score,
            None => {
                tracing::debug!("no score record, treating as zero");
                0
            }
        };

        Ok(Self::new(member_id, guild_id, total_score, store))
    }

    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    /// Replaces the snapshot. Does not write to the store.
    pub fn set_score(&mut self, total_score: i64) {
        self.total_score = total_score;
    }

    pub fn level(&self) -> f64 {
        curve::level(self.total_score)
    }

    /// Score earned inside the current level.
    ///
    /// Not clamped: a threshold above the total would show up here as a negative value.
    pub fn score(&self) -> f64 {
        self.total_score as f64 - self.prev_level_score()
    }

    pub fn next_level_score(&self) -> f64 {
        curve::next_level_score(self.total_score)
    }

    pub fn prev_level_score(&self) -> f64 {
        curve::prev_level_score(self.total_score)
    }

    /// Percentage of the current level completed.
    pub fn progress(&self) -> ScoreResult<f64> {
        progress_between(
            self.total_score,
            self.next_level_score(),
            self.prev_level_score(),
        )
    }

    /// Current standing among active members of the guild, `None` when unranked.
    #[instrument(skip(self), fields(member = self.member_id.0, guild = self.guild_id.0))]
    pub async fn rank(&self) -> ScoreResult<Option<i64>> {
        Ok(self.store.get_rank(self.member_id, self.guild_id).await?)
    }

    pub async fn snapshot(&self) -> ScoreResult<ScoreSnapshot> {
        Ok(ScoreSnapshot {
            member_id: self.member_id,
            guild_id: self.guild_id,
            total_score: self.total_score,
            level: self.level(),
            score: self.score(),
            next_level_score: self.next_level_score(),
            prev_level_score: self.prev_level_score(),
            progress: self.progress()?,
            rank: self.rank().await?,
        })
    }

    /// Short form, e.g. `Level 1.7 (#3)`.
    pub async fn summary(&self) -> ScoreResult<String> {
        let rank = match self.rank().await? {
            Some(r) => r.to_string(),
            None => crate::constants::UNRANKED_LABEL.to_string(),
        };

        Ok(format!("Level {} (#{rank})", self.level()))
    }

    /// Multi-line dump of the snapshot and all derived values, recomputed now.
    ///
    /// A degenerate progress span is shown inline instead of aborting the dump.
    pub async fn debug_repr(&self) -> ScoreResult<String> {
        let rank = self.rank().await?;
        let progress = progress_label(self.progress());

        Ok(format!(
            "ScoreObject(\
            \n\tmember_id={},\
            \n\tguild_id={},\
            \n\ttotal_score={},\
            \n\trank={:?},\
            \n\tlevel={},\
            \n\tscore={},\
            \n\tnext_level_score={},\
            \n\tprev_level_score={},\
            \n\tprogress={}\
            \n)",
            self.member_id,
            self.guild_id,
            self.total_score,
            rank,
            self.level(),
            self.score(),
            self.next_level_score(),
            self.prev_level_score(),
            progress,
        ))
    }
}

/// Share of the `prev..next` span covered by `total_score`, as a percentage.
fn progress_between(total_score: i64, next: f64, prev: f64) -> ScoreResult<f64> {
    let span = next - prev;

    if span == 0.0 {
        tracing::warn!(total_score, next, "zero-width level span");
        return Err(ScoreError::DegenerateProgress {
            total_score,
            threshold: next,
        });
    }

    Ok((total_score as f64 - prev) / span * 100.0)
}

fn progress_label(progress: ScoreResult<f64>) -> String {
    match progress {
        Ok(p) => p.to_string(),
        Err(e) => format!("<{e}>"),
    }
}

impl<S: ScoreStore + ?Sized> fmt::Debug for ScoreObject<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreObject")
            .field("member_id", &self.member_id)
            .field("guild_id", &self.guild_id)
            .field("total_score", &self.total_score)
            .finish_non_exhaustive()
    }
}
