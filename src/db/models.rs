use core::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct MemberId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct GuildId(pub i64);

/// Base `scores` table model; at most one row per `(member_id, guild_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScoreRecord {
    pub member_id: MemberId,
    pub guild_id: GuildId,
    pub score: i64,
    pub active: bool,
    pub updated_at: NaiveDateTime,
}

/// One row of a ranked listing, ordered by standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RankedScore {
    pub member_id: MemberId,
    pub score: i64,
}

impl From<i64> for MemberId {
    fn from(value: i64) -> Self {
        MemberId(value)
    }
}

impl From<i64> for GuildId {
    fn from(value: i64) -> Self {
        GuildId(value)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.active { "active" } else { "inactive" };
        write!(
            f,
            "{} score={} {} (updated {})",
            self.member_id, self.score, state, self.updated_at
        )
    }
}
