use std::num::NonZeroU32;

use async_trait::async_trait;

use crate::db::StoreResult;
use crate::db::models::{GuildId, MemberId, RankedScore, ScoreRecord};

#[cfg(test)]
pub mod memory;
pub mod score;

pub mod sql_fragment {
    pub const SCORE_FIELDS: &str = r#"
        member_id,
        guild_id,
        score,
        active,
        updated_at
    "#;

    /// Standing order shared by rank lookups and top-N listings. Ties on score fall back to the
    /// lower member id so that both queries agree on every position.
    pub const STANDING_ORDER: &str = "score DESC, member_id ASC";
}

/// Query surface of the score store.
///
/// Ranks are positions among *active* rows of one guild under
/// [`sql_fragment::STANDING_ORDER`], so within a guild they always form `1..=N`. Implementations
/// must re-run the lookup on every call: nothing here is cached.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Raw accumulated score, or `None` when the member has no record in the guild.
    async fn get_score(&self, member_id: MemberId, guild_id: GuildId) -> StoreResult<Option<i64>>;

    /// 1-based standing among active members; `None` when unranked (no record, or inactive).
    async fn get_rank(&self, member_id: MemberId, guild_id: GuildId) -> StoreResult<Option<i64>>;

    /// Highest-standing active members of a guild, best first, at most `limit` of them.
    async fn list_top_active(
        &self,
        guild_id: GuildId,
        limit: NonZeroU32,
    ) -> StoreResult<Vec<RankedScore>>;

    /// Administrative overwrite of a member's score. Creates an active record when missing.
    async fn set_score(
        &self,
        member_id: MemberId,
        guild_id: GuildId,
        score: i64,
    ) -> StoreResult<ScoreRecord>;

    /// Every record of a guild regardless of `active`, ordered by member id.
    async fn list_members(&self, guild_id: GuildId) -> StoreResult<Vec<ScoreRecord>>;
}
