use std::num::NonZeroU32;

use tracing::instrument;

use crate::db::models::{GuildId, MemberId};
use crate::db::repositories::ScoreStore;
use crate::score::{ScoreObject, ScoreResult};

/// One scoreboard row: caller-supplied display metadata paired with the member's score.
#[derive(Debug)]
pub struct ScoreboardEntry<'s, S: ScoreStore + ?Sized> {
    pub display_name: String,
    pub score: ScoreObject<'s, S>,
}

/// Top active members of a guild, best first.
///
/// Built from `list_top_active`, which shares its ordering with the single-member rank lookup:
/// an entry listed before another always has the smaller rank.
#[derive(Debug)]
pub struct Scoreboard<'s, S: ScoreStore + ?Sized> {
    pub guild_id: GuildId,
    pub entries: Vec<ScoreboardEntry<'s, S>>,
}

impl<'s, S: ScoreStore + ?Sized> Scoreboard<'s, S> {
    /// Fetches up to `limit` members and names each one through `lookup`, falling back to the
    /// member id when the lookup has nothing.
    #[instrument(skip(store, lookup))]
    pub async fn fetch<F>(
        store: &'s S,
        guild_id: GuildId,
        limit: NonZeroU32,
        lookup: F,
    ) -> ScoreResult<Self>
    where
        F: Fn(MemberId) -> Option<String>,
    {
        let rows = store.list_top_active(guild_id, limit).await?;

        let entries = rows
            .into_iter()
            .map(|row| ScoreboardEntry {
                display_name: lookup(row.member_id).unwrap_or_else(|| row.member_id.to_string()),
                score: ScoreObject::new(row.member_id, guild_id, row.score, store),
            })
            .collect::<Vec<_>>();

        tracing::debug!(entries = entries.len(), "scoreboard fetched");
        Ok(Self { guild_id, entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db::repositories::memory::MemoryScoreStore;

    use crate::constants::SCOREBOARD_LIMIT;

    const GUILD: GuildId = GuildId(3);

    async fn sample() -> MemoryScoreStore {
        MemoryScoreStore::seeded(
            GUILD,
            &[
                (1, 500, true),
                (2, 300, true),
                (3, 300, true),
                (4, 100, false),
                (5, 20, true),
            ],
        )
        .await
    }

    #[tokio::test]
    async fn test_order_consistent_with_rank() {
        let store = sample().await;
        let board = Scoreboard::fetch(&store, GUILD, SCOREBOARD_LIMIT, |_| None).await.unwrap();

        assert_eq!(board.len(), 4);

        let mut last_rank = 0;
        for entry in &board.entries {
            let rank = entry.score.rank().await.unwrap().unwrap();
            assert!(rank > last_rank);
            last_rank = rank;
        }
    }

    #[tokio::test]
    async fn test_limit_two() {
        let store = sample().await;
        let limit = NonZeroU32::new(2).unwrap();
        let board = Scoreboard::fetch(&store, GUILD, limit, |_| None).await.unwrap();

        let ids: Vec<i64> = board.entries.iter().map(|e| e.score.member_id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(board.entries[0].score.rank().await.unwrap(), Some(1));
        assert_eq!(board.entries[1].score.rank().await.unwrap(), Some(2));
        assert_eq!(board.entries[0].score.total_score(), 500);
    }

    #[tokio::test]
    async fn test_lookup_pairs_metadata() {
        let store = sample().await;
        let board = Scoreboard::fetch(&store, GUILD, SCOREBOARD_LIMIT, |id| {
            (id.0 == 1).then(|| "alice".to_string())
        })
        .await
        .unwrap();

        assert_eq!(board.entries[0].display_name, "alice");
        assert_eq!(board.entries[1].display_name, "2");
    }

    #[tokio::test]
    async fn test_unknown_guild_is_empty() {
        let store = sample().await;
        let board = Scoreboard::fetch(&store, GuildId(99), SCOREBOARD_LIMIT, |_| None)
            .await
            .unwrap();
        assert!(board.is_empty());
    }
}
