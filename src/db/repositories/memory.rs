//! In-memory [`ScoreStore`] honouring the same standing order as the Postgres queries.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::num::NonZeroU32;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::StoreResult;
use crate::db::models::{GuildId, MemberId, RankedScore, ScoreRecord};
use crate::db::repositories::ScoreStore;

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    records: RwLock<HashMap<(MemberId, GuildId), ScoreRecord>>,
}

/// Mirrors `sql_fragment::STANDING_ORDER`.
fn standing(a: &RankedScore, b: &RankedScore) -> Ordering {
    b.score.cmp(&a.score).then(a.member_id.cmp(&b.member_id))
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store for one guild from `(member_id, score, active)` triples.
    pub async fn seeded(guild_id: GuildId, rows: &[(i64, i64, bool)]) -> Self {
        let store = Self::new();
        for &(member_id, score, active) in rows {
            store
                .insert(ScoreRecord {
                    member_id: MemberId(member_id),
                    guild_id,
                    score,
                    active,
                    updated_at: Utc::now().naive_utc(),
                })
                .await;
        }
        store
    }

    pub async fn insert(&self, record: ScoreRecord) {
        self.records
            .write()
            .await
            .insert((record.member_id, record.guild_id), record);
    }

    pub async fn set_active(&self, member_id: MemberId, guild_id: GuildId, active: bool) {
        if let Some(r) = self.records.write().await.get_mut(&(member_id, guild_id)) {
            r.active = active;
        }
    }

    async fn ranked(&self, guild_id: GuildId) -> Vec<RankedScore> {
        let records = self.records.read().await;
        let mut rows: Vec<RankedScore> = records
            .values()
            .filter(|r| r.guild_id == guild_id && r.active)
            .map(|r| RankedScore {
                member_id: r.member_id,
                score: r.score,
            })
            .collect();

        rows.sort_by(standing);
        rows
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn get_score(&self, member_id: MemberId, guild_id: GuildId) -> StoreResult<Option<i64>> {
        Ok(self
            .records
            .read()
            .await
            .get(&(member_id, guild_id))
            .map(|r| r.score))
    }

    async fn get_rank(&self, member_id: MemberId, guild_id: GuildId) -> StoreResult<Option<i64>> {
        Ok(self
            .ranked(guild_id)
            .await
            .iter()
            .position(|r| r.member_id == member_id)
            .map(|idx| idx as i64 + 1))
    }

    async fn list_top_active(
        &self,
        guild_id: GuildId,
        limit: NonZeroU32,
    ) -> StoreResult<Vec<RankedScore>> {
        let limit = limit.get() as usize;
        Ok(self.ranked(guild_id).await.into_iter().take(limit).collect())
    }

    async fn set_score(
        &self,
        member_id: MemberId,
        guild_id: GuildId,
        score: i64,
    ) -> StoreResult<ScoreRecord> {
        let mut records = self.records.write().await;
        let record = records
            .entry((member_id, guild_id))
            .or_insert_with(|| ScoreRecord {
                member_id,
                guild_id,
                score,
                active: true,
                updated_at: Utc::now().naive_utc(),
            });

        record.score = score;
        record.updated_at = Utc::now().naive_utc();
        Ok(record.clone())
    }

    async fn list_members(&self, guild_id: GuildId) -> StoreResult<Vec<ScoreRecord>> {
        let mut rows: Vec<ScoreRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.guild_id == guild_id)
            .cloned()
            .collect();

        rows.sort_by_key(|r| r.member_id);
        Ok(rows)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const GUILD: GuildId = GuildId(7);

    fn limit(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    // A=500, B=300, C=300, D=100 (inactive), E=50
    async fn sample() -> MemoryScoreStore {
        MemoryScoreStore::seeded(
            GUILD,
            &[
                (1, 500, true),
                (3, 300, true),
                (2, 300, true),
                (4, 100, false),
                (5, 50, true),
            ],
        )
        .await
    }

    #[tokio::test]
    async fn test_ranks_form_permutation() {
        let store = sample().await;
        let mut ranks = Vec::new();
        for id in [1, 2, 3, 5] {
            ranks.push(store.get_rank(MemberId(id), GUILD).await.unwrap().unwrap());
        }
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_tie_broken_by_member_id() {
        let store = sample().await;
        assert_eq!(store.get_rank(MemberId(1), GUILD).await.unwrap(), Some(1));
        assert_eq!(store.get_rank(MemberId(2), GUILD).await.unwrap(), Some(2));
        assert_eq!(store.get_rank(MemberId(3), GUILD).await.unwrap(), Some(3));
        assert_eq!(store.get_rank(MemberId(5), GUILD).await.unwrap(), Some(4));

        // repeated queries against unchanged data agree
        for _ in 0..3 {
            assert_eq!(store.get_rank(MemberId(3), GUILD).await.unwrap(), Some(3));
        }
    }

    #[tokio::test]
    async fn test_inactive_and_unknown_are_unranked() {
        let store = sample().await;
        assert_eq!(store.get_rank(MemberId(4), GUILD).await.unwrap(), None);
        assert_eq!(store.get_rank(MemberId(99), GUILD).await.unwrap(), None);
        assert_eq!(store.get_rank(MemberId(1), GuildId(8)).await.unwrap(), None);

        // inactive members still have a score
        assert_eq!(store.get_score(MemberId(4), GUILD).await.unwrap(), Some(100));
        assert_eq!(store.get_score(MemberId(99), GUILD).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_top_active_matches_ranks() {
        let store = sample().await;
        let top = store.list_top_active(GUILD, limit(2)).await.unwrap();

        assert_eq!(
            top,
            vec![
                RankedScore { member_id: MemberId(1), score: 500 },
                RankedScore { member_id: MemberId(2), score: 300 },
            ]
        );

        for (idx, row) in top.iter().enumerate() {
            let rank = store.get_rank(row.member_id, GUILD).await.unwrap();
            assert_eq!(rank, Some(idx as i64 + 1));
        }
    }

    #[tokio::test]
    async fn test_set_score_upserts() {
        let store = sample().await;

        let updated = store.set_score(MemberId(5), GUILD, 1000).await.unwrap();
        assert_eq!(updated.score, 1000);
        assert_eq!(store.get_rank(MemberId(5), GUILD).await.unwrap(), Some(1));

        let created = store.set_score(MemberId(42), GUILD, 10).await.unwrap();
        assert!(created.active);
        assert_eq!(store.get_score(MemberId(42), GUILD).await.unwrap(), Some(10));
    }

    #[tokio::test]
    async fn test_list_members_includes_inactive() {
        let store = sample().await;
        store.set_active(MemberId(1), GUILD, false).await;

        let members = store.list_members(GUILD).await.unwrap();
        let flags: Vec<(i64, bool)> = members.iter().map(|r| (r.member_id.0, r.active)).collect();
        assert_eq!(
            flags,
            vec![(1, false), (2, true), (3, true), (4, false), (5, true)]
        );
    }

    #[tokio::test]
    async fn test_top_active_limit_bounds() {
        let store = sample().await;

        let one = store.list_top_active(GUILD, limit(1)).await.unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].member_id, MemberId(1));

        // a limit past the number of active members returns all of them
        let all = store.list_top_active(GUILD, limit(u32::MAX)).await.unwrap();
        assert_eq!(all.len(), 4);
    }
}
