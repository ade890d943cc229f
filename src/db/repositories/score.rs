use std::num::NonZeroU32;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::instrument;

use super::sql_fragment::{SCORE_FIELDS, STANDING_ORDER};
use crate::db::StoreResult;
use crate::db::models::{GuildId, MemberId, RankedScore, ScoreRecord};
use crate::db::repositories::ScoreStore;

#[derive(Debug)]
pub struct PgScoreStore {
    pool: &'static Pool<Postgres>,
}

impl PgScoreStore {
    pub fn new(pool: &'static Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    #[instrument(skip(self))]
    async fn get_score(&self, member_id: MemberId, guild_id: GuildId) -> StoreResult<Option<i64>> {
        let score = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT score FROM scores
            WHERE member_id = $1
            AND guild_id = $2
            "#,
        )
        .bind(member_id)
        .bind(guild_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(score)
    }

    #[instrument(skip(self))]
    async fn get_rank(&self, member_id: MemberId, guild_id: GuildId) -> StoreResult<Option<i64>> {
        // single statement, so rank and partition come from the same snapshot
        let rank = sqlx::query_scalar::<_, i64>(&format!(
            r#"
            SELECT ranking FROM (
                SELECT
                    member_id,
                    ROW_NUMBER() OVER (ORDER BY {STANDING_ORDER}) AS ranking
                FROM scores
                WHERE guild_id = $1 AND active = TRUE
            ) ranked
            WHERE member_id = $2
            "#
        ))
        .bind(guild_id)
        .bind(member_id)
        .fetch_optional(self.pool)
        .await;

        match rank {
            Ok(v) => Ok(v),
            Err(e) => {
                tracing::error!(error = ?e, "rank lookup failure");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_top_active(
        &self,
        guild_id: GuildId,
        limit: NonZeroU32,
    ) -> StoreResult<Vec<RankedScore>> {
        let rows = sqlx::query_as::<_, RankedScore>(&format!(
            r#"
            SELECT member_id, score FROM scores
            WHERE guild_id = $1 AND active = TRUE
            ORDER BY {STANDING_ORDER}
            LIMIT $2
            "#
        ))
        .bind(guild_id)
        .bind(i64::from(limit.get()))
        .fetch_all(self.pool)
        .await?;

        tracing::debug!(count = rows.len(), "fetched top active scores");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn set_score(
        &self,
        member_id: MemberId,
        guild_id: GuildId,
        score: i64,
    ) -> StoreResult<ScoreRecord> {
        let record = sqlx::query_as::<_, ScoreRecord>(&format!(
            r#"
            INSERT INTO scores (
                member_id,
                guild_id,
                score,
                active,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, TRUE, NOW(), NOW())
            ON CONFLICT (member_id, guild_id)
            DO UPDATE SET
                score = $3,
                updated_at = NOW()
            RETURNING {SCORE_FIELDS}
            "#
        ))
        .bind(member_id)
        .bind(guild_id)
        .bind(score)
        .fetch_one(self.pool)
        .await;

        match record {
            Ok(r) => {
                tracing::info!(score = r.score, "score overwritten");
                Ok(r)
            }
            Err(e) => {
                tracing::error!(error = ?e, "score overwrite failure");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_members(&self, guild_id: GuildId) -> StoreResult<Vec<ScoreRecord>> {
        let rows = sqlx::query_as::<_, ScoreRecord>(&format!(
            "SELECT {SCORE_FIELDS} FROM scores WHERE guild_id = $1 ORDER BY member_id ASC"
        ))
        .bind(guild_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
