use sqlx::{Pool, Postgres};
use tracing::instrument;

use crate::db::StoreResult;

/// Idempotent DDL for the `scores` table, executed one statement at a time.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS scores (
        member_id BIGINT NOT NULL,
        guild_id BIGINT NOT NULL,
        score BIGINT NOT NULL DEFAULT 0 CHECK (score >= 0),
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMP NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMP NOT NULL DEFAULT NOW(),
        PRIMARY KEY (member_id, guild_id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS scores_guild_standing_idx
    ON scores (guild_id, active, score DESC, member_id ASC)
    "#,
];

#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &'static Pool<Postgres>) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(statements = SCHEMA.len(), "schema ensured");
    Ok(())
}
