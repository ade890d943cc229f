use std::sync::LazyLock;

use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::util::env;
use crate::util::env::Var;
use crate::var;

pub mod models;
pub mod repositories;
pub mod schema;

pub mod prelude {
    pub use crate::db::db_pool;
    pub use crate::db::StoreError;

    pub use crate::db::models::GuildId;

    pub use crate::db::repositories::ScoreStore;
    pub use crate::db::repositories::score::PgScoreStore;
}

static DB_POOL: LazyLock<OnceCell<Db>> = LazyLock::new(OnceCell::new);
pub async fn db_pool() -> StoreResult<&'static PgPool> {
    Ok(&DB_POOL
        .get_or_try_init(|| async { Db::new_pool().await })
        .await?
        .pool)
}

struct Db {
    pool: PgPool,
}

impl Db {
    pub async fn new_pool() -> StoreResult<Self> {
        let db_url = var!(Var::DatabaseUrl).await?;
        let pool = sqlx::PgPool::connect(db_url).await?;

        tracing::debug!("database pool connected");
        Ok(Self { pool })
    }
}

pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    SqlxError(#[from] sqlx::Error),

    #[error("{0}")]
    EnvError(#[from] env::EnvErr),
}
