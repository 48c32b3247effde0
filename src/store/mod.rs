use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

pub mod memory;

pub use crate::{recipes::repo::RecipeStore, users::repo::UserStore};
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (only `users.username` has one).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("owner {0} does not exist")]
    MissingOwner(i64),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Everything the services need from persistence.
pub trait Store: UserStore + RecipeStore {}

impl<T: UserStore + RecipeStore> Store for T {}

/// PostgreSQL-backed store. Row mapping and SQL live in `users::repo` and
/// `recipes::repo`.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

/// Classifies constraint failures reported by Postgres.
pub(crate) fn map_db_error(e: sqlx::Error, owner: Option<i64>) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::UniqueViolation(db.constraint().unwrap_or("unique").to_string());
        }
        if db.is_foreign_key_violation() {
            if let Some(user_id) = owner {
                return StoreError::MissingOwner(user_id);
            }
        }
    }
    StoreError::Database(e)
}
