pub mod sounds;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::models::sound::Sound;

pub use sounds::SqliteSoundStore;

pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

#[derive(Debug)]
pub enum StoreError {
    /// Another record already holds this name.
    DuplicateName(String),
    /// The targeted record does not exist.
    NotFound,
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateName(name) => write!(f, "duplicate sound name: {name}"),
            StoreError::NotFound => f.write_str("sound not found"),
            StoreError::Backend(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Relational persistence for sound records.
#[async_trait]
pub trait SoundStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Sound>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Sound>, StoreError>;

    async fn insert(&self, sound: &Sound) -> Result<(), StoreError>;

    /// Overwrites every mutable column of the record with `sound.id`.
    async fn update(&self, sound: &Sound) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Sound>, StoreError>;
}
