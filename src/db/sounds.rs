use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{SoundStore, StoreError};
use crate::models::sound::Sound;

type SoundRow = (String, String, String, String, i64, Option<String>, String);

const SELECT_SOUND: &str =
    "SELECT id, name, type, tier, duration, description, url FROM sounds";

fn row_to_sound(row: SoundRow) -> Result<Sound, StoreError> {
    Ok(Sound {
        id: row.0,
        name: row.1,
        kind: row.2.parse().map_err(StoreError::Backend)?,
        tier: row.3.parse().map_err(StoreError::Backend)?,
        duration: row.4,
        description: row.5,
        url: row.6,
    })
}

fn map_write_error(e: sqlx::Error, name: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateName(name.to_string())
        }
        _ => StoreError::Backend(e.to_string()),
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// `SoundStore` backed by the `sounds` table.
#[derive(Clone)]
pub struct SqliteSoundStore {
    pool: SqlitePool,
}

impl SqliteSoundStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SoundStore for SqliteSoundStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Sound>, StoreError> {
        let row = sqlx::query_as::<_, SoundRow>(&format!("{SELECT_SOUND} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        row.map(row_to_sound).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Sound>, StoreError> {
        let row = sqlx::query_as::<_, SoundRow>(&format!("{SELECT_SOUND} WHERE name = ?"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;

        row.map(row_to_sound).transpose()
    }

    async fn insert(&self, sound: &Sound) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO sounds (id, name, type, tier, duration, description, url) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&sound.id)
        .bind(&sound.name)
        .bind(sound.kind.as_str())
        .bind(sound.tier.as_str())
        .bind(sound.duration)
        .bind(&sound.description)
        .bind(&sound.url)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &sound.name))?;

        Ok(())
    }

    async fn update(&self, sound: &Sound) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE sounds SET name = ?, type = ?, tier = ?, duration = ?, description = ?, url = ?, updated_at = datetime('now') WHERE id = ?",
        )
        .bind(&sound.name)
        .bind(sound.kind.as_str())
        .bind(sound.tier.as_str())
        .bind(sound.duration)
        .bind(&sound.description)
        .bind(&sound.url)
        .bind(&sound.id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &sound.name))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM sounds WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Sound>, StoreError> {
        let rows = sqlx::query_as::<_, SoundRow>(&format!(
            "{SELECT_SOUND} ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(row_to_sound).collect()
    }
}
