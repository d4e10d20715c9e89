use crate::config::StoreConfig;
use crate::domain::{Note, NoteId};
use crate::error::ScratchError;
use crate::store::{NoteStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::debug;

/// Notes kept in a single SQLite file.
///
/// Listing returns notes in the order they were first written.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the store for a configured shelf, creating the shelf
    /// directory and database on first use.
    pub async fn connect(config: &StoreConfig) -> Result<Self, ScratchError> {
        let db_path = config.database_path()?;
        if let Some(dir) = db_path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        Ok(Self::open(&db_path).await?)
    }

    /// Opens (or creates) a store at an explicit database path.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let connection_path = format!("sqlite:{}?mode=rwc", db_path.display());
        debug!(path = %db_path.display(), "opening note store");

        let pool = SqlitePool::connect(&connection_path).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notes (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT UNIQUE NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                attachment TEXT,
                created_at TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await?;

        Ok(SqliteStore { pool })
    }

    pub async fn get(&self, id: NoteId) -> Result<Option<Note>, StoreError> {
        let row = sqlx::query("SELECT id, content, created_at, attachment FROM notes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| note_from_row(&row)).transpose()
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.get(0);
        Ok(count as u64)
    }
}

fn note_from_row(row: &SqliteRow) -> Result<Note, StoreError> {
    let id: String = row.try_get("id")?;
    let content: String = row.try_get("content")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let attachment: Option<String> = row.try_get("attachment")?;

    let id = NoteId::parse(&id).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    Ok(Note::restore(id, content, created_at, attachment))
}

#[async_trait]
impl NoteStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        let rows = sqlx::query("SELECT id, content, created_at, attachment FROM notes ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(note_from_row).collect()
    }

    async fn put(&self, note: &Note) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO notes (id, content, attachment, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                content = excluded.content,
                attachment = excluded.attachment,
                updated_at = CURRENT_TIMESTAMP",
        )
        .bind(note.id().to_string())
        .bind(note.content())
        .bind(note.attachment())
        .bind(note.created_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
