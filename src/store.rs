//! Persistence collaborators.
//!
//! The search and replace core does not know how notes are stored. It sees
//! a [`NoteStore`]: a bulk read used once when a session starts, and a
//! single-note upsert used once per replaced note. Retries and timeouts,
//! if any, belong to the store implementation.
//!
//! Two stores ship with the crate:
//!
//! - [`MemoryStore`]: keeps notes in process, in insertion order.
//! - [`sqlite::SqliteStore`]: keeps notes in a SQLite file on a shelf.

pub mod sqlite;

use crate::domain::{Note, NoteId};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error("corrupt note record: {0}")]
    Corrupt(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Where notes live between sessions.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Returns every stored note in display order.
    async fn list(&self) -> Result<Vec<Note>, StoreError>;

    /// Inserts or updates one note, addressed by its id.
    ///
    /// Content and attachment are written; an existing note keeps its
    /// original creation time.
    async fn put(&self, note: &Note) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: NoteStore + ?Sized> NoteStore for std::sync::Arc<S> {
    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        (**self).list().await
    }

    async fn put(&self, note: &Note) -> Result<(), StoreError> {
        (**self).put(note).await
    }
}

/// An in-process store. Notes are listed in the order they were first put.
#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: RwLock<Vec<Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `notes`, in that order.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        MemoryStore {
            notes: RwLock::new(notes),
        }
    }

    pub async fn get(&self, id: NoteId) -> Option<Note> {
        self.notes.read().await.iter().find(|n| n.id() == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        Ok(self.notes.read().await.clone())
    }

    async fn put(&self, note: &Note) -> Result<(), StoreError> {
        let mut notes = self.notes.write().await;

        match notes.iter_mut().find(|n| n.id() == note.id()) {
            Some(existing) => {
                *existing = Note::restore(
                    existing.id(),
                    note.content().to_owned(),
                    existing.created_at(),
                    note.attachment().map(str::to_owned),
                );
            }
            None => notes.push(note.clone()),
        }

        Ok(())
    }
}
