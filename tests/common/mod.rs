#![allow(dead_code)]

use async_trait::async_trait;
use scratch_core::domain::{Note, NoteCollection, NoteId};
use scratch_core::store::{MemoryStore, NoteStore, StoreError};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::Barrier;

/// A store that rejects writes for chosen ids and can hold writes back.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    failing: HashSet<NoteId>,
    delays: HashMap<NoteId, Duration>,
    barrier: Option<Barrier>,
}

impl FlakyStore {
    pub fn with_notes(notes: Vec<Note>) -> Self {
        FlakyStore {
            inner: MemoryStore::with_notes(notes),
            ..Default::default()
        }
    }

    pub fn fail_on(mut self, id: NoteId) -> Self {
        self.failing.insert(id);
        self
    }

    pub fn delay(mut self, id: NoteId, by: Duration) -> Self {
        self.delays.insert(id, by);
        self
    }

    /// Every write waits until `n` writes are in flight at the same time.
    pub fn rendezvous(mut self, n: usize) -> Self {
        self.barrier = Some(Barrier::new(n));
        self
    }
}

#[async_trait]
impl NoteStore for FlakyStore {
    async fn list(&self) -> Result<Vec<Note>, StoreError> {
        self.inner.list().await
    }

    async fn put(&self, note: &Note) -> Result<(), StoreError> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.delays.get(&note.id()) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&note.id()) {
            return Err(StoreError::Unavailable(format!("rejected {}", note.id())));
        }
        self.inner.put(note).await
    }
}

pub fn notes(contents: &[&str]) -> Vec<Note> {
    contents.iter().map(|c| Note::new(*c)).collect()
}

pub fn collection(contents: &[&str]) -> NoteCollection {
    NoteCollection::new(notes(contents)).unwrap()
}
