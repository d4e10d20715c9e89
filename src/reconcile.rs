//! Persisting replace candidates and folding the results back in.
//!
//! Every candidate gets exactly one write, and all writes run at once on
//! the calling task. [`commit`] waits for every write to settle, failures
//! included, then builds the new collection in a single step: confirmed
//! notes take the place of their originals, everything else stays as it was.
//!
//! A failed write never turns into an `Err`. It is reported as a
//! [`WriteOutcome::Failed`] next to the confirmed ones so the caller can
//! tell the user which notes to retry.

use crate::domain::{Note, NoteCollection, NoteId};
use crate::search::Candidate;
use crate::store::{NoteStore, StoreError};
use futures::future::join_all;
use std::collections::HashMap;
use std::ops::Deref;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A single note that could not be persisted.
#[derive(Debug, Error)]
#[error("failed to persist note {id}: {source}")]
pub struct WriteFailed {
    pub id: NoteId,
    #[source]
    pub source: StoreError,
}

/// How the write for one candidate ended.
#[derive(Debug)]
pub enum WriteOutcome {
    /// The store accepted the edited note.
    Confirmed(Note),
    /// The store rejected it; `original` is the note as it was before the replace.
    Failed { original: Note, error: WriteFailed },
}

impl WriteOutcome {
    pub fn id(&self) -> NoteId {
        match self {
            WriteOutcome::Confirmed(note) => note.id(),
            WriteOutcome::Failed { original, .. } => original.id(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, WriteOutcome::Confirmed(_))
    }
}

/// Every write outcome of one commit, in candidate order.
#[derive(Debug, Default)]
pub struct WriteOutcomes(Vec<WriteOutcome>);

impl WriteOutcomes {
    pub fn confirmed_count(&self) -> usize {
        self.0.iter().filter(|o| o.is_confirmed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.0.len() - self.confirmed_count()
    }

    pub fn failed_ids(&self) -> Vec<NoteId> {
        self.failures().map(|e| e.id).collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = &WriteFailed> {
        self.0.iter().filter_map(|o| match o {
            WriteOutcome::Failed { error, .. } => Some(error),
            WriteOutcome::Confirmed(_) => None,
        })
    }

    fn confirmed(&self) -> HashMap<NoteId, &Note> {
        self.0
            .iter()
            .filter_map(|outcome| match outcome {
                WriteOutcome::Confirmed(note) => Some((note.id(), note)),
                WriteOutcome::Failed { .. } => None,
            })
            .collect()
    }
}

impl Deref for WriteOutcomes {
    type Target = [WriteOutcome];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The merged collection together with every write outcome.
#[derive(Debug)]
pub struct Reconciliation {
    pub collection: NoteCollection,
    pub outcomes: WriteOutcomes,
}

/// Writes every candidate through `store` and merges confirmed notes into
/// `canonical`.
pub async fn commit<S>(
    canonical: &NoteCollection,
    candidates: Vec<Candidate>,
    store: &S,
) -> Reconciliation
where
    S: NoteStore + ?Sized,
{
    commit_with(canonical, candidates, |note| async move { store.put(&note).await }).await
}

/// Like [`commit`], with the single-note write supplied as a function.
///
/// `persist` is called once per candidate with its own copy of the edited
/// note. The returned outcomes follow candidate order; merging goes by id.
pub async fn commit_with<F, Fut>(
    canonical: &NoteCollection,
    candidates: Vec<Candidate>,
    persist: F,
) -> Reconciliation
where
    F: Fn(Note) -> Fut,
    Fut: Future<Output = Result<(), StoreError>>,
{
    let persist = &persist;

    let writes = candidates.into_iter().map(|candidate| async move {
        let (original, mutated) = candidate.into_parts();
        let id = mutated.id();
        debug!(note_id = %id, "dispatching note write");

        match persist(mutated.clone()).await {
            Ok(()) => WriteOutcome::Confirmed(mutated),
            Err(source) => {
                warn!(note_id = %id, error = %source, "note write failed");
                WriteOutcome::Failed {
                    original,
                    error: WriteFailed { id, source },
                }
            }
        }
    });

    let outcomes = WriteOutcomes(join_all(writes).await);

    let confirmed = outcomes.confirmed();
    let collection = canonical.substitute(&confirmed);

    info!(
        total = outcomes.len(),
        confirmed = confirmed.len(),
        failed = outcomes.len() - confirmed.len(),
        "replace committed"
    );

    Reconciliation {
        collection,
        outcomes,
    }
}
