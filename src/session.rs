use crate::domain::{NoteCollection, NoteId};
use crate::error::ScratchResult;
use crate::reconcile::{WriteOutcomes, commit};
use crate::search::{MatchSet, ReplaceSpec, SearchView, find, replace};
use crate::store::NoteStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// The search-as-you-type and replace-all workflow over one store.
///
/// The canonical collection is published as an immutable snapshot. Readers
/// obtained from [`NoteSession::subscribe`] see either the collection from
/// before a replace or the fully merged one after it, never a mix.
pub struct NoteSession<S: NoteStore> {
    store: S,
    collection: watch::Sender<Arc<NoteCollection>>,
    term: String,
    view: SearchView,
}

impl<S: NoteStore> NoteSession<S> {
    /// Starts a session by listing every note in `store`.
    ///
    /// # Errors
    /// Returns [`crate::ScratchError`] if the store cannot be listed or
    /// hands back two notes with the same id.
    pub async fn load(store: S) -> ScratchResult<Self> {
        let collection = NoteCollection::new(store.list().await?)?;
        debug!(notes = collection.len(), "loaded notes");

        let (tx, _rx) = watch::channel(Arc::new(collection));

        Ok(NoteSession {
            store,
            collection: tx,
            term: String::new(),
            view: SearchView::Inactive,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current snapshot of the canonical collection.
    pub fn collection(&self) -> Arc<NoteCollection> {
        self.collection.borrow().clone()
    }

    /// A handle that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<NoteCollection>> {
        self.collection.subscribe()
    }

    /// The active search term; empty when no search is active.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn view(&self) -> &SearchView {
        &self.view
    }

    /// Updates the search term and recomputes the view.
    pub fn search(&mut self, term: &str) -> &SearchView {
        self.term = term.to_owned();
        self.view = SearchView::from_query(&self.collection(), term);
        debug!(
            term,
            matches = self.view.matches().map_or(0, MatchSet::len),
            "search updated"
        );
        &self.view
    }

    /// Re-lists the store and reapplies the active search.
    pub async fn reload(&mut self) -> ScratchResult<()> {
        let collection = NoteCollection::new(self.store.list().await?)?;
        self.collection.send_replace(Arc::new(collection));

        let term = std::mem::take(&mut self.term);
        self.search(&term);
        Ok(())
    }

    /// Replaces the active term with `replacement` in every matching note.
    ///
    /// Matches are recomputed against the current snapshot. With no active
    /// term, or nothing matching it, nothing is written, no snapshot is
    /// published and an empty report is returned.
    pub async fn replace_all(&mut self, replacement: &str) -> ScratchResult<ReplaceReport> {
        let canonical = self.collection();
        let matches = find(&canonical, &self.term);
        self.run_replace(canonical, matches.clone(), matches, replacement)
            .await
    }

    /// Repeats a replace for just the notes that failed in `report`.
    ///
    /// Only notes that still match the report's query are retried.
    pub async fn retry_failed(&mut self, report: &ReplaceReport) -> ScratchResult<ReplaceReport> {
        let canonical = self.collection();
        let matches = find(&canonical, report.query());
        let scope = matches.retain(&report.failed_ids());
        self.run_replace(canonical, scope, matches, report.replacement())
            .await
    }

    async fn run_replace(
        &mut self,
        canonical: Arc<NoteCollection>,
        scope: MatchSet,
        shown: MatchSet,
        replacement: &str,
    ) -> ScratchResult<ReplaceReport> {
        let query = scope.term().to_owned();
        if scope.is_empty() {
            return Ok(ReplaceReport::new(query, replacement, WriteOutcomes::default()));
        }

        let spec = ReplaceSpec::for_matches(&scope, replacement)?;
        let candidates = replace::apply(&scope, &spec);

        let reconciliation = commit(&canonical, candidates, &self.store).await;
        let collection = Arc::new(reconciliation.collection);
        self.collection.send_replace(Arc::clone(&collection));

        let refreshed = shown.refreshed(&collection);
        self.view = if refreshed.is_empty() {
            SearchView::NoResults {
                term: query.clone(),
            }
        } else {
            SearchView::Results(refreshed)
        };

        Ok(ReplaceReport::new(
            query,
            replacement,
            reconciliation.outcomes,
        ))
    }
}

/// What a replace-all did, per note.
#[derive(Debug)]
pub struct ReplaceReport {
    query: String,
    replacement: String,
    outcomes: WriteOutcomes,
}

impl ReplaceReport {
    fn new(query: String, replacement: &str, outcomes: WriteOutcomes) -> Self {
        ReplaceReport {
            query,
            replacement: replacement.to_owned(),
            outcomes,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn outcomes(&self) -> &WriteOutcomes {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn confirmed(&self) -> usize {
        self.outcomes.confirmed_count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.failed_count()
    }

    pub fn failed_ids(&self) -> Vec<NoteId> {
        self.outcomes.failed_ids()
    }

    /// One-line message for the user.
    pub fn summary(&self) -> String {
        match (self.total(), self.failed()) {
            (0, _) => format!("No notes matched \"{}\".", self.query),
            (1, 0) => "Replaced in 1 note.".to_string(),
            (n, 0) => format!("Replaced in {n} notes."),
            (n, f) => format!("{f} of {n} replacements failed."),
        }
    }
}
