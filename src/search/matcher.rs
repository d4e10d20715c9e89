use crate::domain::{Note, NoteCollection, NoteId};
use crate::search::replace::LiteralPattern;
use tracing::warn;

/// The ordered notes whose content contains a search term, ignoring case.
///
/// Only [`find`] builds a `MatchSet`, so anything holding one is holding the
/// exact result of a search against some collection. Order follows the
/// collection the search ran over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    term: String,
    notes: Vec<Note>,
}

impl MatchSet {
    /// The search term this set was computed for.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(Note::id).collect()
    }

    /// Narrows the set to the notes whose id is in `ids`, keeping order.
    ///
    /// The result can only be smaller, so it is still a valid replace scope.
    pub fn retain(&self, ids: &[NoteId]) -> MatchSet {
        MatchSet {
            term: self.term.clone(),
            notes: self
                .notes
                .iter()
                .filter(|note| ids.contains(&note.id()))
                .cloned()
                .collect(),
        }
    }

    /// Re-reads the same notes, by id, from a newer version of the collection.
    ///
    /// Membership is not recomputed: a note stays in the set even if its new
    /// content no longer contains the term.
    pub(crate) fn refreshed(&self, collection: &NoteCollection) -> MatchSet {
        let notes = self
            .notes
            .iter()
            .filter_map(|note| collection.get(note.id()).cloned())
            .collect();

        MatchSet {
            term: self.term.clone(),
            notes,
        }
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

/// Finds every note whose content contains `query`, case-insensitively.
///
/// `query` is plain text, not a pattern. Case is compared with the same
/// [`LiteralPattern`] the replacer uses, so every returned note has at least
/// one occurrence to replace. An empty query selects nothing so that
/// clearing the search box can never widen a later replace to the whole
/// collection; callers show "no active search" separately (see
/// [`SearchView`]).
pub fn find(collection: &NoteCollection, query: &str) -> MatchSet {
    let notes = if query.is_empty() {
        Vec::new()
    } else {
        match LiteralPattern::new(query) {
            Ok(pattern) => collection
                .iter()
                .filter(|note| pattern.is_match(note.content()))
                .cloned()
                .collect(),
            Err(e) => {
                // Such a query cannot be replaced either, so it matches nothing.
                warn!(error = %e, "search term rejected by the pattern engine");
                Vec::new()
            }
        }
    };

    MatchSet {
        term: query.to_owned(),
        notes,
    }
}

/// What a search box currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
    /// No term entered; the full collection is on display.
    Inactive,
    /// A term was entered and nothing contains it.
    NoResults { term: String },
    /// A term was entered and at least one note contains it.
    Results(MatchSet),
}

impl SearchView {
    /// Runs a search and classifies the outcome.
    pub fn from_query(collection: &NoteCollection, query: &str) -> SearchView {
        if query.is_empty() {
            return SearchView::Inactive;
        }

        let matches = find(collection, query);
        if matches.is_empty() {
            SearchView::NoResults {
                term: query.to_owned(),
            }
        } else {
            SearchView::Results(matches)
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, SearchView::Inactive)
    }

    /// The matched notes, or `None` when there is nothing to show.
    pub fn matches(&self) -> Option<&MatchSet> {
        match self {
            SearchView::Results(matches) => Some(matches),
            _ => None,
        }
    }
}
