use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("duplicate note id: {0}")]
    DuplicateId(NoteId),
    #[error("invalid note id: {0}")]
    InvalidId(#[from] uuid::Error),
}

/// Opaque identity of a note, stable for the note's whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        NoteId(Uuid::new_v4())
    }

    /// Parses an id from its hyphenated string form.
    pub fn parse(s: &str) -> Result<Self, NoteError> {
        Ok(NoteId(Uuid::parse_str(s)?))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NoteId {
    fn from(id: Uuid) -> Self {
        NoteId(id)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A single note: an id, its text body, when it was created, and an
/// optional attachment handle.
///
/// Notes are immutable values. Edits produce a new `Note` through
/// [`Note::with_content`], which keeps the id, creation time and
/// attachment of the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    content: String,
    created_at: DateTime<Utc>,
    attachment: Option<String>,
}

impl Note {
    /// Creates a brand-new note with a fresh id, stamped with the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Note {
            id: NoteId::new(),
            content: content.into(),
            created_at: Utc::now(),
            attachment: None,
        }
    }

    /// Rebuilds a note from stored fields.
    ///
    /// Used by stores when reading notes back; no field is generated.
    pub fn restore(
        id: NoteId,
        content: String,
        created_at: DateTime<Utc>,
        attachment: Option<String>,
    ) -> Self {
        Note {
            id,
            content,
            created_at,
            attachment,
        }
    }

    /// Returns a copy of this note with an attachment handle set.
    pub fn with_attachment(&self, attachment: impl Into<String>) -> Note {
        Note {
            attachment: Some(attachment.into()),
            ..self.clone()
        }
    }

    /// Returns an in-memory copy of this note with new content.
    ///
    /// Nothing is persisted; the id, `created_at` and attachment are carried
    /// over unchanged.
    pub fn with_content(&self, new_content: String) -> Note {
        Note {
            id: self.id,
            content: new_content,
            created_at: self.created_at,
            attachment: self.attachment.clone(),
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }

    /// First line of the trimmed content, used as the note's label in lists.
    pub fn headline(&self) -> &str {
        self.content.trim().lines().next().unwrap_or("")
    }
}

/// The canonical, ordered set of notes.
///
/// Order is display order and ids are unique. A collection is never edited
/// in place: reconciliation builds a new collection with confirmed notes
/// substituted at their original positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    /// Builds a collection, rejecting input that repeats an id.
    pub fn new(notes: Vec<Note>) -> Result<Self, NoteError> {
        let mut seen = HashSet::with_capacity(notes.len());
        for note in &notes {
            if !seen.insert(note.id()) {
                return Err(NoteError::DuplicateId(note.id()));
            }
        }
        Ok(NoteCollection { notes })
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

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id() == id)
    }

    pub fn ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(Note::id).collect()
    }

    /// Returns a new collection where every note whose id is a key of
    /// `updates` is swapped for the mapped note. Positions are kept and
    /// ids not present in the collection are ignored.
    pub(crate) fn substitute(&self, updates: &HashMap<NoteId, &Note>) -> NoteCollection {
        let notes = self
            .notes
            .iter()
            .map(|note| match updates.get(&note.id()) {
                Some(updated) => (*updated).clone(),
                None => note.clone(),
            })
            .collect();

        NoteCollection { notes }
    }
}

impl<'a> IntoIterator for &'a NoteCollection {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}
