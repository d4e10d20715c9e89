//! Search and bulk replace over an in-memory note collection.
//!
//! Searching is a case-insensitive substring match over each note's full
//! content. Replacing works on the result of a search, never on the whole
//! collection: [`replace::apply`] only accepts a [`MatchSet`], and a
//! `MatchSet` can only be produced by [`matcher::find`].
//!
//! # Usage
//!
//! ```rust
//! use scratch_core::domain::{Note, NoteCollection};
//! use scratch_core::search::{find, replace, ReplaceSpec};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let notes = NoteCollection::new(vec![
//!     Note::new("Buy milk and MILK again"),
//!     Note::new("Call mom"),
//! ])?;
//!
//! let matches = find(&notes, "milk");
//! assert_eq!(matches.len(), 1);
//!
//! let spec = ReplaceSpec::new("milk", "bread")?;
//! let candidates = replace::apply(&matches, &spec);
//! assert_eq!(candidates[0].mutated().content(), "Buy bread and bread again");
//! # Ok(())
//! # }
//! ```
//!
//! Neither step performs I/O and neither can fail once a [`ReplaceSpec`]
//! has been built. Persisting candidates is the job of
//! [`crate::reconcile::commit`].

pub mod matcher;
pub mod replace;

pub use matcher::{MatchSet, SearchView, find};
pub use replace::{Candidate, LiteralPattern, ReplaceSpec, escape_literal};
