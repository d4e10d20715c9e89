//! # scratch_core
//!
//! The search and bulk-replace engine behind a note-taking client: find the
//! notes containing a term, rewrite that term in exactly those notes, write
//! each edited note back to the store, and merge the writes that succeeded
//! into the in-memory collection.
//!
//! ## Features
//!
//! - **Literal search**: Case-insensitive substring search over note content
//! - **Safe replace**: Search terms are escaped before becoming patterns, and
//!   replacement text is inserted verbatim
//! - **Scoped edits**: A replace only ever touches the result of a search
//! - **Concurrent writes**: One write per edited note, all in flight together
//! - **Partial failure**: Failed writes are reported, confirmed ones are kept
//! - **Pluggable storage**: In-memory and SQLite stores behind one trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scratch_core::config::StoreConfig;
//! use scratch_core::session::NoteSession;
//! use scratch_core::store::SqliteStore;
//!
//! # async fn run() -> scratch_core::ScratchResult<()> {
//! let store = SqliteStore::connect(&StoreConfig::new("my-notes")).await?;
//! let mut session = NoteSession::load(store).await?;
//!
//! session.search("milk");
//! let report = session.replace_all("bread").await?;
//! println!("{}", report.summary());
//!
//! if report.failed() > 0 {
//!     let retried = session.retry_failed(&report).await?;
//!     println!("{}", retried.summary());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`domain`]**: Notes, note ids and the ordered note collection
//! - **[`search`]**: Matching and replace candidates, no I/O
//! - **[`reconcile`]**: Concurrent writes and merging of confirmed notes
//! - **[`store`]**: The storage trait and its in-memory and SQLite stores
//! - **[`session`]**: Search-as-you-type and replace-all over one store
//! - **[`config`]**: Where the SQLite store keeps its file
//! - **[`error`]**: Unified error handling throughout the library
//!
//! ## Error Handling
//!
//! Fallible operations return [`ScratchResult<T>`], which wraps the unified
//! [`ScratchError`]. Sub-module errors convert automatically, so `?` works
//! throughout. Failed note writes are the exception: they are collected as
//! [`reconcile::WriteOutcome::Failed`] values instead of aborting a replace.
//!
//! ## Logging
//!
//! The crate logs through [`tracing`] and never installs a subscriber.

pub mod config;
pub mod domain;
pub mod error;
pub mod reconcile;
pub mod search;
pub mod session;
pub mod store;

/// Re-exports the most commonly used types for convenience.
pub use error::{ScratchError, ScratchResult};
