//! Commitpad Storage Layer
//!
//! SQLite-based persistence for commit message drafts and user preferences.
//! Drafts are keyed by repository identity; the last write for a repository wins.

mod database;
mod drafts;
mod error;
mod migrations;

pub use database::Database;
pub use drafts::StoredDraft;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
