//! Commitpad Core
//!
//! Wires the draft session manager to its collaborators: SQLite-backed draft
//! persistence and a git-backed commit operation.

mod composer;
mod config;
mod error;
mod git;
mod store;

pub use composer::Composer;
pub use config::Config;
pub use error::CoreError;
pub use git::GitCommitOperation;
pub use store::SqliteDraftStore;

pub use commitpad_session::{
    CoAuthor, CoAuthorToggle, CommitOperation, CommitOutcome, CommitState, ContextualMessage,
    Draft, DraftEdit, DraftSessionManager, Key, KeyOutcome, KeyPress, MenuItem, Modifiers,
    PersistenceStore, Platform, Reconciliation, RepositoryId, Session, SessionError,
    SessionSnapshot,
};
pub use commitpad_storage::{Database, StorageError, StoredDraft};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    init_logging_with("info");
}

/// Initialize logging with a fallback filter used when `RUST_LOG` is unset
pub fn init_logging_with(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt().with_env_filter(filter).with_target(true).init();
}
