//! Commitpad Draft Sessions
//!
//! Keeps an in-progress commit message consistent across three sources:
//! - local keystroke edits
//! - the persisted draft for the current repository
//! - a contextually suggested message (merge or template message)
//!
//! Inbound snapshots go through a priority policy that never lets a stale
//! echo of the user's own typing overwrite the local draft, while still
//! adopting persisted drafts on repository switches and genuinely new
//! suggestions as soon as they appear.

mod co_authors;
mod collaborators;
mod draft;
mod error;
mod manager;
mod session;
mod shortcut;
mod snapshot;
mod state;

pub use co_authors::{CoAuthor, CoAuthorToggle, MenuItem};
pub use collaborators::{CommitOperation, PersistenceStore};
pub use draft::{same_message, ContextualMessage, Draft, DraftEdit};
pub use error::SessionError;
pub use manager::DraftSessionManager;
pub use session::{transition, Effect, Reconciliation, Session, SessionEvent, Transition};
pub use shortcut::{Key, KeyOutcome, KeyPress, Modifiers, Platform};
pub use snapshot::{RepositoryId, SessionSnapshot};
pub use state::{CommitOutcome, CommitState};

pub type Result<T> = std::result::Result<T, SessionError>;
