//! SQLite-backed draft persistence

use commitpad_session::{Draft, PersistenceStore, RepositoryId};
use commitpad_storage::Database;

use crate::Result;

/// Persists flushed drafts into the `drafts` table.
///
/// Empty drafts are not stored: flushing one removes the repository's row so
/// the next mount starts clean.
pub struct SqliteDraftStore {
    db: Database,
}

impl SqliteDraftStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Read the persisted draft for a repository, for building snapshots
    pub fn load(&self, repository_id: &RepositoryId) -> Result<Option<Draft>> {
        let stored = self.db.load_draft(repository_id.as_str())?;
        Ok(stored.map(|d| Draft::new(d.summary, d.description)))
    }

    fn write(&self, repository_id: &RepositoryId, draft: &Draft) -> Result<()> {
        if draft.is_empty() {
            self.db.delete_draft(repository_id.as_str())?;
        } else {
            self.db.save_draft(
                repository_id.as_str(),
                &draft.summary,
                draft.description.as_deref(),
            )?;
        }
        Ok(())
    }
}

impl PersistenceStore for SqliteDraftStore {
    fn save(&self, repository_id: &RepositoryId, draft: &Draft) {
        if let Err(e) = self.write(repository_id, draft) {
            tracing::warn!(repository_id = %repository_id, "Failed to persist draft: {}", e);
        }
    }
}

impl Clone for SqliteDraftStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
