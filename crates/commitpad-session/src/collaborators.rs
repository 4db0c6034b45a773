//! External collaborators the manager talks to

use async_trait::async_trait;

use crate::draft::Draft;
use crate::snapshot::RepositoryId;

/// Durable draft storage keyed by repository identity.
///
/// The manager never reads from the store; persisted drafts come back through
/// snapshots. Saving is fire-and-forget: implementations handle (or log)
/// their own failures.
pub trait PersistenceStore: Send + Sync {
    fn save(&self, repository_id: &RepositoryId, draft: &Draft);
}

/// Records a commit from a draft. Resolves `true` on success.
///
/// Failure is a plain `false`, never an error: the draft is kept for retry.
#[async_trait]
pub trait CommitOperation: Send + Sync {
    async fn create(&self, draft: &Draft) -> bool;
}
