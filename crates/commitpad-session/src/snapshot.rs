//! Inbound snapshots from the host

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::draft::{ContextualMessage, Draft};

/// Logical repository identity that drafts are keyed by
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepositoryId(String);

impl RepositoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RepositoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RepositoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Everything the host knows about the current repository at one point in time.
///
/// Snapshots arrive asynchronously and may echo state the user has already
/// moved past; see [`crate::transition`] for how they are reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub repository_id: RepositoryId,
    /// Last draft the persistence store holds for this repository
    pub persisted_draft: Option<Draft>,
    /// Suggested message derived from repository state
    pub contextual_message: Option<ContextualMessage>,
    /// Whether any changed files are selected for inclusion in the commit
    pub any_files_selected: bool,
    /// Remote hosting identity, if the repository has one
    pub hosting_remote: Option<Url>,
}

impl SessionSnapshot {
    pub fn new(repository_id: impl Into<RepositoryId>) -> Self {
        Self {
            repository_id: repository_id.into(),
            persisted_draft: None,
            contextual_message: None,
            any_files_selected: false,
            hosting_remote: None,
        }
    }

    pub fn with_persisted_draft(mut self, draft: Draft) -> Self {
        self.persisted_draft = Some(draft);
        self
    }

    pub fn with_contextual_message(mut self, message: ContextualMessage) -> Self {
        self.contextual_message = Some(message);
        self
    }

    pub fn with_files_selected(mut self, any_files_selected: bool) -> Self {
        self.any_files_selected = any_files_selected;
        self
    }

    pub fn with_hosting_remote(mut self, remote: Url) -> Self {
        self.hosting_remote = Some(remote);
        self
    }
}
