//! Commit State Machine
//!
//! ```text
//! Editing
//!   ↓ submit (gated by can_commit)
//! Committing
//!   ↓ operation resolves (true clears the draft, false keeps it)
//! Editing
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitState {
    /// Accepting edits, no commit in flight
    #[default]
    Editing,
    /// A commit operation is outstanding. Edits are still accepted.
    Committing,
}

/// How a submit attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    /// The operation resolved true; the draft was cleared
    Committed,
    /// The operation resolved false; the draft was kept for retry
    Failed,
    /// `can_commit` was false, or another commit is still in flight;
    /// nothing was invoked
    NotReady,
}

impl CommitState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: CommitState) -> bool {
        match (self, target) {
            (CommitState::Editing, CommitState::Committing) => true,
            (CommitState::Committing, CommitState::Editing) => true,
            // At most one commit in flight per session
            (CommitState::Committing, CommitState::Committing) => false,
            (CommitState::Editing, CommitState::Editing) => false,
        }
    }

    pub fn is_committing(&self) -> bool {
        matches!(self, CommitState::Committing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitState::Editing => "editing",
            CommitState::Committing => "committing",
        }
    }
}

impl std::fmt::Display for CommitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CommitState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "editing" => Ok(CommitState::Editing),
            "committing" => Ok(CommitState::Committing),
            _ => Err(format!("Unknown commit state: {}", s)),
        }
    }
}
