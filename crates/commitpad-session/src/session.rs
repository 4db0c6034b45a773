//! Session data structure and the transition function
//!
//! A session is the in-memory draft state for one mounted editing context.
//! Every change, local or external, goes through [`transition`], which is a
//! pure function of the current session and one event. Side effects the host
//! has to perform (flushing a draft to the store) come back as [`Effect`]s.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::draft::{same_message, ContextualMessage, Draft, DraftEdit};
use crate::error::SessionError;
use crate::snapshot::{RepositoryId, SessionSnapshot};
use crate::state::CommitState;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this mounted session (for logs)
    pub id: String,
    /// Repository the draft currently belongs to
    pub repository_id: RepositoryId,
    /// Local draft, the most recent truth
    pub draft: Draft,
    /// Last contextual message observed, used only to detect new ones
    pub last_seen_contextual_message: Option<ContextualMessage>,
    pub commit_state: CommitState,
    pub any_files_selected: bool,
    pub hosting_remote: Option<Url>,
}

/// Which reconciliation rule decided the outcome of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// A contextual message not seen before replaced the draft
    AdoptedContextual,
    /// Repository changed (or first mount) and a persisted draft was restored
    AdoptedPersisted,
    /// Repository changed (or first mount) with nothing persisted
    Reset,
    /// Same repository, nothing new: local draft untouched
    KeptLocal,
}

impl Reconciliation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reconciliation::AdoptedContextual => "adopted_contextual",
            Reconciliation::AdoptedPersisted => "adopted_persisted",
            Reconciliation::Reset => "reset",
            Reconciliation::KeptLocal => "kept_local",
        }
    }
}

impl std::fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Edit(DraftEdit),
    Snapshot(SessionSnapshot),
    CommitStarted,
    /// A commit operation resolved. `repository_id` is the repository the
    /// commit was started for.
    CommitFinished {
        repository_id: RepositoryId,
        success: bool,
    },
    Teardown,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Push a draft to the persistence store before abandoning it
    Flush {
        repository_id: RepositoryId,
        draft: Draft,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub effects: Vec<Effect>,
    /// Set when the event was a snapshot
    pub outcome: Option<Reconciliation>,
}

impl Transition {
    fn quiet(session: Session) -> Self {
        Self {
            session,
            effects: Vec::new(),
            outcome: None,
        }
    }
}

impl Session {
    /// Create a session from the first snapshot seen on mount
    pub fn init(snapshot: SessionSnapshot) -> Self {
        let blank = Self {
            id: Uuid::new_v4().to_string(),
            repository_id: snapshot.repository_id.clone(),
            draft: Draft::empty(),
            last_seen_contextual_message: None,
            commit_state: CommitState::Editing,
            any_files_selected: false,
            hosting_remote: None,
        };

        let (session, outcome) = reconcile(blank, snapshot, true);

        tracing::debug!(
            session_id = %session.id,
            repository_id = %session.repository_id,
            rule = %outcome,
            "Initialized draft session"
        );

        session
    }

    pub fn is_committing(&self) -> bool {
        self.commit_state.is_committing()
    }

    /// Files must be selected and the summary must not be empty.
    /// Evaluated on every call, never cached.
    pub fn can_commit(&self) -> bool {
        self.any_files_selected && !self.draft.summary.is_empty()
    }

    /// Attempt to move the commit state machine
    pub fn transition_to(&mut self, new_state: CommitState) -> Result<()> {
        if !self.commit_state.can_transition_to(new_state) {
            return Err(SessionError::InvalidTransition {
                from: self.commit_state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            session_id = %self.id,
            from = %self.commit_state,
            to = %new_state,
            "Commit state transition"
        );

        self.commit_state = new_state;
        Ok(())
    }
}

/// Apply one event to a session.
pub fn transition(mut session: Session, event: SessionEvent) -> Transition {
    match event {
        SessionEvent::Edit(edit) => {
            session.draft.apply(edit);
            Transition::quiet(session)
        }
        SessionEvent::Snapshot(snapshot) => {
            let mut effects = Vec::new();
            if snapshot.repository_id != session.repository_id {
                effects.push(Effect::Flush {
                    repository_id: session.repository_id.clone(),
                    draft: session.draft.clone(),
                });
            }

            let (session, outcome) = reconcile(session, snapshot, false);

            Transition {
                session,
                effects,
                outcome: Some(outcome),
            }
        }
        SessionEvent::CommitStarted => {
            if let Err(e) = session.transition_to(CommitState::Committing) {
                tracing::warn!(session_id = %session.id, "Ignoring commit start: {}", e);
            }
            Transition::quiet(session)
        }
        SessionEvent::CommitFinished {
            repository_id,
            success,
        } => {
            if let Err(e) = session.transition_to(CommitState::Editing) {
                tracing::warn!(session_id = %session.id, "Ignoring commit result: {}", e);
                return Transition::quiet(session);
            }

            // A repository switch mid-commit must not clear the new repository's draft
            if success && repository_id == session.repository_id {
                session.draft = Draft::empty();
            }

            Transition::quiet(session)
        }
        SessionEvent::Teardown => {
            let effects = vec![Effect::Flush {
                repository_id: session.repository_id.clone(),
                draft: session.draft.clone(),
            }];

            Transition {
                session,
                effects,
                outcome: None,
            }
        }
    }
}

/// The reconciliation policy. First matching rule wins:
///
/// 1. A present contextual message that differs from the last one seen
///    replaces the draft, whatever the local edits.
/// 2. On initialization or repository change, adopt the persisted draft,
///    or reset to empty when there is none.
/// 3. Otherwise keep the local draft. Incoming values are treated as
///    possible echoes of the user's own typing.
///
/// The last seen contextual message is refreshed in every case.
fn reconcile(
    mut session: Session,
    snapshot: SessionSnapshot,
    initializing: bool,
) -> (Session, Reconciliation) {
    let SessionSnapshot {
        repository_id,
        persisted_draft,
        contextual_message,
        any_files_selected,
        hosting_remote,
    } = snapshot;

    let repository_changed = initializing || repository_id != session.repository_id;

    session.repository_id = repository_id;
    session.any_files_selected = any_files_selected;
    session.hosting_remote = hosting_remote;

    let outcome = match contextual_message {
        Some(message)
            if !same_message(Some(&message), session.last_seen_contextual_message.as_ref()) =>
        {
            session.draft = message.clone();
            session.last_seen_contextual_message = Some(message);
            Reconciliation::AdoptedContextual
        }
        contextual_message => {
            session.last_seen_contextual_message = contextual_message;

            if repository_changed {
                match persisted_draft {
                    Some(draft) => {
                        session.draft = draft;
                        Reconciliation::AdoptedPersisted
                    }
                    None => {
                        session.draft = Draft::empty();
                        Reconciliation::Reset
                    }
                }
            } else {
                Reconciliation::KeptLocal
            }
        }
    };

    (session, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_summary(session: Session, text: &str) -> Session {
        transition(session, SessionEvent::Edit(DraftEdit::Summary(text.into()))).session
    }

    fn apply(session: Session, snapshot: SessionSnapshot) -> Transition {
        transition(session, SessionEvent::Snapshot(snapshot))
    }

    #[test]
    fn test_init_without_persisted_draft() {
        let session = Session::init(SessionSnapshot::new("/repos/a"));
        assert_eq!(session.draft, Draft::empty());
        assert_eq!(session.last_seen_contextual_message, None);
        assert_eq!(session.commit_state, CommitState::Editing);
        assert!(!session.is_committing());
    }

    #[test]
    fn test_init_adopts_persisted_draft() {
        let persisted = Draft::new("restored", Some("body".into()));
        let session =
            Session::init(SessionSnapshot::new("/repos/a").with_persisted_draft(persisted.clone()));
        assert_eq!(session.draft, persisted);
    }

    #[test]
    fn test_init_prefers_new_contextual_message() {
        let merge = Draft::new("Merge branch 'x'", None);
        let session = Session::init(
            SessionSnapshot::new("/repos/a")
                .with_persisted_draft(Draft::new("restored", None))
                .with_contextual_message(merge.clone()),
        );
        assert_eq!(session.draft, merge);
        assert_eq!(session.last_seen_contextual_message, Some(merge));
    }

    #[test]
    fn test_snapshots_never_stomp_local_edits() {
        let mut session = Session::init(SessionSnapshot::new("/repos/a"));
        session = edit_summary(session, "w");
        session = edit_summary(session, "wi");

        // Echo of an older persisted value arriving late
        let echo = SessionSnapshot::new("/repos/a").with_persisted_draft(Draft::new("w", None));
        let t = apply(session, echo.clone());
        assert_eq!(t.outcome, Some(Reconciliation::KeptLocal));
        assert!(t.effects.is_empty());

        let mut session = edit_summary(t.session, "wip");
        for _ in 0..5 {
            session = apply(session, echo.clone()).session;
        }

        assert_eq!(session.draft, Draft::new("wip", None));
    }

    #[test]
    fn test_new_contextual_message_overrides_local_edits() {
        let mut session = Session::init(SessionSnapshot::new("/repos/a"));
        session = edit_summary(session, "wip");

        let merge = Draft::new("Merge branch x", Some("details".into()));
        let t = apply(
            session,
            SessionSnapshot::new("/repos/a").with_contextual_message(merge.clone()),
        );

        assert_eq!(t.outcome, Some(Reconciliation::AdoptedContextual));
        assert_eq!(t.session.draft, merge);
        assert_eq!(t.session.last_seen_contextual_message, Some(merge));
    }

    #[test]
    fn test_same_contextual_message_is_not_readopted() {
        let merge = Draft::new("Merge branch x", None);
        let snapshot = SessionSnapshot::new("/repos/a").with_contextual_message(merge.clone());

        let session = Session::init(snapshot.clone());
        let session = edit_summary(session, "Merge branch x, fixed conflicts");

        let t = apply(session, snapshot);
        assert_eq!(t.outcome, Some(Reconciliation::KeptLocal));
        assert_eq!(t.session.draft.summary, "Merge branch x, fixed conflicts");
    }

    #[test]
    fn test_contextual_message_reappearing_after_clearing_is_new() {
        let merge = Draft::new("Merge branch x", None);
        let session = Session::init(
            SessionSnapshot::new("/repos/a").with_contextual_message(merge.clone()),
        );
        let session = edit_summary(session, "mine");

        // Suggestion goes away, last seen is refreshed to absent
        let t = apply(session, SessionSnapshot::new("/repos/a"));
        assert_eq!(t.session.last_seen_contextual_message, None);
        assert_eq!(t.session.draft.summary, "mine");

        // Same text coming back is new relative to what was last seen
        let t = apply(
            t.session,
            SessionSnapshot::new("/repos/a").with_contextual_message(merge.clone()),
        );
        assert_eq!(t.outcome, Some(Reconciliation::AdoptedContextual));
        assert_eq!(t.session.draft, merge);
    }

    #[test]
    fn test_repository_switch_adopts_persisted_draft() {
        let session = Session::init(SessionSnapshot::new("/repos/a"));
        let session = edit_summary(session, "a");

        let persisted = Draft::new("b", Some("d".into()));
        let t = apply(
            session,
            SessionSnapshot::new("/repos/b").with_persisted_draft(persisted.clone()),
        );

        assert_eq!(t.outcome, Some(Reconciliation::AdoptedPersisted));
        assert_eq!(t.session.repository_id, RepositoryId::from("/repos/b"));
        assert_eq!(t.session.draft, persisted);
    }

    #[test]
    fn test_repository_switch_without_persisted_draft_resets() {
        let session = Session::init(SessionSnapshot::new("/repos/a"));
        let session = edit_summary(session, "a");

        let t = apply(session, SessionSnapshot::new("/repos/c"));
        assert_eq!(t.outcome, Some(Reconciliation::Reset));
        assert_eq!(t.session.draft, Draft::empty());
    }

    #[test]
    fn test_repository_switch_flushes_previous_draft_once() {
        let session = Session::init(SessionSnapshot::new("/repos/a"));
        let session = transition(
            edit_summary(session, "a"),
            SessionEvent::Edit(DraftEdit::Description("notes".into())),
        )
        .session;

        let t = apply(
            session,
            SessionSnapshot::new("/repos/b").with_persisted_draft(Draft::new("b", None)),
        );

        assert_eq!(
            t.effects,
            vec![Effect::Flush {
                repository_id: RepositoryId::from("/repos/a"),
                draft: Draft::new("a", Some("notes".into())),
            }]
        );

        // Staying on the new repository does not flush again
        let t = apply(t.session, SessionSnapshot::new("/repos/b"));
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_repository_switch_with_new_contextual_message() {
        let session = Session::init(SessionSnapshot::new("/repos/a"));
        let session = edit_summary(session, "a");

        let merge = Draft::new("Merge branch y", None);
        let t = apply(
            session,
            SessionSnapshot::new("/repos/b")
                .with_persisted_draft(Draft::new("b", None))
                .with_contextual_message(merge.clone()),
        );

        assert_eq!(t.outcome, Some(Reconciliation::AdoptedContextual));
        assert_eq!(t.session.draft, merge);
        assert_eq!(t.effects.len(), 1);
    }

    #[test]
    fn test_snapshot_refreshes_selection_and_remote() {
        let session = Session::init(SessionSnapshot::new("/repos/a"));
        let session = edit_summary(session, "fix");
        assert!(!session.can_commit());

        let remote = Url::parse("https://github.com/octo/app.git").unwrap();
        let t = apply(
            session,
            SessionSnapshot::new("/repos/a")
                .with_files_selected(true)
                .with_hosting_remote(remote.clone()),
        );

        assert!(t.session.can_commit());
        assert_eq!(t.session.hosting_remote, Some(remote));
    }

    #[test]
    fn test_can_commit_gating() {
        let session =
            Session::init(SessionSnapshot::new("/repos/a").with_files_selected(true));
        assert!(!session.can_commit(), "empty summary");

        let session = edit_summary(session, "fix");
        assert!(session.can_commit());

        let session = apply(session, SessionSnapshot::new("/repos/a")).session;
        assert!(!session.can_commit(), "no files selected");
    }

    #[test]
    fn test_commit_success_clears_draft() {
        let session = Session::init(
            SessionSnapshot::new("/repos/a")
                .with_persisted_draft(Draft::new("fix bug", Some("details".into()))),
        );

        let session = transition(session, SessionEvent::CommitStarted).session;
        assert!(session.is_committing());

        let session = transition(
            session,
            SessionEvent::CommitFinished {
                repository_id: RepositoryId::from("/repos/a"),
                success: true,
            },
        )
        .session;

        assert_eq!(session.commit_state, CommitState::Editing);
        assert_eq!(session.draft, Draft::empty());
    }

    #[test]
    fn test_second_commit_start_is_rejected() {
        let session = Session::init(
            SessionSnapshot::new("/repos/a").with_persisted_draft(Draft::new("fix", None)),
        );

        let mut session = transition(session, SessionEvent::CommitStarted).session;
        assert!(matches!(
            session.transition_to(CommitState::Committing),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(session.is_committing());
    }

    #[test]
    fn test_commit_failure_preserves_draft() {
        let draft = Draft::new("fix bug", Some("details".into()));
        let session =
            Session::init(SessionSnapshot::new("/repos/a").with_persisted_draft(draft.clone()));

        let session = transition(session, SessionEvent::CommitStarted).session;
        let session = transition(
            session,
            SessionEvent::CommitFinished {
                repository_id: RepositoryId::from("/repos/a"),
                success: false,
            },
        )
        .session;

        assert_eq!(session.commit_state, CommitState::Editing);
        assert_eq!(session.draft, draft);
    }

    #[test]
    fn test_commit_success_after_repository_switch_keeps_new_draft() {
        let session = Session::init(
            SessionSnapshot::new("/repos/a").with_persisted_draft(Draft::new("fix", None)),
        );
        let session = transition(session, SessionEvent::CommitStarted).session;
        let session = apply(
            session,
            SessionSnapshot::new("/repos/b").with_persisted_draft(Draft::new("other", None)),
        )
        .session;

        let session = transition(
            session,
            SessionEvent::CommitFinished {
                repository_id: RepositoryId::from("/repos/a"),
                success: true,
            },
        )
        .session;

        assert!(!session.is_committing());
        assert_eq!(session.draft, Draft::new("other", None));
    }

    #[test]
    fn test_stray_commit_result_is_ignored() {
        let session = Session::init(
            SessionSnapshot::new("/repos/a").with_persisted_draft(Draft::new("fix", None)),
        );
        let t = transition(
            session,
            SessionEvent::CommitFinished {
                repository_id: RepositoryId::from("/repos/a"),
                success: true,
            },
        );
        assert_eq!(t.session.draft, Draft::new("fix", None));
    }

    #[test]
    fn test_edits_while_committing_are_applied() {
        let session = Session::init(
            SessionSnapshot::new("/repos/a").with_persisted_draft(Draft::new("fix", None)),
        );
        let session = transition(session, SessionEvent::CommitStarted).session;
        let session = edit_summary(session, "fix more");

        assert!(session.is_committing());
        assert_eq!(session.draft.summary, "fix more");
    }

    #[test]
    fn test_teardown_flushes_current_draft() {
        let session = Session::init(SessionSnapshot::new("/repos/a"));
        let session = edit_summary(session, "half done");

        let t = transition(session, SessionEvent::Teardown);
        assert_eq!(
            t.effects,
            vec![Effect::Flush {
                repository_id: RepositoryId::from("/repos/a"),
                draft: Draft::new("half done", None),
            }]
        );
    }

    #[test]
    fn test_invalid_commit_state_transition() {
        let mut session = Session::init(SessionSnapshot::new("/repos/a"));
        let err = session.transition_to(CommitState::Editing).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                from: "editing".into(),
                to: "editing".into(),
            }
        );
    }
}
