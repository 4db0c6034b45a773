//! Draft Session Manager
//!
//! Owns the session for one mounted editing context and routes both input
//! channels, local edits and external snapshots, through [`transition`].
//! Flush effects are handed to the persistence store; commits go through the
//! commit operation without blocking further edits.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::collaborators::{CommitOperation, PersistenceStore};
use crate::draft::{Draft, DraftEdit};
use crate::error::SessionError;
use crate::session::{transition, Effect, Reconciliation, Session, SessionEvent, Transition};
use crate::shortcut::{KeyOutcome, KeyPress, Platform};
use crate::snapshot::{RepositoryId, SessionSnapshot};
use crate::state::CommitOutcome;
use crate::Result;

struct ManagerState {
    session: Session,
    mounted: bool,
}

pub struct DraftSessionManager<S, C> {
    state: Arc<RwLock<ManagerState>>,
    store: Arc<S>,
    operation: Arc<C>,
    platform: Platform,
}

impl<S, C> DraftSessionManager<S, C>
where
    S: PersistenceStore,
    C: CommitOperation,
{
    /// Create the session from the first snapshot
    pub fn mount(snapshot: SessionSnapshot, store: Arc<S>, operation: Arc<C>) -> Self {
        let session = Session::init(snapshot);

        tracing::info!(
            session_id = %session.id,
            repository_id = %session.repository_id,
            "Mounted draft session"
        );

        Self {
            state: Arc::new(RwLock::new(ManagerState {
                session,
                mounted: true,
            })),
            store,
            operation,
            platform: Platform::current(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Run one event through the transition function.
    ///
    /// Effects are performed before the new session is published, so a flush
    /// of the old repository's draft always precedes adoption of the new one.
    fn dispatch(&self, event: SessionEvent) -> Result<Transition> {
        let mut state = self.state.write();
        if !state.mounted {
            return Err(SessionError::Unmounted(state.session.id.clone()));
        }

        let applied = transition(state.session.clone(), event);
        for effect in &applied.effects {
            self.perform(effect);
        }
        state.session = applied.session.clone();

        Ok(applied)
    }

    fn perform(&self, effect: &Effect) {
        match effect {
            Effect::Flush {
                repository_id,
                draft,
            } => {
                tracing::info!(repository_id = %repository_id, "Flushing draft");
                self.store.save(repository_id, draft);
            }
        }
    }

    /// Reconcile a snapshot from the host against the local draft
    pub fn apply_snapshot(&self, snapshot: SessionSnapshot) -> Result<Reconciliation> {
        let applied = self.dispatch(SessionEvent::Snapshot(snapshot))?;
        let outcome = applied.outcome.unwrap_or(Reconciliation::KeptLocal);

        tracing::debug!(
            session_id = %applied.session.id,
            repository_id = %applied.session.repository_id,
            rule = %outcome,
            "Applied snapshot"
        );

        Ok(outcome)
    }

    pub fn apply_edit(&self, edit: DraftEdit) -> Result<()> {
        self.dispatch(SessionEvent::Edit(edit))?;
        Ok(())
    }

    pub fn update_summary(&self, text: impl Into<String>) -> Result<()> {
        self.apply_edit(DraftEdit::Summary(text.into()))
    }

    pub fn update_description(&self, text: impl Into<String>) -> Result<()> {
        self.apply_edit(DraftEdit::Description(text.into()))
    }

    pub fn session(&self) -> Session {
        self.state.read().session.clone()
    }

    pub fn draft(&self) -> Draft {
        self.state.read().session.draft.clone()
    }

    pub fn can_commit(&self) -> bool {
        let state = self.state.read();
        state.mounted && state.session.can_commit()
    }

    pub fn is_committing(&self) -> bool {
        self.state.read().session.is_committing()
    }

    pub fn is_mounted(&self) -> bool {
        self.state.read().mounted
    }

    /// Submit the current draft.
    ///
    /// The draft is captured when this is called; edits made while the
    /// operation is outstanding are kept in the session but not committed.
    /// Returns [`CommitOutcome::NotReady`] without invoking the operation
    /// while another commit is in flight.
    pub async fn create_commit(&self) -> Result<CommitOutcome> {
        let (draft, repository_id) = match self.begin_commit()? {
            Some(captured) => captured,
            None => return Ok(CommitOutcome::NotReady),
        };

        tracing::info!(repository_id = %repository_id, "Creating commit");

        let success = self.operation.create(&draft).await;

        let outcome = if success {
            CommitOutcome::Committed
        } else {
            CommitOutcome::Failed
        };

        tracing::info!(
            repository_id = %repository_id,
            outcome = ?outcome,
            "Commit finished"
        );

        if let Err(e) = self.dispatch(SessionEvent::CommitFinished {
            repository_id,
            success,
        }) {
            tracing::debug!("Commit result arrived after teardown: {}", e);
        }

        Ok(outcome)
    }

    /// Check the gate and enter `Committing` under one write lock, so two
    /// submits can never both pass
    fn begin_commit(&self) -> Result<Option<(Draft, RepositoryId)>> {
        let mut state = self.state.write();
        if !state.mounted {
            return Err(SessionError::Unmounted(state.session.id.clone()));
        }
        if state.session.is_committing() || !state.session.can_commit() {
            return Ok(None);
        }

        let captured = (
            state.session.draft.clone(),
            state.session.repository_id.clone(),
        );
        state.session = transition(state.session.clone(), SessionEvent::CommitStarted).session;

        Ok(Some(captured))
    }

    /// Handle a key press from an editable field.
    ///
    /// The submit shortcut always suppresses the default newline, whether or
    /// not a commit could be made. While a commit is in flight the shortcut
    /// is swallowed without submitting again.
    pub async fn handle_key(&self, press: &KeyPress) -> Result<KeyOutcome> {
        if !press.is_submit_shortcut(self.platform) {
            return Ok(KeyOutcome::ignored());
        }

        if self.is_committing() {
            tracing::debug!("Submit shortcut ignored, commit already in flight");
            return Ok(KeyOutcome::suppressed());
        }

        let outcome = self.create_commit().await?;
        Ok(KeyOutcome::submitted(outcome))
    }

    /// Flush the current draft and stop accepting events. Safe to call twice.
    pub fn teardown(&self) {
        let applied = {
            let mut state = self.state.write();
            if !state.mounted {
                return;
            }
            state.mounted = false;
            transition(state.session.clone(), SessionEvent::Teardown)
        };

        for effect in &applied.effects {
            self.perform(effect);
        }

        tracing::info!(
            session_id = %applied.session.id,
            repository_id = %applied.session.repository_id,
            "Tore down draft session"
        );
    }
}

impl<S, C> Clone for DraftSessionManager<S, C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            operation: Arc::clone(&self.operation),
            platform: self.platform,
        }
    }
}
