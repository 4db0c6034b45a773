//! Commit composer
//!
//! The host-facing entry point. It owns the database, builds snapshots from
//! persisted state and mounts draft sessions wired to SQLite persistence.

use std::path::Path;
use std::sync::Arc;
use url::Url;

use commitpad_session::{
    CoAuthorToggle, CommitOperation, ContextualMessage, DraftSessionManager, MenuItem,
    RepositoryId, Session, SessionSnapshot,
};
use commitpad_storage::Database;

use crate::config::Config;
use crate::git::GitCommitOperation;
use crate::store::SqliteDraftStore;
use crate::Result;

const SHOW_CO_AUTHORS_KEY: &str = "show_co_authors";

pub struct Composer {
    config: Config,
    db: Database,
    store: Arc<SqliteDraftStore>,
}

impl Composer {
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;

        tracing::info!(
            database = %config.database_path.display(),
            "Opened draft database"
        );

        Ok(Self::with_database(config, db))
    }

    /// Open with [`Config::from_env`]
    pub fn from_env() -> Result<Self> {
        Self::open(Config::from_env())
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::with_database(Config::default(), db))
    }

    fn with_database(config: Config, db: Database) -> Self {
        let store = Arc::new(SqliteDraftStore::new(db.clone()));
        Self { config, db, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn store(&self) -> Arc<SqliteDraftStore> {
        Arc::clone(&self.store)
    }

    /// Build a snapshot for a repository, filling in its persisted draft
    pub fn snapshot_for(
        &self,
        repository_id: impl Into<RepositoryId>,
        contextual_message: Option<ContextualMessage>,
        any_files_selected: bool,
        hosting_remote: Option<Url>,
    ) -> Result<SessionSnapshot> {
        let repository_id = repository_id.into();
        let persisted_draft = self.store.load(&repository_id)?;

        Ok(SessionSnapshot {
            repository_id,
            persisted_draft,
            contextual_message,
            any_files_selected,
            hosting_remote,
        })
    }

    /// Mount a draft session that flushes into this composer's database
    pub fn mount<C: CommitOperation>(
        &self,
        snapshot: SessionSnapshot,
        operation: Arc<C>,
    ) -> DraftSessionManager<SqliteDraftStore, C> {
        DraftSessionManager::mount(snapshot, self.store(), operation)
    }

    /// A git commit operation for a working directory, using the configured git
    pub fn git_operation(&self, workdir: impl AsRef<Path>) -> GitCommitOperation {
        GitCommitOperation::new(self.config.git_program.clone(), workdir)
    }

    pub fn show_co_authors(&self) -> Result<bool> {
        Ok(self
            .db
            .get_json_setting::<bool>(SHOW_CO_AUTHORS_KEY)?
            .unwrap_or(false))
    }

    pub fn set_show_co_authors(&self, show: bool) -> Result<()> {
        self.db.set_json_setting(SHOW_CO_AUTHORS_KEY, &show)?;
        tracing::debug!(show_co_authors = show, "Updated co-author visibility");
        Ok(())
    }

    /// Flip the co-author preference if the session's repository supports it
    pub fn toggle_co_authors(&self, session: &Session) -> Result<bool> {
        let available = CoAuthorToggle::is_available(session.hosting_remote.as_ref());
        let current = self.show_co_authors()?;
        let next = CoAuthorToggle::toggle(current, available);

        if next != current {
            self.set_show_co_authors(next)?;
        }

        Ok(next)
    }

    pub fn co_author_menu_item(&self, session: &Session) -> Result<MenuItem> {
        let available = CoAuthorToggle::is_available(session.hosting_remote.as_ref());
        Ok(CoAuthorToggle::menu_item(self.show_co_authors()?, available))
    }

    /// Whether the co-author input should be shown for the session
    pub fn co_authors_visible(&self, session: &Session) -> Result<bool> {
        let available = CoAuthorToggle::is_available(session.hosting_remote.as_ref());
        Ok(CoAuthorToggle::is_visible(self.show_co_authors()?, available))
    }
}
