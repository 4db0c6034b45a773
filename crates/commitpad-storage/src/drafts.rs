//! Draft rows
//!
//! One row per repository identity. Saving overwrites whatever was stored before.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDraft {
    /// Repository identity the draft belongs to
    pub repository_id: String,
    pub summary: String,
    pub description: Option<String>,
    /// Last time the draft was flushed
    pub updated_at: DateTime<Utc>,
}

impl StoredDraft {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let updated_str: String = row.get(3)?;
        let updated_at = DateTime::parse_from_rfc3339(&updated_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Self {
            repository_id: row.get(0)?,
            summary: row.get(1)?,
            description: row.get(2)?,
            updated_at,
        })
    }
}

impl Database {
    /// Insert or replace the draft for a repository
    pub fn save_draft(
        &self,
        repository_id: &str,
        summary: &str,
        description: Option<&str>,
    ) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO drafts (repository_id, summary, description, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![repository_id, summary, description, updated_at],
            )?;
            Ok(())
        })?;

        tracing::debug!(repository_id = %repository_id, "Saved draft");

        Ok(())
    }

    pub fn load_draft(&self, repository_id: &str) -> Result<Option<StoredDraft>> {
        self.with_connection(|conn| {
            let draft = conn
                .query_row(
                    "SELECT repository_id, summary, description, updated_at
                     FROM drafts WHERE repository_id = ?1",
                    [repository_id],
                    StoredDraft::from_row,
                )
                .optional()?;
            Ok(draft)
        })
    }

    /// Remove the draft for a repository. Returns whether a row existed.
    pub fn delete_draft(&self, repository_id: &str) -> Result<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM drafts WHERE repository_id = ?1", [repository_id])?)
        })?;

        if removed > 0 {
            tracing::debug!(repository_id = %repository_id, "Deleted draft");
        }

        Ok(removed > 0)
    }

    /// All stored drafts, most recently updated first
    pub fn list_drafts(&self) -> Result<Vec<StoredDraft>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT repository_id, summary, description, updated_at
                 FROM drafts ORDER BY updated_at DESC",
            )?;

            let drafts: Vec<StoredDraft> = stmt
                .query_map([], StoredDraft::from_row)?
                .filter_map(|row| match row {
                    Ok(draft) => Some(draft),
                    Err(e) => {
                        tracing::warn!("Skipping undecodable draft row: {}", e);
                        None
                    }
                })
                .collect();

            Ok(drafts)
        })
    }
}
