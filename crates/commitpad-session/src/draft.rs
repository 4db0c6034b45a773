//! Draft data structure

use serde::{Deserialize, Serialize};

use crate::co_authors::CoAuthor;

/// The user-editable commit message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// First line of the commit message. Always defined, possibly empty.
    pub summary: String,
    /// Optional body
    pub description: Option<String>,
}

/// A suggested message supplied from repository state (merge message, template).
/// Same shape as a draft, but never confused with the user's own edits.
pub type ContextualMessage = Draft;

/// A single local edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Summary(String),
    Description(String),
}

impl Draft {
    pub fn new(summary: impl Into<String>, description: Option<String>) -> Self {
        Self {
            summary: summary.into(),
            description,
        }
    }

    /// `summary: ""`, no description
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.description.as_deref().map_or(true, str::is_empty)
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Summary(text) => self.summary = text,
            DraftEdit::Description(text) => self.description = Some(text),
        }
    }

    /// Render the full git commit message.
    ///
    /// The summary is followed by a blank line and the description, when one
    /// is present. Each co-author becomes a `Co-Authored-By` trailer in its own
    /// paragraph at the end.
    pub fn commit_message(&self, co_authors: &[CoAuthor]) -> String {
        let mut message = self.summary.trim_end().to_string();

        if let Some(description) = self.description.as_deref() {
            let description = description.trim_end();
            if !description.trim().is_empty() {
                message.push_str("\n\n");
                message.push_str(description);
            }
        }

        if !co_authors.is_empty() {
            message.push_str("\n\n");
            let trailers: Vec<String> = co_authors.iter().map(CoAuthor::trailer).collect();
            message.push_str(&trailers.join("\n"));
        }

        message
    }
}

/// Structural equality over optional messages.
///
/// Two messages are the same when both are absent, or when both are present
/// with equal summary and description.
pub fn same_message(a: Option<&Draft>, b: Option<&Draft>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.summary == b.summary && a.description == b.description,
        _ => false,
    }
}
