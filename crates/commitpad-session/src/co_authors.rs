//! Co-author visibility toggle
//!
//! The `show_co_authors` preference is owned by the host. Co-authors only make
//! sense for repositories with a remote hosting identity, so the toggle is
//! disabled otherwise.

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoAuthor {
    pub name: String,
    pub email: String,
}

impl CoAuthor {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// `Co-Authored-By: Name <email>`
    pub fn trailer(&self) -> String {
        format!("Co-Authored-By: {} <{}>", self.name, self.email)
    }
}

/// A context-menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub enabled: bool,
}

pub struct CoAuthorToggle;

impl CoAuthorToggle {
    pub const ADD_LABEL: &'static str = "Add Co-Authors";
    pub const REMOVE_LABEL: &'static str = "Remove Co-Authors";

    /// The repository has a remote hosting identity
    pub fn is_available(hosting_remote: Option<&Url>) -> bool {
        hosting_remote.and_then(Url::host_str).is_some()
    }

    pub fn menu_item(show_co_authors: bool, available: bool) -> MenuItem {
        let label = if show_co_authors {
            Self::REMOVE_LABEL
        } else {
            Self::ADD_LABEL
        };

        MenuItem {
            label: label.to_string(),
            enabled: available,
        }
    }

    /// New preference value after the toggle action. Unchanged when unavailable.
    pub fn toggle(show_co_authors: bool, available: bool) -> bool {
        if available {
            !show_co_authors
        } else {
            show_co_authors
        }
    }

    /// Whether the co-author input should be rendered
    pub fn is_visible(show_co_authors: bool, available: bool) -> bool {
        show_co_authors && available
    }
}
