//! Submit shortcut: primary modifier + Enter while a field has focus

use serde::{Deserialize, Serialize};

use crate::state::CommitOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }

    /// Whether the platform's primary modifier (Command on macOS, Control
    /// elsewhere) is held
    pub fn primary_held(&self, modifiers: Modifiers) -> bool {
        match self {
            Platform::MacOs => modifiers.meta,
            Platform::Other => modifiers.ctrl,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Command on macOS, Windows key elsewhere
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    pub fn primary(platform: Platform) -> Self {
        match platform {
            Platform::MacOs => Modifiers {
                meta: true,
                ..Self::NONE
            },
            Platform::Other => Modifiers {
                ctrl: true,
                ..Self::NONE
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Char(char),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
    /// An editable field (summary or description) has focus
    pub field_focused: bool,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers, field_focused: bool) -> Self {
        Self {
            key,
            modifiers,
            field_focused,
        }
    }

    pub fn is_submit_shortcut(&self, platform: Platform) -> bool {
        self.field_focused && self.key == Key::Enter && platform.primary_held(self.modifiers)
    }
}

/// What the host should do with a key press after the manager saw it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    /// The press was the submit shortcut
    pub handled: bool,
    /// Suppress the field's default behaviour (newline insertion)
    pub prevent_default: bool,
    /// Result of the submit the shortcut triggered
    pub commit: Option<CommitOutcome>,
}

impl KeyOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    /// Shortcut recognised but nothing submitted
    pub fn suppressed() -> Self {
        Self {
            handled: true,
            prevent_default: true,
            commit: None,
        }
    }

    pub fn submitted(outcome: CommitOutcome) -> Self {
        Self {
            handled: true,
            prevent_default: true,
            commit: Some(outcome),
        }
    }
}
