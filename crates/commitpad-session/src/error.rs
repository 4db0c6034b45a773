//! Session error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session has been torn down: {0}")]
    Unmounted(String),

    #[error("Invalid commit state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
