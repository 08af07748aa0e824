//! Failure taxonomy for the chat collaborator.

use thiserror::Error;

/// The ways a chat request can fail.
///
/// The split matters to the caller: an application-level failure carries a
/// detail string the user gets to see, a transport failure carries no
/// user-facing detail (its message is for logs only).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatFailure {
    /// The relay (or the provider behind it) rejected the request and
    /// reported a structured error.
    #[error("chat service rejected the request: {detail}")]
    Application { detail: String },

    /// The request never completed: connection refused, timeout, or an
    /// unreadable response.
    #[error("transport failure: {message}")]
    Transport { message: String },
}

impl ChatFailure {
    pub fn application(detail: impl Into<String>) -> Self {
        Self::Application {
            detail: detail.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
