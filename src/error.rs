//! Unified error handling for spamwarden.
//!
//! Core state transitions are total and infallible; errors only exist at the
//! command boundary and at the outbound gateway capabilities.

use thiserror::Error;

/// Outbound gateway capability failure (delete, send, reply).
///
/// The payload is whatever the gateway implementation reports; the engine
/// only logs it and never lets it affect evaluation state.
#[derive(Debug, Clone, Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing required option: {0}")]
    NeedMoreParams(&'static str),

    #[error("send error: {0}")]
    Send(#[from] TransportError),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCommand(_) => "unknown_command",
            Self::NeedMoreParams(_) => "need_more_params",
            Self::Send(_) => "send_error",
        }
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
