// ABOUTME: Error taxonomy for sandbox session management
// ABOUTME: Classifies remote-service failures by cause so callers match on kind, not message text

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SandboxError>;

/// Errors produced by sandbox session operations.
///
/// Precondition errors (`NoSession`, `SessionNotRunning`) are distinct from
/// remote-service errors, which are classified at the service boundary by
/// cause. Command-level failure (the executed command exiting non-zero) is
/// not an error here; it lives inside [`crate::CommandOutput`].
#[derive(Error, Debug, Clone)]
pub enum SandboxError {
    #[error("no sandbox session has been created")]
    NoSession,

    #[error("current sandbox session has been killed or timed out")]
    SessionNotRunning,

    #[error("missing API key in Authorization bearer header")]
    MissingCredential,

    #[error("authentication rejected by sandbox service: {0}")]
    Auth(String),

    #[error("sandbox not found: {0}")]
    NotFound(String),

    #[error("sandbox quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("network error reaching sandbox service: {0}")]
    Network(String),

    #[error("sandbox service error: {0}")]
    Service(String),

    #[error("invalid response from sandbox service: {0}")]
    InvalidResponse(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Machine-matchable classification of a [`SandboxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoSession,
    SessionNotRunning,
    MissingCredential,
    Auth,
    NotFound,
    QuotaExceeded,
    Network,
    Service,
    InvalidResponse,
    Configuration,
}

impl SandboxError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SandboxError::NoSession => ErrorKind::NoSession,
            SandboxError::SessionNotRunning => ErrorKind::SessionNotRunning,
            SandboxError::MissingCredential => ErrorKind::MissingCredential,
            SandboxError::Auth(_) => ErrorKind::Auth,
            SandboxError::NotFound(_) => ErrorKind::NotFound,
            SandboxError::QuotaExceeded(_) => ErrorKind::QuotaExceeded,
            SandboxError::Network(_) => ErrorKind::Network,
            SandboxError::Service(_) => ErrorKind::Service,
            SandboxError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            SandboxError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Whether this error reflects a failed precondition rather than a
    /// remote-service failure.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SandboxError::NoSession | SandboxError::SessionNotRunning
        )
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            SandboxError::Auth(_) | SandboxError::MissingCredential
        )
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, SandboxError::Network(_))
    }
}

/// Serializable rendering of a [`SandboxError`] carried inside execution
/// results, so the calling layer can forward kind + message over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&SandboxError> for SandboxFailure {
    fn from(err: &SandboxError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<SandboxError> for SandboxFailure {
    fn from(err: SandboxError) -> Self {
        SandboxFailure::from(&err)
    }
}

impl std::fmt::Display for SandboxFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
