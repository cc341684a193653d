//! Shared error type across oscillo crates.

use thiserror::Error;

/// Stable error codes (used in logs and tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Family name already registered with another schema.
    DuplicateRegistration,
    /// Wrong number of label values for a family.
    LabelArityMismatch,
    /// Handle refers to a family this registry does not know.
    UnknownFamily,
    /// Malformed metric or label name.
    InvalidName,
    /// Snapshot could not be encoded.
    Serialization,
    /// Bad configuration value.
    InvalidConfig,
    /// Listener could not be bound.
    ListenerBind,
    /// HTTP server stopped with an error.
    Server,
}

impl ErrorKind {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::DuplicateRegistration => "DUPLICATE_REGISTRATION",
            ErrorKind::LabelArityMismatch => "LABEL_ARITY_MISMATCH",
            ErrorKind::UnknownFamily => "UNKNOWN_FAMILY",
            ErrorKind::InvalidName => "INVALID_NAME",
            ErrorKind::Serialization => "SERIALIZATION",
            ErrorKind::InvalidConfig => "INVALID_CONFIG",
            ErrorKind::ListenerBind => "LISTENER_BIND",
            ErrorKind::Server => "SERVER",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, OscilloError>;

/// Unified error type used by core and daemon.
#[derive(Debug, Error)]
pub enum OscilloError {
    #[error("metric family {name} already registered with a different schema")]
    DuplicateRegistration { name: String },
    #[error("metric family {name} expects {expected} label values, got {got}")]
    LabelArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("unknown metric family: {0}")]
    UnknownFamily(String),
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("cannot bind {addr}: {reason}")]
    ListenerBind { addr: String, reason: String },
    #[error("server: {0}")]
    Server(String),
}

impl OscilloError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OscilloError::DuplicateRegistration { .. } => ErrorKind::DuplicateRegistration,
            OscilloError::LabelArityMismatch { .. } => ErrorKind::LabelArityMismatch,
            OscilloError::UnknownFamily(_) => ErrorKind::UnknownFamily,
            OscilloError::InvalidName(_) => ErrorKind::InvalidName,
            OscilloError::Serialization(_) => ErrorKind::Serialization,
            OscilloError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            OscilloError::ListenerBind { .. } => ErrorKind::ListenerBind,
            OscilloError::Server(_) => ErrorKind::Server,
        }
    }

    /// Whether the daemon must stop on this error.
    /// Only serialization failures are confined to a single request.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, OscilloError::Serialization(_))
    }
}
