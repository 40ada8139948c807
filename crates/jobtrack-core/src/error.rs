//! Shared error type across jobtrack crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid input / malformed request or config.
    BadRequest,
    /// The key-value store rejected or failed a call.
    Store,
    /// A stored timestamp could not be parsed.
    MalformedTimestamp,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Store => "STORE",
            ErrorCode::MalformedTimestamp => "MALFORMED_TIMESTAMP",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, JobTrackError>;

/// Unified error type used by core and service.
#[derive(Debug, Error)]
pub enum JobTrackError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("store: {0}")]
    Store(String),
    #[error("malformed timestamp under {key}: {source}")]
    MalformedTimestamp {
        key: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl JobTrackError {
    /// Map internal error to a stable client-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            JobTrackError::BadRequest(_) => ErrorCode::BadRequest,
            JobTrackError::Store(_) => ErrorCode::Store,
            JobTrackError::MalformedTimestamp { .. } => ErrorCode::MalformedTimestamp,
            JobTrackError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            JobTrackError::Internal(_) => ErrorCode::Internal,
        }
    }
}
