//! Error types for carequeue
//!
//! Each error type has a corresponding error code for programmatic handling,
//! and collapses to one of the three categories shown to staff.

use thiserror::Error;

/// Result type alias for carequeue operations
pub type Result<T> = std::result::Result<T, CareQueueError>;

/// Main error type for all carequeue operations
#[derive(Debug, Error)]
pub enum CareQueueError {
    /// A required field is missing or malformed, or the action is not legal
    /// from the visit's current stage
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The caller's role may not perform the requested action
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// The API rejected the request
    #[error("Request rejected ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The visit was changed by someone else since it was fetched
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The API could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Operation timed out
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// No stored session; the user has to log in first
    #[error("Not logged in: {0}")]
    NotLoggedIn(String),

    /// Invalid JSON format in a local file
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The API answered with a body that could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Operation was interrupted (e.g., by SIGINT)
    #[error("Operation interrupted")]
    Interrupted,

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The user-facing error categories. Every error is surfaced as a transient
/// notification in one of these; none are retried automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Authorization,
    Remote,
}

impl CareQueueError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            CareQueueError::Validation(_) => "VALIDATION",
            CareQueueError::Unauthorized(_) => "UNAUTHORIZED",
            CareQueueError::Remote { .. } => "REMOTE",
            CareQueueError::Conflict(_) => "CONFLICT",
            CareQueueError::Network(_) => "NETWORK",
            CareQueueError::Timeout(_) => "TIMEOUT",
            CareQueueError::NotLoggedIn(_) => "NOT_LOGGED_IN",
            CareQueueError::InvalidJson(_) => "INVALID_JSON",
            CareQueueError::MalformedResponse(_) => "MALFORMED_RESPONSE",
            CareQueueError::FileNotFound(_) => "FILE_NOT_FOUND",
            CareQueueError::ConfigError(_) => "CONFIG_ERROR",
            CareQueueError::Interrupted => "INTERRUPTED",
            CareQueueError::Io(_) => "IO_ERROR",
        }
    }

    /// Collapse this error into the category shown to staff
    pub fn category(&self) -> ErrorCategory {
        match self {
            CareQueueError::Validation(_)
            | CareQueueError::InvalidJson(_)
            | CareQueueError::ConfigError(_) => ErrorCategory::Validation,
            CareQueueError::Unauthorized(_) | CareQueueError::NotLoggedIn(_) => {
                ErrorCategory::Authorization
            }
            _ => ErrorCategory::Remote,
        }
    }

    /// Map a non-success API response to an error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 | 422 => CareQueueError::Validation(message),
            401 | 403 => CareQueueError::Unauthorized(message),
            409 => CareQueueError::Conflict(message),
            _ => CareQueueError::Remote { status, message },
        }
    }
}

/// Convert an error to an appropriate exit code
pub fn to_exit_code(error: &CareQueueError) -> i32 {
    match error {
        CareQueueError::Interrupted => 130, // Standard Unix exit code for SIGINT
        CareQueueError::Validation(_) => 2,
        CareQueueError::Unauthorized(_) | CareQueueError::NotLoggedIn(_) => 3,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CareQueueError::Validation("test".into()).code(), "VALIDATION");
        assert_eq!(CareQueueError::Unauthorized("test".into()).code(), "UNAUTHORIZED");
        assert_eq!(
            CareQueueError::Remote { status: 500, message: "boom".into() }.code(),
            "REMOTE"
        );
        assert_eq!(CareQueueError::Conflict("test".into()).code(), "CONFLICT");
        assert_eq!(CareQueueError::Network("test".into()).code(), "NETWORK");
        assert_eq!(CareQueueError::NotLoggedIn("test".into()).code(), "NOT_LOGGED_IN");
        assert_eq!(CareQueueError::ConfigError("test".into()).code(), "CONFIG_ERROR");
        assert_eq!(CareQueueError::Interrupted.code(), "INTERRUPTED");
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            CareQueueError::Validation("no diagnosis".into()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            CareQueueError::Unauthorized("nurse on doctor queue".into()).category(),
            ErrorCategory::Authorization
        );
        assert_eq!(CareQueueError::Conflict("stale".into()).category(), ErrorCategory::Remote);
        assert_eq!(CareQueueError::Network("refused".into()).category(), ErrorCategory::Remote);
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            CareQueueError::from_status(422, "bad"),
            CareQueueError::Validation(_)
        ));
        assert!(matches!(
            CareQueueError::from_status(403, "no"),
            CareQueueError::Unauthorized(_)
        ));
        assert!(matches!(
            CareQueueError::from_status(409, "moved"),
            CareQueueError::Conflict(_)
        ));
        assert!(matches!(
            CareQueueError::from_status(502, "gateway"),
            CareQueueError::Remote { status: 502, .. }
        ));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(to_exit_code(&CareQueueError::Interrupted), 130);
        assert_eq!(to_exit_code(&CareQueueError::Validation("x".into())), 2);
        assert_eq!(to_exit_code(&CareQueueError::Unauthorized("x".into())), 3);
        assert_eq!(to_exit_code(&CareQueueError::Network("x".into())), 1);
    }

    #[test]
    fn test_bad_response_body_is_remote() {
        let bad = CareQueueError::MalformedResponse("visit response: expected value".into());
        assert_eq!(bad.code(), "MALFORMED_RESPONSE");
        assert_eq!(bad.category(), ErrorCategory::Remote);
        assert_eq!(
            CareQueueError::InvalidJson("config.json".into()).category(),
            ErrorCategory::Validation
        );
    }
}
