//! Error types shared across the crate
//!
//! Every engine and store operation returns [`IntercedeError`], classified into
//! one of four kinds so callers can render a message without matching on the
//! underlying driver error.

use thiserror::Error;

/// Result alias used by engines, stores and handlers
pub type Result<T, E = IntercedeError> = std::result::Result<T, E>;

/// Classified failure returned to the immediate caller
#[derive(Debug, Error)]
pub enum IntercedeError {
    /// Caller-correctable: malformed id, empty required field, bad parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No document for the id, or a missing parent reference
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage unreachable or timed out; the whole request may be retried
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Unexpected encode/decode failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error class without the detail message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Unavailable,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl IntercedeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IntercedeError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            IntercedeError::NotFound(_) => ErrorKind::NotFound,
            IntercedeError::Unavailable(_) => ErrorKind::Unavailable,
            IntercedeError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for a missing prayer request
    pub fn request_not_found(id: impl std::fmt::Display) -> Self {
        IntercedeError::NotFound(format!("prayer request {} not found", id))
    }
}

impl From<mongodb::error::Error> for IntercedeError {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind as Mongo;

        match e.kind.as_ref() {
            Mongo::Io(_)
            | Mongo::ServerSelection { .. }
            | Mongo::ConnectionPoolCleared { .. }
            | Mongo::DnsResolve { .. } => IntercedeError::Unavailable(e.to_string()),
            Mongo::BsonDeserialization(_) | Mongo::BsonSerialization(_) => {
                IntercedeError::Internal(format!("document codec failed: {}", e))
            }
            _ => IntercedeError::Internal(e.to_string()),
        }
    }
}

impl From<bson::oid::Error> for IntercedeError {
    fn from(e: bson::oid::Error) -> Self {
        IntercedeError::InvalidArgument(format!("invalid id: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_code() {
        let err = IntercedeError::request_not_found("abc");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.kind().code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Not found: prayer request abc not found");
    }

    #[test]
    fn test_malformed_object_id_is_invalid_argument() {
        let err: IntercedeError = bson::oid::ObjectId::parse_str("not-hex").unwrap_err().into();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
