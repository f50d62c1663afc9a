//! Error types shared by the domain, ports and adapters.
//!
//! `ValidationError` comes out of value-object constructors. Everything that
//! crosses a port boundary is a `DomainError`, tagged with an `ErrorCode` so
//! callers can branch without parsing messages.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
        }
    }
}

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ValidationFailed,
    EmptyField,
    InvalidFormat,
    InvalidEventKind,
    HandlerFailure,
    NotificationNotFound,
    PersistenceFailure,
    DatabaseError,
    CacheError,
    InternalError,
}

impl ErrorCode {
    /// Wire form, e.g. `INVALID_EVENT_KIND`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::InvalidEventKind => "INVALID_EVENT_KIND",
            ErrorCode::HandlerFailure => "HANDLER_FAILURE",
            ErrorCode::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            ErrorCode::PersistenceFailure => "PERSISTENCE_FAILURE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::CacheError => "CACHE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller sent something malformed, as opposed to the
    /// system failing to handle well-formed input.
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            ErrorCode::ValidationFailed
                | ErrorCode::EmptyField
                | ErrorCode::InvalidFormat
                | ErrorCode::InvalidEventKind
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error crossing a port boundary.
///
/// `details` carries structured context (offending field, event tag,
/// handler name) for logs and API responses.
#[derive(Debug, Clone, Error)]
#[error("[{code}] {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field)
    }

    /// An event tag outside the taxonomy.
    pub fn invalid_event_kind(event_type: impl Into<String>) -> Self {
        let event_type = event_type.into();
        Self::new(
            ErrorCode::InvalidEventKind,
            format!("Unrecognized event type: {}", event_type),
        )
        .with_detail("event_type", event_type)
    }

    /// A handler that blew up instead of returning an error.
    pub fn handler_failure(handler: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::HandlerFailure,
            format!("Handler {} panicked: {}", handler, reason.into()),
        )
        .with_detail("handler", handler)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_name_the_field() {
        assert_eq!(
            ValidationError::empty_field("user_id").to_string(),
            "Field 'user_id' cannot be empty"
        );
        assert_eq!(
            ValidationError::invalid_format("channel_id", "contains whitespace").to_string(),
            "Field 'channel_id' has invalid format: contains whitespace"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::NotificationNotFound, "Notification not found");
        assert_eq!(err.to_string(), "[NOTIFICATION_NOT_FOUND] Notification not found");
    }

    #[test]
    fn invalid_event_kind_carries_the_tag() {
        let err = DomainError::invalid_event_kind("lesson.deleted.v9");
        assert_eq!(err.code, ErrorCode::InvalidEventKind);
        assert_eq!(
            err.details.get("event_type").map(String::as_str),
            Some("lesson.deleted.v9")
        );
    }

    #[test]
    fn handler_failure_names_the_handler() {
        let err = DomainError::handler_failure("NotificationDispatcher", "index out of bounds");
        assert_eq!(err.code, ErrorCode::HandlerFailure);
        assert!(err.message.contains("index out of bounds"));
        assert_eq!(
            err.details.get("handler").map(String::as_str),
            Some("NotificationDispatcher")
        );
    }

    #[test]
    fn validation_error_keeps_its_specific_code() {
        let err: DomainError = ValidationError::empty_field("tenant_id").into();
        assert_eq!(err.code, ErrorCode::EmptyField);
        assert!(err.message.contains("tenant_id"));

        let err: DomainError = ValidationError::invalid_format("tenant_id", "spaces").into();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn caller_faults_are_input_problems_only() {
        assert!(ErrorCode::InvalidEventKind.is_caller_fault());
        assert!(ErrorCode::EmptyField.is_caller_fault());
        assert!(!ErrorCode::HandlerFailure.is_caller_fault());
        assert!(!ErrorCode::DatabaseError.is_caller_fault());
    }
}
