//! Error types

use super::codes::ErrorCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type shared across the workspace, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create a document store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StoreUnavailable, msg)
    }

    /// Create a reservation not found error
    pub fn reservation_not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::with_message(
            ErrorCode::ReservationNotFound,
            format!("Reservation {} not found", id),
        )
        .with_detail("reservation_id", id)
    }

    /// Create a table already reserved error
    pub fn table_already_reserved(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::with_message(
            ErrorCode::TableAlreadyReserved,
            format!("Table {} has already been reserved", label),
        )
        .with_detail("table", label)
    }

    /// Create a table not found error
    pub fn table_not_found(floor_id: &str, label: &str) -> Self {
        Self::with_message(
            ErrorCode::TableNotFound,
            format!("Table {} not found on floor {}", label, floor_id),
        )
        .with_detail("floor_id", floor_id)
        .with_detail("table", label)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::ReservationNotFound);
        assert_eq!(err.code, ErrorCode::ReservationNotFound);
        assert_eq!(err.message, "Reservation not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Invalid input")
            .with_detail("field", "time")
            .with_detail("value", "25:00");
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "time");
        assert_eq!(details.get("value").unwrap(), "25:00");
    }

    #[test]
    fn test_table_already_reserved_display() {
        let err = AppError::table_already_reserved("T1");
        assert_eq!(err.code, ErrorCode::TableAlreadyReserved);
        assert_eq!(err.to_string(), "Table T1 has already been reserved");
    }

    #[test]
    fn test_permission_denied_category() {
        let err = AppError::permission_denied("Missing permission guests:view")
            .with_detail("permission", "guests:view");
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.code.category(), crate::error::ErrorCategory::Permission);
    }
}
