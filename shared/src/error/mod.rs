//! Unified error system for the venue reservation core
//!
//! This module provides the error handling system shared by every crate:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Reservation errors
//! - 7xxx: Floor and table errors
//! - 8xxx: Guest errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::TableNotFound);
//! assert_eq!(err.message, "Table not found");
//!
//! let err = AppError::validation("Party size must be at least 1")
//!     .with_detail("field", "number_of_guests");
//! assert!(err.details.is_some());
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
