//! Shared types for the venue reservation workspace
//!
//! Domain models (reservations, floors, guests, events), the unified error
//! type and small helpers used by every crate.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
