//! Unified error codes for the venue reservation core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Reservation errors
//! - 7xxx: Floor / table errors
//! - 8xxx: Guest errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize the same
/// way for every consumer of the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Table already holds a reservation
    TableAlreadyReserved = 4002,
    /// No reservation on the transfer source table
    TransferSourceMissing = 4003,
    /// One side of a swap was written, the other was not
    SwapPartiallyApplied = 4004,
    /// Reservation time is not a valid HH:mm value
    InvalidReservationTime = 4005,

    // ==================== 7xxx: Floor / Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Floor not found
    FloorNotFound = 7101,

    // ==================== 8xxx: Guest ====================
    /// Guest has no contact to hash
    GuestContactMissing = 8002,

    // ==================== 9xxx: System ====================
    /// Document store unreachable or rejected the write
    StoreUnavailable = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "Validation failed",

            ErrorCode::PermissionDenied => "Permission denied",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::TableAlreadyReserved => "Table has already been reserved",
            ErrorCode::TransferSourceMissing => "Transfer source has no reservation",
            ErrorCode::SwapPartiallyApplied => "Swap was only partially applied",
            ErrorCode::InvalidReservationTime => "Reservation time must be HH:mm",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::FloorNotFound => "Floor not found",

            ErrorCode::GuestContactMissing => "Guest contact is missing",

            ErrorCode::StoreUnavailable => "Document store unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ErrorCode::ValidationFailed),
            2001 => Ok(ErrorCode::PermissionDenied),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::TableAlreadyReserved),
            4003 => Ok(ErrorCode::TransferSourceMissing),
            4004 => Ok(ErrorCode::SwapPartiallyApplied),
            4005 => Ok(ErrorCode::InvalidReservationTime),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7101 => Ok(ErrorCode::FloorNotFound),

            8002 => Ok(ErrorCode::GuestContactMissing),
            9002 => Ok(ErrorCode::StoreUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::TableAlreadyReserved.code(), 4002);
        assert_eq!(ErrorCode::SwapPartiallyApplied.code(), 4004);
        assert_eq!(ErrorCode::TableNotFound.code(), 7001);
        assert_eq!(ErrorCode::GuestContactMissing.code(), 8002);
        assert_eq!(ErrorCode::StoreUnavailable.code(), 9002);
    }

    #[test]
    fn test_try_from_known_and_unknown() {
        assert_eq!(ErrorCode::try_from(4003), Ok(ErrorCode::TransferSourceMissing));
        assert_eq!(ErrorCode::try_from(7101), Ok(ErrorCode::FloorNotFound));
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableAlreadyReserved).unwrap();
        assert_eq!(json, "4002");
        let back: ErrorCode = serde_json::from_str("8002").unwrap();
        assert_eq!(back, ErrorCode::GuestContactMissing);
        assert!(serde_json::from_str::<ErrorCode>("6001").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::ReservationNotFound.to_string(), "4001");
    }
}
