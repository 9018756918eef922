//! Unified error codes for the order platform
//!
//! This module defines all error codes used across shop-server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 2xxx: Voucher errors
//! - 4xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 2xxx: Voucher ====================
    /// Voucher code not found
    VoucherNotFound = 2001,
    /// Voucher is soft-disabled
    VoucherNotActive = 2002,
    /// Voucher validity window has not opened yet
    VoucherNotStarted = 2003,
    /// Voucher validity window has closed
    VoucherExpired = 2004,
    /// Order subtotal below the voucher minimum
    VoucherBelowMinimum = 2005,
    /// Voucher usage count has reached its limit
    VoucherUsageLimitReached = 2006,
    /// Usage increment refused at redemption time (lost the race)
    VoucherExhausted = 2007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Requested status not reachable for the acting role
    InvalidTransition = 4002,
    /// Conditional status write lost to a concurrent mutation
    StaleWrite = 4003,
    /// Order has no line items
    OrderEmpty = 4004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Order/voucher store or payment gateway failure
    UpstreamFailure = 9002,
    /// Live event transport is down (client-side state, never an API error)
    TransportUnavailable = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    ///
    /// Voucher rule messages are the exact reason strings the rule engine
    /// produces, so clients can display them verbatim.
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Voucher
            ErrorCode::VoucherNotFound => "Voucher not found",
            ErrorCode::VoucherNotActive => "voucher not active",
            ErrorCode::VoucherNotStarted => "voucher not started",
            ErrorCode::VoucherExpired => "voucher expired",
            ErrorCode::VoucherBelowMinimum => "order below minimum",
            ErrorCode::VoucherUsageLimitReached => "usage limit reached",
            ErrorCode::VoucherExhausted => "Voucher usage is exhausted",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidTransition => "Status transition not allowed",
            ErrorCode::StaleWrite => "Order status changed concurrently, refresh and retry",
            ErrorCode::OrderEmpty => "Order has no line items",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::UpstreamFailure => "Upstream dependency failed",
            ErrorCode::TransportUnavailable => "Live transport unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
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
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Voucher
            2001 => Ok(ErrorCode::VoucherNotFound),
            2002 => Ok(ErrorCode::VoucherNotActive),
            2003 => Ok(ErrorCode::VoucherNotStarted),
            2004 => Ok(ErrorCode::VoucherExpired),
            2005 => Ok(ErrorCode::VoucherBelowMinimum),
            2006 => Ok(ErrorCode::VoucherUsageLimitReached),
            2007 => Ok(ErrorCode::VoucherExhausted),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::StaleWrite),
            4004 => Ok(ErrorCode::OrderEmpty),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::UpstreamFailure),
            9003 => Ok(ErrorCode::TransportUnavailable),

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
        // General
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::Unknown.code(), 1);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::AlreadyExists.code(), 4);

        // Voucher
        assert_eq!(ErrorCode::VoucherNotFound.code(), 2001);
        assert_eq!(ErrorCode::VoucherNotActive.code(), 2002);
        assert_eq!(ErrorCode::VoucherNotStarted.code(), 2003);
        assert_eq!(ErrorCode::VoucherExpired.code(), 2004);
        assert_eq!(ErrorCode::VoucherBelowMinimum.code(), 2005);
        assert_eq!(ErrorCode::VoucherUsageLimitReached.code(), 2006);
        assert_eq!(ErrorCode::VoucherExhausted.code(), 2007);

        // Order
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidTransition.code(), 4002);
        assert_eq!(ErrorCode::StaleWrite.code(), 4003);
        assert_eq!(ErrorCode::OrderEmpty.code(), 4004);

        // System
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::UpstreamFailure.code(), 9002);
        assert_eq!(ErrorCode::TransportUnavailable.code(), 9003);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
        assert!(!ErrorCode::InternalError.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(2001), Ok(ErrorCode::VoucherNotFound));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::InvalidTransition));
        assert_eq!(ErrorCode::try_from(4003), Ok(ErrorCode::StaleWrite));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(5001), Err(InvalidErrorCode(5001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_from_error_code_to_u16() {
        let code: u16 = ErrorCode::Success.into();
        assert_eq!(code, 0);

        let code: u16 = ErrorCode::VoucherExpired.into();
        assert_eq!(code, 2004);

        let code: u16 = ErrorCode::InternalError.into();
        assert_eq!(code, 9001);
    }

    #[test]
    fn test_serialize() {
        let code = ErrorCode::NotFound;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "3");

        let code = ErrorCode::OrderNotFound;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "4001");

        let code = ErrorCode::Success;
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "0");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("0").unwrap();
        assert_eq!(code, ErrorCode::Success);

        let code: ErrorCode = serde_json::from_str("2006").unwrap();
        assert_eq!(code, ErrorCode::VoucherUsageLimitReached);

        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::StaleWrite), "4003");
        assert_eq!(format!("{}", ErrorCode::InternalError), "9001");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(ErrorCode::VoucherNotActive.message(), "voucher not active");
        assert_eq!(ErrorCode::VoucherNotStarted.message(), "voucher not started");
        assert_eq!(ErrorCode::VoucherExpired.message(), "voucher expired");
        assert_eq!(
            ErrorCode::VoucherBelowMinimum.message(),
            "order below minimum"
        );
        assert_eq!(
            ErrorCode::VoucherUsageLimitReached.message(),
            "usage limit reached"
        );
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::VoucherExpired,
            ErrorCode::InvalidTransition,
            ErrorCode::StaleWrite,
            ErrorCode::UpstreamFailure,
        ];

        for code in codes {
            let json = serde_json::to_string(&code).unwrap();
            let parsed: ErrorCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, parsed);
        }
    }
}
