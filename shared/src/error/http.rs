//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound | Self::VoucherNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (state changed under the caller, retry with fresh state)
            Self::AlreadyExists
            | Self::InvalidTransition
            | Self::StaleWrite
            | Self::VoucherExhausted => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (voucher rule rejections)
            Self::VoucherNotActive
            | Self::VoucherNotStarted
            | Self::VoucherExpired
            | Self::VoucherBelowMinimum
            | Self::VoucherUsageLimitReached => StatusCode::UNPROCESSABLE_ENTITY,

            // 502 Bad Gateway (store or payment gateway failed)
            Self::UpstreamFailure => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable (transient, client can retry)
            Self::TransportUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
