//! HTTP response handling for errors

use super::types::SentinelError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl SentinelError {
    fn error_code(&self) -> &'static str {
        match self {
            SentinelError::Config(_) => "CONFIG_ERROR",
            SentinelError::NotFound(_) => "NOT_FOUND",
            SentinelError::Presence(_) | SentinelError::HttpClient(_) => "PRESENCE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for SentinelError {
    fn status_code(&self) -> StatusCode {
        match self {
            SentinelError::NotFound(_) => StatusCode::NOT_FOUND,
            SentinelError::Presence(_) | SentinelError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Library errors may leak internals, so only the known variants echo their message
        let message = match self {
            SentinelError::Config(_)
            | SentinelError::NotFound(_)
            | SentinelError::Presence(_) => self.to_string(),
            _ => "An internal error occurred".to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
