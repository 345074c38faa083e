//! Unified JSON response envelope for the REST surface.
//!
//! ```json
//! { "success": true,  "code": 2000, "data": { ... } }
//! { "success": false, "code": 4008, "data": "Message not found" }
//! ```
//!
//! The realtime channel uses the same shape for its events.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Application-level status codes carried in the envelope.
pub mod codes {
    pub const SUCCESS: u16 = 2000;
    pub const CREATED: u16 = 2001;

    pub const INVALID_REQUEST: u16 = 4000;
    pub const UNAUTHORIZED: u16 = 4001;
    pub const FORBIDDEN: u16 = 4002;
    pub const NOT_FOUND: u16 = 4003;
    pub const CHAT_NOT_FOUND: u16 = 4007;
    pub const MESSAGE_NOT_FOUND: u16 = 4008;

    pub const INTERNAL_ERROR: u16 = 5000;
    pub const SERVICE_UNAVAILABLE: u16 = 5003;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: codes::SUCCESS,
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            success: true,
            code: codes::CREATED,
            data,
        }
    }
}

/// A failed request: HTTP status plus the envelope body.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::INVALID_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, codes::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, codes::FORBIDDEN, message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_ERROR,
            "Internal server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            success: false,
            code: self.code,
            data: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::ok("done")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["code"], 2000);
        assert_eq!(json["data"], "done");
    }

    #[test]
    fn created_uses_2001() {
        assert_eq!(ApiResponse::created(()).code, codes::CREATED);
    }

    #[test]
    fn error_maps_to_status_and_failure_envelope() {
        let response = ApiError::forbidden("nope").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
