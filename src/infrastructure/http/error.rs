//! HTTP Error Handling
//!
//! 业务错误统一返回 HTTP 200，错误码放在 errno 字段

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const UNAUTHORIZED: i32 = 401;
    pub const FORBIDDEN: i32 = 403;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Unauthorized(_) => errno::UNAUTHORIZED,
            ApiError::Forbidden(_) => errno::FORBIDDEN,
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::Conflict(_) => errno::CONFLICT,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let msg = self.message();

        match &self {
            ApiError::Internal(_) => {
                tracing::error!(errno = errno, error = %msg, "Internal server error");
            }
            ApiError::Unauthorized(_) | ApiError::Forbidden(_) => {
                tracing::warn!(errno = errno, error = %msg, "Access denied");
            }
            ApiError::NotFound(_) => {
                tracing::warn!(errno = errno, error = %msg, "Resource not found");
            }
            ApiError::Conflict(_) => {
                tracing::warn!(errno = errno, error = %msg, "Resource conflict");
            }
            ApiError::BadRequest(_) => {
                tracing::warn!(errno = errno, error = %msg, "Bad request");
            }
        }

        (StatusCode::OK, Json(ErrorResponse::new(errno, msg))).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            ApplicationError::Forbidden { .. } => ApiError::Forbidden(e.to_string()),
            ApplicationError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::InvalidOrder(msg) => ApiError::BadRequest(msg),
            ApplicationError::Conflict(msg) => ApiError::Conflict(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_application_errors_map_to_errno() {
        let id = Uuid::new_v4();
        let cases = [
            (ApplicationError::not_found("Chapter", id), errno::NOT_FOUND),
            (ApplicationError::forbidden("Novel", id), errno::FORBIDDEN),
            (ApplicationError::unauthorized("no token"), errno::UNAUTHORIZED),
            (ApplicationError::validation("empty title"), errno::BAD_REQUEST),
            (ApplicationError::InvalidOrder("6 > 5".to_string()), errno::BAD_REQUEST),
            (ApplicationError::conflict("busy"), errno::CONFLICT),
            (ApplicationError::internal("disk"), errno::INTERNAL_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError::from(error).errno(), expected);
        }
    }

    #[test]
    fn test_error_response_is_http_ok() {
        let response = ApiError::Forbidden("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
