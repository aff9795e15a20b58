//! HTTP Middleware
//!
//! - Principal: Bearer 令牌认证提取器
//! - HTTP 状态码错误日志中间件

use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;

/// 当前认证用户
///
/// 从 `Authorization: Bearer <token>` 解析，缺失或无效时返回 Unauthorized
#[derive(Debug, Clone, Copy)]
pub struct Principal(Uuid);

impl Principal {
    pub fn user_id(&self) -> Uuid {
        self.0
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let user_id = state
            .tokens
            .verify(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        // 令牌有效但用户已不存在
        state
            .current_user_handler
            .exists(user_id)
            .await
            .map_err(ApiError::from)?
            .then_some(Principal(user_id))
            .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))
    }
}

/// HTTP 状态码错误日志中间件
///
/// 拦截 HTTP 响应，当状态码为 4xx 或 5xx 时记录日志
/// 业务错误以 HTTP 200 + errno 返回，在 ApiError::into_response() 中记录；
/// 这里只会看到提取器拒绝（如请求体不是合法 JSON）和未匹配的路由
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}
