//! Auth HTTP Handlers - 注册、登录、当前用户

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{AuthResponse, GetCurrentUser, Login, RegisterUser};
use crate::infrastructure::http::dto::{ApiResponse, UserResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::middleware::Principal;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 登录请求，login 可以是用户名或邮箱
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthResponse> for TokenResponse {
    fn from(auth: AuthResponse) -> Self {
        Self {
            token: auth.token,
            user: auth.user.into(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 注册
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let command = RegisterUser {
        username: req.username,
        email: req.email,
        password: req.password,
    };

    let result = state.register_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(result.into())))
}

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let command = Login {
        login: req.login,
        password: req.password,
    };

    let result = state.login_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(result.into())))
}

/// 当前用户
pub async fn me(
    State(state): State<Arc<AppState>>,
    principal: Principal,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let query = GetCurrentUser {
        principal: principal.user_id(),
    };

    let user = state.current_user_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(user.into())))
}
