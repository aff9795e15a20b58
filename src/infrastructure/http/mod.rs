//! HTTP Layer - RESTful API
//!
//! 统一响应格式 `{errno, error, data}`，除健康检查和注册登录外均需 Bearer 令牌

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use middleware::Principal;
pub use routes::create_routes;
pub use server::{build_router, HttpServer, ServerConfig};
pub use state::AppState;
