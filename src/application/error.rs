//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{AuthError, LockError, RepositoryError};
use crate::domain::chapter::OrderError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 资源存在但不属于当前用户
    #[error("{resource_type} {id} is not owned by the current user")]
    Forbidden {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 未认证
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 排序位置无效
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// 并发冲突（排序锁等待超时、存储层乐观校验失败、唯一约束冲突）
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建 Forbidden 错误
    pub fn forbidden(resource_type: &'static str, id: Uuid) -> Self {
        Self::Forbidden { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建未认证错误
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// 创建冲突错误
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) | RepositoryError::Duplicate(msg) => Self::Conflict(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<LockError> for ApplicationError {
    fn from(err: LockError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<OrderError> for ApplicationError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::OutOfRange { .. } => Self::InvalidOrder(err.to_string()),
            OrderError::Corrupted { .. } => Self::InternalError(err.to_string()),
        }
    }
}

impl From<AuthError> for ApplicationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(msg) => Self::Unauthorized(msg),
            other => Self::InternalError(other.to_string()),
        }
    }
}
