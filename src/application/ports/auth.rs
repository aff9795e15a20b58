//! Auth Ports - 令牌与密码哈希
//!
//! 令牌签发/校验和密码哈希的具体算法由 infrastructure/adapters/auth 提供

use thiserror::Error;
use uuid::Uuid;

/// 认证错误
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token issue failed: {0}")]
    IssueFailed(String),

    #[error("Password hash failed: {0}")]
    HashFailed(String),
}

/// 令牌服务端口
pub trait TokenServicePort: Send + Sync {
    /// 为用户签发访问令牌
    fn issue(&self, user_id: Uuid) -> Result<String, AuthError>;

    /// 校验令牌并返回用户 ID
    fn verify(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// 密码哈希端口
pub trait PasswordHasherPort: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    fn verify(&self, password: &str, hash: &str) -> bool;
}
