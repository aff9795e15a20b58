//! User Command Handlers - 注册与登录

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{Login, RegisterUser};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    PasswordHasherPort, RepositoryError, TokenServicePort, UserRecord, UserRepositoryPort,
};

/// 密码最短长度
pub const MIN_PASSWORD_LEN: usize = 6;

/// 认证成功响应
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserRecord,
}

// ============================================================================
// RegisterUser
// ============================================================================

/// RegisterUser Handler
pub struct RegisterUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    hasher: Arc<dyn PasswordHasherPort>,
    tokens: Arc<dyn TokenServicePort>,
}

impl RegisterUserHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        hasher: Arc<dyn PasswordHasherPort>,
        tokens: Arc<dyn TokenServicePort>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, command: RegisterUser) -> Result<AuthResponse, ApplicationError> {
        let username = command.username.trim().to_string();
        let email = command.email.trim().to_string();

        if username.is_empty() || email.is_empty() || command.password.is_empty() {
            return Err(ApplicationError::validation(
                "Username, email and password are required",
            ));
        }
        if !email.contains('@') {
            return Err(ApplicationError::validation("Invalid email address"));
        }
        if command.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApplicationError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: self.hasher.hash(&command.password)?,
            created_at: Utc::now(),
        };

        self.user_repo.insert(&user).await.map_err(|e| match e {
            RepositoryError::Duplicate(_) => {
                ApplicationError::conflict("Username or email already registered")
            }
            other => other.into(),
        })?;

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthResponse { token, user })
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login Handler
pub struct LoginHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    hasher: Arc<dyn PasswordHasherPort>,
    tokens: Arc<dyn TokenServicePort>,
}

impl LoginHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        hasher: Arc<dyn PasswordHasherPort>,
        tokens: Arc<dyn TokenServicePort>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, command: Login) -> Result<AuthResponse, ApplicationError> {
        let login = command.login.trim();
        if login.is_empty() || command.password.is_empty() {
            return Err(ApplicationError::validation("Login and password are required"));
        }

        // 用户不存在与密码错误返回同样的错误
        let user = self
            .user_repo
            .find_by_login(login)
            .await?
            .filter(|user| self.hasher.verify(&command.password, &user.password_hash))
            .ok_or_else(|| ApplicationError::unauthorized("Invalid credentials"))?;

        let token = self.tokens.issue(user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;

    fn register(username: &str, email: &str, password: &str) -> RegisterUser {
        RegisterUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let ctx = TestContext::new().await;
        let registrar =
            RegisterUserHandler::new(ctx.users.clone(), ctx.hasher.clone(), ctx.tokens.clone());
        let login = LoginHandler::new(ctx.users.clone(), ctx.hasher.clone(), ctx.tokens.clone());

        let registered = registrar
            .handle(register("writer", "writer@example.com", "secret123"))
            .await
            .unwrap();
        assert_ne!(registered.user.password_hash, "secret123");
        assert_eq!(ctx.tokens.verify(&registered.token).unwrap(), registered.user.id);

        for name in ["writer", "writer@example.com"] {
            let session = login
                .handle(Login {
                    login: name.to_string(),
                    password: "secret123".to_string(),
                })
                .await
                .unwrap();
            assert_eq!(session.user.id, registered.user.id);
        }

        let wrong = login
            .handle(Login {
                login: "writer".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(ApplicationError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_short_passwords() {
        let ctx = TestContext::new().await;
        let registrar =
            RegisterUserHandler::new(ctx.users.clone(), ctx.hasher.clone(), ctx.tokens.clone());

        registrar
            .handle(register("writer", "writer@example.com", "secret123"))
            .await
            .unwrap();

        let same_name = registrar
            .handle(register("writer", "other@example.com", "secret123"))
            .await;
        assert!(matches!(same_name, Err(ApplicationError::Conflict(_))));

        let same_email = registrar
            .handle(register("other", "writer@example.com", "secret123"))
            .await;
        assert!(matches!(same_email, Err(ApplicationError::Conflict(_))));

        let short = registrar
            .handle(register("third", "third@example.com", "12345"))
            .await;
        assert!(matches!(short, Err(ApplicationError::ValidationError(_))));
    }
}
