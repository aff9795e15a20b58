//! User Commands

/// 注册命令
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// 登录命令（用户名或邮箱）
#[derive(Debug, Clone)]
pub struct Login {
    pub login: String,
    pub password: String,
}
