//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 章节排序配置
    #[serde(default)]
    pub ordering: OrderingConfig,

    /// 统计对账配置
    #[serde(default)]
    pub reconcile: ReconcileConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/inkwell.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// 认证配置
///
/// 启动时加载一次，之后不可修改
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT 签名密钥（必须配置）
    #[serde(default)]
    pub jwt_secret: String,

    /// 令牌有效期（秒）
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
}

/// 最短密钥长度（字节）
pub const MIN_JWT_SECRET_LEN: usize = 16;

fn default_token_ttl() -> u64 {
    7 * 24 * 3600 // 7 天
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_secs: default_token_ttl(),
        }
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }
}

// 密钥不出现在 Debug 输出中
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// 章节排序配置
#[derive(Debug, Clone, Deserialize)]
pub struct OrderingConfig {
    /// 等待小说锁的最长时间（毫秒）
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout() -> u64 {
    5000
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout(),
        }
    }
}

impl OrderingConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

/// 统计对账配置
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// 是否启用后台对账
    #[serde(default = "default_reconcile_enabled")]
    pub enabled: bool,

    /// 对账间隔（秒）
    #[serde(default = "default_reconcile_interval")]
    pub interval_secs: u64,
}

fn default_reconcile_enabled() -> bool {
    true
}

fn default_reconcile_interval() -> u64 {
    60
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            enabled: default_reconcile_enabled(),
            interval_secs: default_reconcile_interval(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.database.path, "data/inkwell.db");
        assert_eq!(config.auth.token_ttl(), Duration::from_secs(604800));
        assert_eq!(config.ordering.lock_timeout(), Duration::from_secs(5));
        assert!(config.reconcile.enabled);
    }

    #[test]
    fn test_auth_debug_hides_secret() {
        let auth = AuthConfig {
            jwt_secret: "super-secret-signing-key".to_string(),
            ..AuthConfig::default()
        };
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("super-secret"));
    }
}
