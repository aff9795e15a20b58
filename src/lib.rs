//! Inkwell - 多用户连载小说写作后端
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Novel Context: 小说、状态与统计
//! - Chapter Context: 章节状态流转、顺序规划、字数统计
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, NovelLock, TokenService, PasswordHasher）
//! - AccessGuard / NovelStatsRecalculator
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: 小说级互斥锁
//! - Persistence: SQLite 存储
//! - Adapters: JWT、Argon2

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
mod test_support;

pub use config::{load_config, AppConfig};
