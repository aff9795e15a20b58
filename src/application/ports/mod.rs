//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod auth;
mod novel_lock;
mod repositories;

pub use auth::{AuthError, PasswordHasherPort, TokenServicePort};
pub use novel_lock::{LockError, NovelLease, NovelLockPort};
pub use repositories::{
    ChapterChanges, ChapterRecord, ChapterRepositoryPort, ChapterSummaryRecord, NovelRecord,
    NovelRepositoryPort, RepositoryError, UserRecord, UserRepositoryPort,
};
