//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（如 SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::chapter::{ChapterStatus, ShiftWindow};
use crate::domain::novel::{NovelStats, NovelStatus};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    /// 存储层检测到并发修改（乐观校验失败）
    #[error("Concurrent modification: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体（用于持久化）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 新建用户，用户名或邮箱重复时返回 Duplicate
    async fn insert(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError>;

    /// 根据用户名或邮箱查找用户
    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, RepositoryError>;
}

// ============================================================================
// Novel Repository
// ============================================================================

/// 小说实体（用于持久化）
#[derive(Debug, Clone)]
pub struct NovelRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub cover: Option<String>,
    pub category: String,
    pub status: NovelStatus,
    pub total_words: usize,
    pub total_chapters: usize,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl NovelRecord {
    pub fn stats(&self) -> NovelStats {
        NovelStats {
            total_words: self.total_words,
            total_chapters: self.total_chapters,
        }
    }
}

/// Novel Repository Port
#[async_trait]
pub trait NovelRepositoryPort: Send + Sync {
    /// 保存小说（不存在则插入，存在则更新基本信息）
    ///
    /// 统计字段只在插入时写入，之后只能通过 `refresh_stats` 修改
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找小说
    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError>;

    /// 获取用户的所有小说（最近更新在前）
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<NovelRecord>, RepositoryError>;

    /// 获取所有小说 ID（用于统计对账）
    async fn find_all_ids(&self) -> Result<Vec<Uuid>, RepositoryError>;

    /// 删除小说及其全部章节
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 根据当前章节原子地重算并写入统计，同时推进 last_updated（不会回退）
    ///
    /// 小说不存在时返回 None
    async fn refresh_stats(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<NovelStats>, RepositoryError>;
}

// ============================================================================
// Chapter Repository
// ============================================================================

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub order_index: u32,
    pub status: ChapterStatus,
    pub is_gated: bool,
    pub publish_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 章节摘要（列表用，不含正文）
#[derive(Debug, Clone)]
pub struct ChapterSummaryRecord {
    pub id: Uuid,
    pub title: String,
    pub word_count: usize,
    pub order_index: u32,
    pub status: ChapterStatus,
    pub is_gated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 章节部分更新（None 表示该列保持存储中的当前值）
#[derive(Debug, Clone, Default)]
pub struct ChapterChanges {
    pub title: Option<String>,
    /// 正文与字数总是一起写入
    pub content: Option<(String, usize)>,
    pub status: Option<ChapterStatus>,
    pub is_gated: Option<bool>,
    /// 只在存储中尚无发布时间时写入
    pub publish_time: Option<DateTime<Utc>>,
}

/// Chapter Repository Port
///
/// 改变排序的方法（append / remove / move_to）必须各自原子完成，
/// 并发读者不能观察到重复或缺失的 order_index
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 追加章节到末尾，忽略传入的 order_index，返回实际分配的位置
    async fn append(&self, chapter: &ChapterRecord) -> Result<u32, RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 获取小说的章节摘要（按 order_index 升序）
    async fn find_by_novel_id(
        &self,
        novel_id: Uuid,
    ) -> Result<Vec<ChapterSummaryRecord>, RepositoryError>;

    /// 小说当前章节数
    async fn count_by_novel(&self, novel_id: Uuid) -> Result<u32, RepositoryError>;

    /// 只写入 `changes` 中给出的列（不修改排序），返回更新后的章节
    async fn update(
        &self,
        id: Uuid,
        changes: &ChapterChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<ChapterRecord, RepositoryError>;

    /// 仅更新正文与字数（自动保存）
    async fn update_content(
        &self,
        id: Uuid,
        content: &str,
        word_count: usize,
        saved_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// 删除位于 `order_index` 的章节并按 `shift` 收拢后续章节
    async fn remove(
        &self,
        id: Uuid,
        novel_id: Uuid,
        order_index: u32,
        shift: ShiftWindow,
    ) -> Result<(), RepositoryError>;

    /// 把章节从 `from` 移到 `to`，区间内其他章节按 `shift` 平移
    ///
    /// 章节当前位置不是 `from` 时返回 Conflict 且不做任何修改
    async fn move_to(
        &self,
        id: Uuid,
        novel_id: Uuid,
        from: u32,
        to: u32,
        shift: ShiftWindow,
    ) -> Result<(), RepositoryError>;
}
