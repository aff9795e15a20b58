//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{ChapterRecord, ChapterSummaryRecord, NovelRecord, UserRecord};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

/// 按 ID 操作的请求体
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: Uuid,
}

// ============================================================================
// User DTOs
// ============================================================================

/// 用户信息（不含密码哈希）
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Novel DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NovelResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub cover: Option<String>,
    pub category: String,
    pub status: &'static str,
    pub total_words: usize,
    pub total_chapters: usize,
    pub created_at: String,
    pub last_updated: String,
}

impl From<NovelRecord> for NovelResponse {
    fn from(novel: NovelRecord) -> Self {
        Self {
            id: novel.id,
            title: novel.title,
            description: novel.description,
            cover: novel.cover,
            category: novel.category,
            status: novel.status.as_str(),
            total_words: novel.total_words,
            total_chapters: novel.total_chapters,
            created_at: novel.created_at.to_rfc3339(),
            last_updated: novel.last_updated.to_rfc3339(),
        }
    }
}

// ============================================================================
// Chapter DTOs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub id: Uuid,
    pub novel_id: Uuid,
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub order_index: u32,
    pub status: &'static str,
    pub is_gated: bool,
    pub publish_time: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterRecord> for ChapterResponse {
    fn from(chapter: ChapterRecord) -> Self {
        Self {
            id: chapter.id,
            novel_id: chapter.novel_id,
            title: chapter.title,
            content: chapter.content,
            word_count: chapter.word_count,
            order_index: chapter.order_index,
            status: chapter.status.as_str(),
            is_gated: chapter.is_gated,
            publish_time: chapter.publish_time.map(|t| t.to_rfc3339()),
            created_at: chapter.created_at.to_rfc3339(),
            updated_at: chapter.updated_at.to_rfc3339(),
        }
    }
}

/// 章节列表项（不含正文）
#[derive(Debug, Serialize)]
pub struct ChapterSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub word_count: usize,
    pub order_index: u32,
    pub status: &'static str,
    pub is_gated: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChapterSummaryRecord> for ChapterSummaryResponse {
    fn from(chapter: ChapterSummaryRecord) -> Self {
        Self {
            id: chapter.id,
            title: chapter.title,
            word_count: chapter.word_count,
            order_index: chapter.order_index,
            status: chapter.status.as_str(),
            is_gated: chapter.is_gated,
            created_at: chapter.created_at.to_rfc3339(),
            updated_at: chapter.updated_at.to_rfc3339(),
        }
    }
}
