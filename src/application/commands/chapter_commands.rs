//! Chapter Commands

use uuid::Uuid;

/// 创建章节命令（追加到末尾）
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub principal: Uuid,
    pub novel_id: Uuid,
    pub title: String,
    pub content: Option<String>,
}

/// 更新章节命令（字段为 None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    pub principal: Uuid,
    pub chapter_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<String>,
    pub is_gated: Option<bool>,
}

/// 自动保存命令（只改正文）
#[derive(Debug, Clone)]
pub struct AutosaveChapter {
    pub principal: Uuid,
    pub chapter_id: Uuid,
    pub content: Option<String>,
}

/// 删除章节命令
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub principal: Uuid,
    pub chapter_id: Uuid,
}

/// 调整章节顺序命令
#[derive(Debug, Clone)]
pub struct ReorderChapter {
    pub principal: Uuid,
    pub chapter_id: Uuid,
    pub new_index: i64,
}
