//! Chapter Queries

use uuid::Uuid;

/// 获取章节详情查询
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub principal: Uuid,
    pub chapter_id: Uuid,
}

/// 获取小说章节列表查询（按 order_index 升序）
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub principal: Uuid,
    pub novel_id: Uuid,
}
