//! Novel Queries

use uuid::Uuid;

/// 获取小说详情查询
#[derive(Debug, Clone)]
pub struct GetNovel {
    pub principal: Uuid,
    pub novel_id: Uuid,
}

/// 列出当前用户的小说查询
#[derive(Debug, Clone)]
pub struct ListNovels {
    pub principal: Uuid,
}
