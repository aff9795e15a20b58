//! Novel Commands

use uuid::Uuid;

/// 创建小说命令
#[derive(Debug, Clone)]
pub struct CreateNovel {
    pub principal: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// 更新小说信息命令（字段为 None 表示不修改）
#[derive(Debug, Clone)]
pub struct UpdateNovel {
    pub principal: Uuid,
    pub novel_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

/// 删除小说命令
#[derive(Debug, Clone)]
pub struct DeleteNovel {
    pub principal: Uuid,
    pub novel_id: Uuid,
}
