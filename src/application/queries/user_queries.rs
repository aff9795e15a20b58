//! User Queries

use uuid::Uuid;

/// 获取当前用户查询
#[derive(Debug, Clone)]
pub struct GetCurrentUser {
    pub principal: Uuid,
}
