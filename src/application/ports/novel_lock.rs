//! Novel Lock Port - 按小说串行化排序修改
//!
//! 追加、删除、移动章节的「读取-校验-平移-赋值」过程必须在同一把小说锁内完成

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

/// 小说锁错误
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Timed out after {waited_ms}ms waiting for novel {novel_id}")]
    Timeout { novel_id: Uuid, waited_ms: u64 },
}

/// 小说锁租约
///
/// 持有期间其他请求无法修改同一小说的章节排序，Drop 时释放
#[derive(Debug)]
pub struct NovelLease {
    novel_id: Uuid,
    _guard: OwnedMutexGuard<()>,
}

impl NovelLease {
    pub fn new(novel_id: Uuid, guard: OwnedMutexGuard<()>) -> Self {
        Self {
            novel_id,
            _guard: guard,
        }
    }

    pub fn novel_id(&self) -> Uuid {
        self.novel_id
    }
}

/// Novel Lock Port
#[async_trait]
pub trait NovelLockPort: Send + Sync {
    /// 获取小说锁，等待超过配置的超时时间后返回 Timeout
    async fn acquire(&self, novel_id: Uuid) -> Result<NovelLease, LockError>;

    /// 清理空闲的锁条目，返回清理数量
    fn prune_idle(&self) -> usize;
}
