//! In-Memory Novel Lock Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::application::ports::{LockError, NovelLease, NovelLockPort};

/// 内存小说锁表
///
/// 每本小说一把 tokio Mutex，按需创建
pub struct InMemoryNovelLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
    timeout: Duration,
}

impl InMemoryNovelLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            locks: DashMap::new(),
            timeout,
        }
    }

    /// 当前锁表条目数
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[async_trait]
impl NovelLockPort for InMemoryNovelLocks {
    async fn acquire(&self, novel_id: Uuid) -> Result<NovelLease, LockError> {
        // 先克隆出 Arc，避免持有 DashMap 分片锁时 await
        let mutex = self
            .locks
            .entry(novel_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        match tokio::time::timeout(self.timeout, mutex.lock_owned()).await {
            Ok(guard) => Ok(NovelLease::new(novel_id, guard)),
            Err(_) => {
                tracing::warn!(
                    novel_id = %novel_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Novel lock acquisition timed out"
                );
                Err(LockError::Timeout {
                    novel_id,
                    waited_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }

    fn prune_idle(&self) -> usize {
        let before = self.locks.len();
        // 只有锁表自己持有引用时才是空闲的
        self.locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        let pruned = before.saturating_sub(self.locks.len());

        if pruned > 0 {
            tracing::debug!(pruned = pruned, "Idle novel locks pruned");
        }

        pruned
    }
}

/// 后台定期清理空闲锁条目
pub fn spawn_lock_pruner(locks: Arc<dyn NovelLockPort>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // 第一次 tick 立即返回
        ticker.tick().await;
        loop {
            ticker.tick().await;
            locks.prune_idle();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_acquire_times_out_while_held() {
        let locks = InMemoryNovelLocks::new(Duration::from_millis(50));
        let novel_id = Uuid::new_v4();

        let lease = locks.acquire(novel_id).await.unwrap();
        assert_eq!(lease.novel_id(), novel_id);

        let result = locks.acquire(novel_id).await;
        assert!(matches!(result, Err(LockError::Timeout { .. })));

        // 其他小说不受影响
        locks.acquire(Uuid::new_v4()).await.unwrap();

        drop(lease);
        locks.acquire(novel_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_waiter_proceeds_after_release() {
        let locks = Arc::new(InMemoryNovelLocks::new(Duration::from_secs(5)));
        let novel_id = Uuid::new_v4();

        let lease = locks.acquire(novel_id).await.unwrap();
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire(novel_id).await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(lease);

        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_prune_idle_keeps_held_locks() {
        let locks = InMemoryNovelLocks::new(Duration::from_millis(50));
        let held = Uuid::new_v4();

        let _lease = locks.acquire(held).await.unwrap();
        drop(locks.acquire(Uuid::new_v4()).await.unwrap());
        assert_eq!(locks.len(), 2);

        assert_eq!(locks.prune_idle(), 1);
        assert_eq!(locks.len(), 1);
        assert!(matches!(
            locks.acquire(held).await,
            Err(LockError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_pruner_runs_in_background() {
        let locks = Arc::new(InMemoryNovelLocks::new(Duration::from_millis(50)));
        drop(locks.acquire(Uuid::new_v4()).await.unwrap());
        assert_eq!(locks.len(), 1);

        let pruner = spawn_lock_pruner(locks.clone(), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        pruner.abort();

        assert!(locks.is_empty());
    }
}
