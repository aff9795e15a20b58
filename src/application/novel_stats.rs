//! Novel Stats - 小说统计重算
//!
//! 总字数与总章节数是章节数据的冗余，每次章节新增、修改、删除、调整顺序后重算。
//! 重算是尽力而为的：失败不会回滚章节修改，只记录日志并加入待对账集合，
//! 由后台任务重试。
//!
//! 汇总与写回在存储层的同一条语句中完成，最后一次重算总能看到此前已提交的全部章节修改。

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashSet;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::NovelRepositoryPort;
use crate::domain::novel::NovelStats;

/// 小说统计重算器
pub struct NovelStatsRecalculator {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    /// 重算失败、等待对账的小说
    pending: DashSet<Uuid>,
}

impl NovelStatsRecalculator {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self {
            novel_repo,
            pending: DashSet::new(),
        }
    }

    /// 从章节重新汇总统计并写回小说
    ///
    /// 幂等：章节不变时重复调用得到相同结果
    pub async fn recalculate(&self, novel_id: Uuid) -> Result<NovelStats, ApplicationError> {
        let stats = self
            .novel_repo
            .refresh_stats(novel_id, Utc::now())
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        tracing::debug!(
            novel_id = %novel_id,
            total_words = stats.total_words,
            total_chapters = stats.total_chapters,
            "Novel stats recalculated"
        );

        Ok(stats)
    }

    /// 尽力重算：失败时记录日志并加入待对账集合
    pub async fn reconcile(&self, novel_id: Uuid) -> Option<NovelStats> {
        match self.recalculate(novel_id).await {
            Ok(stats) => {
                self.pending.remove(&novel_id);
                Some(stats)
            }
            // 小说已被删除，无需对账
            Err(ApplicationError::NotFound { .. }) => {
                self.pending.remove(&novel_id);
                None
            }
            Err(e) => {
                tracing::error!(
                    novel_id = %novel_id,
                    error = %e,
                    "Novel stats recalculation failed, queued for reconciliation"
                );
                self.pending.insert(novel_id);
                None
            }
        }
    }

    /// 等待对账的小说数量
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// 重试所有待对账的小说，返回成功数量
    pub async fn retry_pending(&self) -> usize {
        let novel_ids: Vec<Uuid> = self.pending.iter().map(|id| *id).collect();
        let mut reconciled = 0;

        for novel_id in novel_ids {
            if self.reconcile(novel_id).await.is_some() {
                reconciled += 1;
            }
        }

        if reconciled > 0 {
            tracing::info!(reconciled = reconciled, "Pending novel stats reconciled");
        }

        reconciled
    }

    /// 全量对账（启动时执行）
    pub async fn reconcile_all(&self) -> Result<usize, ApplicationError> {
        let novel_ids = self.novel_repo.find_all_ids().await?;
        let total = novel_ids.len();
        let mut reconciled = 0;

        for novel_id in novel_ids {
            if self.reconcile(novel_id).await.is_some() {
                reconciled += 1;
            }
        }

        tracing::info!(total = total, reconciled = reconciled, "Novel stats sweep completed");

        Ok(reconciled)
    }

    /// 小说被删除后不再需要对账
    pub fn forget(&self, novel_id: Uuid) {
        self.pending.remove(&novel_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::application::ports::{NovelRecord, RepositoryError};
    use crate::test_support::TestContext;

    /// 可切换为不可用状态的仓储
    struct FlakyNovelRepository {
        inner: Arc<dyn NovelRepositoryPort>,
        down: AtomicBool,
    }

    #[async_trait]
    impl NovelRepositoryPort for FlakyNovelRepository {
        async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError> {
            self.inner.save(novel).await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<NovelRecord>, RepositoryError> {
            self.inner.find_by_user(user_id).await
        }

        async fn find_all_ids(&self) -> Result<Vec<Uuid>, RepositoryError> {
            self.inner.find_all_ids().await
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
            self.inner.delete(id).await
        }

        async fn refresh_stats(
            &self,
            id: Uuid,
            at: DateTime<Utc>,
        ) -> Result<Option<NovelStats>, RepositoryError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(RepositoryError::DatabaseError("storage unavailable".to_string()));
            }
            self.inner.refresh_stats(id, at).await
        }
    }

    #[tokio::test]
    async fn test_recalculate_is_idempotent() {
        let ctx = TestContext::new().await;
        let author = ctx.seed_user("author").await;
        let novel_id = ctx.seed_novel(author).await;
        ctx.seed_chapter(novel_id, "<p>Hello world</p>").await;
        ctx.seed_chapter(novel_id, "hello").await;

        let first = ctx.stats.recalculate(novel_id).await.unwrap();
        let second = ctx.stats.recalculate(novel_id).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.total_words, 15);
        assert_eq!(first.total_chapters, 2);
    }

    #[tokio::test]
    async fn test_last_updated_never_moves_backwards() {
        let ctx = TestContext::new().await;
        let author = ctx.seed_user("author").await;
        let novel_id = ctx.seed_novel(author).await;

        let later = Utc::now() + chrono::Duration::hours(1);
        ctx.novels.refresh_stats(novel_id, later).await.unwrap();
        ctx.novels.refresh_stats(novel_id, Utc::now()).await.unwrap();

        let novel = ctx.novels.find_by_id(novel_id).await.unwrap().unwrap();
        assert_eq!(novel.last_updated.timestamp_micros(), later.timestamp_micros());
    }

    #[tokio::test]
    async fn test_failed_recalculation_is_queued_and_retried() {
        let ctx = TestContext::new().await;
        let author = ctx.seed_user("author").await;
        let novel_id = ctx.seed_novel(author).await;
        ctx.seed_chapter(novel_id, "hello").await;

        let flaky = Arc::new(FlakyNovelRepository {
            inner: ctx.novels.clone(),
            down: AtomicBool::new(true),
        });
        let stats = NovelStatsRecalculator::new(flaky.clone());

        assert_eq!(stats.reconcile(novel_id).await, None);
        assert_eq!(stats.pending_count(), 1);

        flaky.down.store(false, Ordering::SeqCst);
        assert_eq!(stats.retry_pending().await, 1);
        assert_eq!(stats.pending_count(), 0);

        let novel = ctx.novels.find_by_id(novel_id).await.unwrap().unwrap();
        assert_eq!(novel.total_words, 5);
        assert_eq!(novel.total_chapters, 1);
    }

    #[tokio::test]
    async fn test_reconcile_all_repairs_drift() {
        let ctx = TestContext::new().await;
        let author = ctx.seed_user("author").await;
        let first = ctx.seed_novel(author).await;
        let second = ctx.seed_novel(author).await;
        ctx.seed_chapter(first, "abc").await;
        ctx.seed_chapter(second, "de").await;

        assert_eq!(ctx.stats.reconcile_all().await.unwrap(), 2);

        let first = ctx.novels.find_by_id(first).await.unwrap().unwrap();
        let second = ctx.novels.find_by_id(second).await.unwrap().unwrap();
        assert_eq!(first.total_words, 3);
        assert_eq!(second.total_words, 2);
    }

    #[tokio::test]
    async fn test_reconcile_deleted_novel_is_dropped() {
        let ctx = TestContext::new().await;
        assert_eq!(ctx.stats.reconcile(Uuid::new_v4()).await, None);
        assert_eq!(ctx.stats.pending_count(), 0);
    }
}
