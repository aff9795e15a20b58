//! Chapter Command Handlers
//!
//! 章节生命周期：创建、更新、自动保存、删除、调整顺序。
//! 每个处理器先经过 AccessGuard 校验所有权，再执行修改；
//! 改变排序的操作在小说锁内完成，统计重算在锁外尽力执行。

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access_guard::AccessGuard;
use crate::application::commands::{
    AutosaveChapter, CreateChapter, DeleteChapter, ReorderChapter, UpdateChapter,
};
use crate::application::error::ApplicationError;
use crate::application::novel_stats::NovelStatsRecalculator;
use crate::application::ports::{
    ChapterChanges, ChapterRecord, ChapterRepositoryPort, NovelLockPort,
};
use crate::domain::chapter::{ordering, transition, ChapterStatus, ReorderPlan};
use crate::domain::count_words;
use crate::domain::novel::Title;

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler - 追加章节到小说末尾
pub struct CreateChapterHandler {
    guard: Arc<AccessGuard>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    locks: Arc<dyn NovelLockPort>,
    stats: Arc<NovelStatsRecalculator>,
}

impl CreateChapterHandler {
    pub fn new(
        guard: Arc<AccessGuard>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        locks: Arc<dyn NovelLockPort>,
        stats: Arc<NovelStatsRecalculator>,
    ) -> Self {
        Self {
            guard,
            chapter_repo,
            locks,
            stats,
        }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<ChapterRecord, ApplicationError> {
        let novel = self
            .guard
            .authorize_novel(command.principal, command.novel_id)
            .await?;

        let title = Title::new(&command.title).map_err(ApplicationError::validation)?;
        let content = command.content.unwrap_or_default();
        let now = Utc::now();

        let mut chapter = ChapterRecord {
            id: Uuid::new_v4(),
            novel_id: novel.id,
            title: title.into_inner(),
            word_count: count_words(Some(&content)),
            content,
            order_index: 0, // 由仓储分配
            status: ChapterStatus::Draft,
            is_gated: false,
            publish_time: None,
            created_at: now,
            updated_at: now,
        };

        {
            let _lease = self.locks.acquire(novel.id).await?;
            // 等锁期间小说可能已被删除，删除同样持有该锁
            self.guard
                .authorize_novel(command.principal, novel.id)
                .await?;
            chapter.order_index = self.chapter_repo.append(&chapter).await?;
        }

        tracing::info!(
            novel_id = %novel.id,
            chapter_id = %chapter.id,
            order_index = chapter.order_index,
            word_count = chapter.word_count,
            "Chapter created"
        );

        self.stats.reconcile(novel.id).await;

        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler - 部分字段更新
pub struct UpdateChapterHandler {
    guard: Arc<AccessGuard>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    stats: Arc<NovelStatsRecalculator>,
}

impl UpdateChapterHandler {
    pub fn new(
        guard: Arc<AccessGuard>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        stats: Arc<NovelStatsRecalculator>,
    ) -> Self {
        Self {
            guard,
            chapter_repo,
            stats,
        }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ApplicationError> {
        let authorized = self
            .guard
            .authorize_chapter(command.principal, command.chapter_id)
            .await?;

        // 先完成全部校验，再做任何修改
        let title = command
            .title
            .map(|title| Title::new(title).map_err(ApplicationError::validation))
            .transpose()?;
        let status = command
            .status
            .map(|status| {
                ChapterStatus::parse(&status).ok_or_else(|| {
                    ApplicationError::validation(format!("Unknown chapter status: {}", status))
                })
            })
            .transpose()?;

        let now = Utc::now();

        // 只写入请求给出的字段，未给出的列由存储保留最新值
        let changes = ChapterChanges {
            title: title.map(Title::into_inner),
            content: command.content.map(|content| {
                let word_count = count_words(Some(&content));
                (content, word_count)
            }),
            status,
            is_gated: command.is_gated,
            publish_time: status.and_then(|status| {
                transition(authorized.chapter.publish_time, status, now).publish_time
            }),
        };

        let chapter = self
            .chapter_repo
            .update(command.chapter_id, &changes, now)
            .await?;

        tracing::info!(
            novel_id = %chapter.novel_id,
            chapter_id = %chapter.id,
            status = chapter.status.as_str(),
            word_count = chapter.word_count,
            "Chapter updated"
        );

        self.stats.reconcile(chapter.novel_id).await;

        Ok(chapter)
    }
}

// ============================================================================
// AutosaveChapter
// ============================================================================

/// 自动保存响应
#[derive(Debug, Clone)]
pub struct AutosaveResponse {
    pub word_count: usize,
    pub saved_at: DateTime<Utc>,
}

/// AutosaveChapter Handler - 只写正文，后到者覆盖先到者
pub struct AutosaveChapterHandler {
    guard: Arc<AccessGuard>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    stats: Arc<NovelStatsRecalculator>,
}

impl AutosaveChapterHandler {
    pub fn new(
        guard: Arc<AccessGuard>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        stats: Arc<NovelStatsRecalculator>,
    ) -> Self {
        Self {
            guard,
            chapter_repo,
            stats,
        }
    }

    pub async fn handle(
        &self,
        command: AutosaveChapter,
    ) -> Result<AutosaveResponse, ApplicationError> {
        let authorized = self
            .guard
            .authorize_chapter(command.principal, command.chapter_id)
            .await?;

        let content = command.content.unwrap_or_default();
        let word_count = count_words(Some(&content));
        let saved_at = Utc::now();

        self.chapter_repo
            .update_content(command.chapter_id, &content, word_count, saved_at)
            .await?;

        tracing::debug!(
            chapter_id = %command.chapter_id,
            word_count = word_count,
            "Chapter autosaved"
        );

        self.stats.reconcile(authorized.novel.id).await;

        Ok(AutosaveResponse {
            word_count,
            saved_at,
        })
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler - 删除章节并收拢后续章节
pub struct DeleteChapterHandler {
    guard: Arc<AccessGuard>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    locks: Arc<dyn NovelLockPort>,
    stats: Arc<NovelStatsRecalculator>,
}

impl DeleteChapterHandler {
    pub fn new(
        guard: Arc<AccessGuard>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        locks: Arc<dyn NovelLockPort>,
        stats: Arc<NovelStatsRecalculator>,
    ) -> Self {
        Self {
            guard,
            chapter_repo,
            locks,
            stats,
        }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<(), ApplicationError> {
        let authorized = self
            .guard
            .authorize_chapter(command.principal, command.chapter_id)
            .await?;
        let novel_id = authorized.novel.id;

        let removed_index = {
            let _lease = self.locks.acquire(novel_id).await?;

            // 持锁后重新读取，位置可能已被其他请求调整
            let chapter = self
                .chapter_repo
                .find_by_id(command.chapter_id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;

            let shift = ordering::plan_removal(chapter.order_index);
            self.chapter_repo
                .remove(chapter.id, novel_id, chapter.order_index, shift)
                .await?;
            chapter.order_index
        };

        tracing::info!(
            novel_id = %novel_id,
            chapter_id = %command.chapter_id,
            order_index = removed_index,
            "Chapter deleted"
        );

        self.stats.reconcile(novel_id).await;

        Ok(())
    }
}

// ============================================================================
// ReorderChapter
// ============================================================================

/// 调整顺序结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// 目标位置即当前位置，未做任何修改
    Unchanged,
    /// 已从 `from` 移动到 `to`
    Moved { from: u32, to: u32 },
}

/// ReorderChapter Handler - 调整章节顺序
pub struct ReorderChapterHandler {
    guard: Arc<AccessGuard>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    locks: Arc<dyn NovelLockPort>,
    stats: Arc<NovelStatsRecalculator>,
}

impl ReorderChapterHandler {
    pub fn new(
        guard: Arc<AccessGuard>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        locks: Arc<dyn NovelLockPort>,
        stats: Arc<NovelStatsRecalculator>,
    ) -> Self {
        Self {
            guard,
            chapter_repo,
            locks,
            stats,
        }
    }

    pub async fn handle(&self, command: ReorderChapter) -> Result<ReorderOutcome, ApplicationError> {
        let authorized = self
            .guard
            .authorize_chapter(command.principal, command.chapter_id)
            .await?;
        let novel_id = authorized.novel.id;

        let outcome = {
            let _lease = self.locks.acquire(novel_id).await?;

            let chapter = self
                .chapter_repo
                .find_by_id(command.chapter_id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("Chapter", command.chapter_id))?;
            let total = self.chapter_repo.count_by_novel(novel_id).await?;

            match ordering::plan_reorder(chapter.order_index, command.new_index, total)? {
                ReorderPlan::Unchanged => ReorderOutcome::Unchanged,
                ReorderPlan::Move { from, to, shift } => {
                    self.chapter_repo
                        .move_to(chapter.id, novel_id, from, to, shift)
                        .await?;
                    ReorderOutcome::Moved { from, to }
                }
            }
        };

        match outcome {
            ReorderOutcome::Unchanged => {
                tracing::debug!(chapter_id = %command.chapter_id, "Chapter order unchanged");
            }
            ReorderOutcome::Moved { from, to } => {
                tracing::info!(
                    novel_id = %novel_id,
                    chapter_id = %command.chapter_id,
                    from = from,
                    to = to,
                    "Chapter reordered"
                );
                self.stats.reconcile(novel_id).await;
            }
        }

        Ok(outcome)
    }
}
