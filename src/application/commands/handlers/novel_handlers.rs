//! Novel Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access_guard::AccessGuard;
use crate::application::commands::{CreateNovel, DeleteNovel, UpdateNovel};
use crate::application::error::ApplicationError;
use crate::application::novel_stats::NovelStatsRecalculator;
use crate::application::ports::{NovelLockPort, NovelRecord, NovelRepositoryPort};
use crate::domain::novel::{NovelStatus, Title};

/// 未指定分类时的默认分类
pub const DEFAULT_CATEGORY: &str = "other";

// ============================================================================
// CreateNovel
// ============================================================================

/// CreateNovel Handler
pub struct CreateNovelHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl CreateNovelHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, command: CreateNovel) -> Result<NovelRecord, ApplicationError> {
        let title = Title::new(&command.title).map_err(ApplicationError::validation)?;
        let now = Utc::now();

        let novel = NovelRecord {
            id: Uuid::new_v4(),
            user_id: command.principal,
            title: title.into_inner(),
            description: command
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            cover: None,
            category: non_blank(command.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            status: NovelStatus::Ongoing,
            total_words: 0,
            total_chapters: 0,
            created_at: now,
            last_updated: now,
        };

        self.novel_repo.save(&novel).await?;

        tracing::info!(
            novel_id = %novel.id,
            user_id = %novel.user_id,
            title = %novel.title,
            "Novel created"
        );

        Ok(novel)
    }
}

// ============================================================================
// UpdateNovel
// ============================================================================

/// UpdateNovel Handler - 部分字段更新
pub struct UpdateNovelHandler {
    guard: Arc<AccessGuard>,
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl UpdateNovelHandler {
    pub fn new(guard: Arc<AccessGuard>, novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { guard, novel_repo }
    }

    pub async fn handle(&self, command: UpdateNovel) -> Result<NovelRecord, ApplicationError> {
        let mut novel = self
            .guard
            .authorize_novel(command.principal, command.novel_id)
            .await?;

        let title = command
            .title
            .map(|title| Title::new(title).map_err(ApplicationError::validation))
            .transpose()?;
        let status = command
            .status
            .map(|status| {
                NovelStatus::parse(&status).ok_or_else(|| {
                    ApplicationError::validation(format!("Unknown novel status: {}", status))
                })
            })
            .transpose()?;

        if let Some(title) = title {
            novel.title = title.into_inner();
        }
        if let Some(description) = command.description {
            novel.description = description.trim().to_string();
        }
        if let Some(cover) = command.cover {
            novel.cover = non_blank(Some(cover));
        }
        if let Some(category) = non_blank(command.category) {
            novel.category = category;
        }
        if let Some(status) = status {
            novel.status = status;
        }
        novel.last_updated = Utc::now();

        self.novel_repo.save(&novel).await?;

        tracing::info!(
            novel_id = %novel.id,
            status = novel.status.as_str(),
            "Novel updated"
        );

        Ok(novel)
    }
}

// ============================================================================
// DeleteNovel
// ============================================================================

/// DeleteNovel Handler - 删除小说及全部章节
pub struct DeleteNovelHandler {
    guard: Arc<AccessGuard>,
    novel_repo: Arc<dyn NovelRepositoryPort>,
    locks: Arc<dyn NovelLockPort>,
    stats: Arc<NovelStatsRecalculator>,
}

impl DeleteNovelHandler {
    pub fn new(
        guard: Arc<AccessGuard>,
        novel_repo: Arc<dyn NovelRepositoryPort>,
        locks: Arc<dyn NovelLockPort>,
        stats: Arc<NovelStatsRecalculator>,
    ) -> Self {
        Self {
            guard,
            novel_repo,
            locks,
            stats,
        }
    }

    pub async fn handle(&self, command: DeleteNovel) -> Result<(), ApplicationError> {
        let novel = self
            .guard
            .authorize_novel(command.principal, command.novel_id)
            .await?;

        {
            // 与章节排序修改互斥，避免删除过程中仍有章节被追加
            let _lease = self.locks.acquire(novel.id).await?;
            self.novel_repo.delete(novel.id).await?;
        }
        self.stats.forget(novel.id);

        tracing::info!(
            novel_id = %novel.id,
            title = %novel.title,
            "Novel deleted"
        );

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
