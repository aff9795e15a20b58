//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::access_guard::AccessGuard;
use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterRecord, ChapterRepositoryPort, ChapterSummaryRecord};
use crate::application::queries::{GetChapter, ListChapters};

/// GetChapter Handler
pub struct GetChapterHandler {
    guard: Arc<AccessGuard>,
}

impl GetChapterHandler {
    pub fn new(guard: Arc<AccessGuard>) -> Self {
        Self { guard }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterRecord, ApplicationError> {
        let authorized = self
            .guard
            .authorize_chapter(query.principal, query.chapter_id)
            .await?;
        Ok(authorized.chapter)
    }
}

/// 章节列表响应
#[derive(Debug, Clone)]
pub struct ChapterListResponse {
    pub novel_id: uuid::Uuid,
    pub novel_title: String,
    pub chapters: Vec<ChapterSummaryRecord>,
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    guard: Arc<AccessGuard>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(guard: Arc<AccessGuard>, chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self {
            guard,
            chapter_repo,
        }
    }

    pub async fn handle(&self, query: ListChapters) -> Result<ChapterListResponse, ApplicationError> {
        let novel = self
            .guard
            .authorize_novel(query.principal, query.novel_id)
            .await?;

        let chapters = self.chapter_repo.find_by_novel_id(novel.id).await?;

        Ok(ChapterListResponse {
            novel_id: novel.id,
            novel_title: novel.title,
            chapters,
        })
    }
}
