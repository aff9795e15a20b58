//! Novel Query Handlers

use std::sync::Arc;

use crate::application::access_guard::AccessGuard;
use crate::application::error::ApplicationError;
use crate::application::ports::{NovelRecord, NovelRepositoryPort};
use crate::application::queries::{GetNovel, ListNovels};

/// GetNovel Handler
pub struct GetNovelHandler {
    guard: Arc<AccessGuard>,
}

impl GetNovelHandler {
    pub fn new(guard: Arc<AccessGuard>) -> Self {
        Self { guard }
    }

    pub async fn handle(&self, query: GetNovel) -> Result<NovelRecord, ApplicationError> {
        self.guard
            .authorize_novel(query.principal, query.novel_id)
            .await
    }
}

/// ListNovels Handler - 只返回当前用户自己的小说
pub struct ListNovelsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
}

impl ListNovelsHandler {
    pub fn new(novel_repo: Arc<dyn NovelRepositoryPort>) -> Self {
        Self { novel_repo }
    }

    pub async fn handle(&self, query: ListNovels) -> Result<Vec<NovelRecord>, ApplicationError> {
        Ok(self.novel_repo.find_by_user(query.principal).await?)
    }
}
