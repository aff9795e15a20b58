//! Access Guard - 所有权校验
//!
//! 在任何写操作或详情读取之前，解析目标所属的小说并与当前用户比对

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    ChapterRecord, ChapterRepositoryPort, NovelRecord, NovelRepositoryPort,
};

/// 已通过校验的章节及其所属小说
#[derive(Debug, Clone)]
pub struct AuthorizedChapter {
    pub chapter: ChapterRecord,
    pub novel: NovelRecord,
}

/// 所有权守卫
pub struct AccessGuard {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl AccessGuard {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            chapter_repo,
        }
    }

    /// 校验小说归属
    pub async fn authorize_novel(
        &self,
        principal: Uuid,
        novel_id: Uuid,
    ) -> Result<NovelRecord, ApplicationError> {
        let novel = self
            .novel_repo
            .find_by_id(novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        if novel.user_id != principal {
            tracing::warn!(
                principal = %principal,
                novel_id = %novel_id,
                "Access to novel denied"
            );
            return Err(ApplicationError::forbidden("Novel", novel_id));
        }

        Ok(novel)
    }

    /// 校验章节归属（通过章节所属小说的作者判断）
    pub async fn authorize_chapter(
        &self,
        principal: Uuid,
        chapter_id: Uuid,
    ) -> Result<AuthorizedChapter, ApplicationError> {
        let chapter = self
            .chapter_repo
            .find_by_id(chapter_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;

        let novel = self
            .novel_repo
            .find_by_id(chapter.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Chapter", chapter_id))?;

        if novel.user_id != principal {
            tracing::warn!(
                principal = %principal,
                chapter_id = %chapter_id,
                novel_id = %novel.id,
                "Access to chapter denied"
            );
            return Err(ApplicationError::forbidden("Chapter", chapter_id));
        }

        Ok(AuthorizedChapter { chapter, novel })
    }
}
