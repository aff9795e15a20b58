//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Shared services
    AccessGuard, NovelStatsRecalculator,
    // Command handlers
    AutosaveChapterHandler, CreateChapterHandler, CreateNovelHandler, DeleteChapterHandler,
    DeleteNovelHandler, LoginHandler, RegisterUserHandler, ReorderChapterHandler,
    UpdateChapterHandler, UpdateNovelHandler,
    // Query handlers
    GetChapterHandler, GetCurrentUserHandler, GetNovelHandler, ListChaptersHandler,
    ListNovelsHandler,
    // Ports
    ChapterRepositoryPort, NovelLockPort, NovelRepositoryPort, PasswordHasherPort,
    TokenServicePort, UserRepositoryPort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub tokens: Arc<dyn TokenServicePort>,
    pub locks: Arc<dyn NovelLockPort>,
    pub stats: Arc<NovelStatsRecalculator>,

    // ========== Command Handlers ==========
    pub register_handler: RegisterUserHandler,
    pub login_handler: LoginHandler,
    pub create_novel_handler: CreateNovelHandler,
    pub update_novel_handler: UpdateNovelHandler,
    pub delete_novel_handler: DeleteNovelHandler,
    pub create_chapter_handler: CreateChapterHandler,
    pub update_chapter_handler: UpdateChapterHandler,
    pub autosave_chapter_handler: AutosaveChapterHandler,
    pub delete_chapter_handler: DeleteChapterHandler,
    pub reorder_chapter_handler: ReorderChapterHandler,

    // ========== Query Handlers ==========
    pub current_user_handler: GetCurrentUserHandler,
    pub get_novel_handler: GetNovelHandler,
    pub list_novels_handler: ListNovelsHandler,
    pub get_chapter_handler: GetChapterHandler,
    pub list_chapters_handler: ListChaptersHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        novel_repo: Arc<dyn NovelRepositoryPort>,
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        locks: Arc<dyn NovelLockPort>,
        hasher: Arc<dyn PasswordHasherPort>,
        tokens: Arc<dyn TokenServicePort>,
    ) -> Self {
        let guard = Arc::new(AccessGuard::new(novel_repo.clone(), chapter_repo.clone()));
        let stats = Arc::new(NovelStatsRecalculator::new(novel_repo.clone()));

        Self {
            // Ports
            tokens: tokens.clone(),
            locks: locks.clone(),
            stats: stats.clone(),

            // Command handlers
            register_handler: RegisterUserHandler::new(
                user_repo.clone(),
                hasher.clone(),
                tokens.clone(),
            ),
            login_handler: LoginHandler::new(user_repo.clone(), hasher.clone(), tokens.clone()),
            create_novel_handler: CreateNovelHandler::new(novel_repo.clone()),
            update_novel_handler: UpdateNovelHandler::new(guard.clone(), novel_repo.clone()),
            delete_novel_handler: DeleteNovelHandler::new(
                guard.clone(),
                novel_repo.clone(),
                locks.clone(),
                stats.clone(),
            ),
            create_chapter_handler: CreateChapterHandler::new(
                guard.clone(),
                chapter_repo.clone(),
                locks.clone(),
                stats.clone(),
            ),
            update_chapter_handler: UpdateChapterHandler::new(
                guard.clone(),
                chapter_repo.clone(),
                stats.clone(),
            ),
            autosave_chapter_handler: AutosaveChapterHandler::new(
                guard.clone(),
                chapter_repo.clone(),
                stats.clone(),
            ),
            delete_chapter_handler: DeleteChapterHandler::new(
                guard.clone(),
                chapter_repo.clone(),
                locks.clone(),
                stats.clone(),
            ),
            reorder_chapter_handler: ReorderChapterHandler::new(
                guard.clone(),
                chapter_repo.clone(),
                locks.clone(),
                stats.clone(),
            ),

            // Query handlers
            current_user_handler: GetCurrentUserHandler::new(user_repo.clone()),
            get_novel_handler: GetNovelHandler::new(guard.clone()),
            list_novels_handler: ListNovelsHandler::new(novel_repo.clone()),
            get_chapter_handler: GetChapterHandler::new(guard.clone()),
            list_chapters_handler: ListChaptersHandler::new(guard, chapter_repo),
        }
    }
}
