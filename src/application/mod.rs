//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Repository、NovelLock、TokenService、PasswordHasher）
//! - access_guard: 所有权校验
//! - novel_stats: 小说统计重算与对账
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod access_guard;
pub mod commands;
pub mod error;
pub mod novel_stats;
pub mod ports;
pub mod queries;

// Re-exports
pub use access_guard::{AccessGuard, AuthorizedChapter};
pub use commands::{
    // Chapter commands
    AutosaveChapter,
    CreateChapter,
    DeleteChapter,
    ReorderChapter,
    UpdateChapter,
    // Novel commands
    CreateNovel,
    DeleteNovel,
    UpdateNovel,
    // User commands
    Login,
    RegisterUser,
    // Handlers
    handlers::{
        AuthResponse, AutosaveChapterHandler, AutosaveResponse, CreateChapterHandler,
        CreateNovelHandler, DeleteChapterHandler, DeleteNovelHandler, LoginHandler,
        RegisterUserHandler, ReorderChapterHandler, ReorderOutcome, UpdateChapterHandler,
        UpdateNovelHandler,
    },
};

pub use error::ApplicationError;
pub use novel_stats::NovelStatsRecalculator;

pub use ports::{
    // Auth
    AuthError,
    PasswordHasherPort,
    TokenServicePort,
    // Novel lock
    LockError,
    NovelLease,
    NovelLockPort,
    // Repositories
    ChapterChanges,
    ChapterRecord,
    ChapterRepositoryPort,
    ChapterSummaryRecord,
    NovelRecord,
    NovelRepositoryPort,
    RepositoryError,
    UserRecord,
    UserRepositoryPort,
};

pub use queries::{
    // Chapter queries
    GetChapter,
    ListChapters,
    // Novel queries
    GetNovel,
    ListNovels,
    // User queries
    GetCurrentUser,
    // Handlers
    handlers::{
        ChapterListResponse, GetChapterHandler, GetCurrentUserHandler, GetNovelHandler,
        ListChaptersHandler, ListNovelsHandler,
    },
};
