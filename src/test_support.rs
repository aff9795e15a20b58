//! 测试辅助：基于 SQLite 的完整依赖装配

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::application::{
    AccessGuard, ChapterRecord, ChapterRepositoryPort, NovelLockPort, NovelRecord,
    NovelRepositoryPort, NovelStatsRecalculator, PasswordHasherPort, TokenServicePort, UserRecord,
    UserRepositoryPort,
};
use crate::domain::chapter::ChapterStatus;
use crate::domain::count_words;
use crate::domain::novel::NovelStatus;
use crate::infrastructure::adapters::{Argon2PasswordHasher, JwtTokenService};
use crate::infrastructure::http::AppState;
use crate::infrastructure::memory::InMemoryNovelLocks;
use crate::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository,
    SqliteNovelRepository, SqliteUserRepository,
};

const TEST_SECRET: &str = "inkwell-test-secret-key";

pub struct TestContext {
    pub users: Arc<dyn UserRepositoryPort>,
    pub novels: Arc<dyn NovelRepositoryPort>,
    pub chapters: Arc<dyn ChapterRepositoryPort>,
    pub locks: Arc<dyn NovelLockPort>,
    pub guard: Arc<AccessGuard>,
    pub stats: Arc<NovelStatsRecalculator>,
    pub hasher: Arc<dyn PasswordHasherPort>,
    pub tokens: Arc<dyn TokenServicePort>,
}

impl TestContext {
    /// 内存数据库
    pub async fn new() -> Self {
        Self::with_config(DatabaseConfig::in_memory()).await
    }

    /// 文件数据库（多连接，用于并发测试）
    pub async fn with_file(path: &Path) -> Self {
        Self::with_config(DatabaseConfig::new(path)).await
    }

    async fn with_config(config: DatabaseConfig) -> Self {
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let users: Arc<dyn UserRepositoryPort> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let novels: Arc<dyn NovelRepositoryPort> =
            Arc::new(SqliteNovelRepository::new(pool.clone()));
        let chapters: Arc<dyn ChapterRepositoryPort> =
            Arc::new(SqliteChapterRepository::new(pool.clone()));

        Self {
            guard: Arc::new(AccessGuard::new(novels.clone(), chapters.clone())),
            stats: Arc::new(NovelStatsRecalculator::new(novels.clone())),
            locks: Arc::new(InMemoryNovelLocks::new(Duration::from_secs(10))),
            hasher: Arc::new(Argon2PasswordHasher::new()),
            tokens: Arc::new(JwtTokenService::new(TEST_SECRET, Duration::from_secs(3600))),
            users,
            novels,
            chapters,
        }
    }

    /// 共享同一数据库的 HTTP 应用状态
    pub fn app_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(
            self.users.clone(),
            self.novels.clone(),
            self.chapters.clone(),
            self.locks.clone(),
            self.hasher.clone(),
            self.tokens.clone(),
        ))
    }

    pub async fn seed_user(&self, username: &str) -> Uuid {
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "not-a-real-hash".to_string(),
            created_at: Utc::now(),
        };
        self.users.insert(&user).await.unwrap();
        user.id
    }

    /// 新建统计为 0 的小说
    pub async fn seed_novel(&self, user_id: Uuid) -> Uuid {
        let now = Utc::now();
        let novel = NovelRecord {
            id: Uuid::new_v4(),
            user_id,
            title: "测试小说".to_string(),
            description: String::new(),
            cover: None,
            category: "other".to_string(),
            status: NovelStatus::Ongoing,
            total_words: 0,
            total_chapters: 0,
            created_at: now,
            last_updated: now,
        };
        self.novels.save(&novel).await.unwrap();
        novel.id
    }

    /// 直接追加章节，不重算统计
    pub async fn seed_chapter(&self, novel_id: Uuid, content: &str) -> Uuid {
        let now = Utc::now();
        let chapter = ChapterRecord {
            id: Uuid::new_v4(),
            novel_id,
            title: "章节".to_string(),
            content: content.to_string(),
            word_count: count_words(Some(content)),
            order_index: 0,
            status: ChapterStatus::Draft,
            is_gated: false,
            publish_time: None,
            created_at: now,
            updated_at: now,
        };
        self.chapters.append(&chapter).await.unwrap();
        chapter.id
    }
}
