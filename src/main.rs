//! Inkwell - 连载小说创作后端
//!
//! 架构:
//! - Domain: word_count, novel/, chapter/
//! - Application: commands, queries, ports, access_guard, novel_stats
//! - Infrastructure: http, memory, persistence, adapters

use std::sync::Arc;
use std::time::Duration;

use inkwell::config::{load_config, print_config, LogConfig};
use inkwell::infrastructure::adapters::{Argon2PasswordHasher, JwtTokenService};
use inkwell::infrastructure::http::{AppState, HttpServer, ServerConfig};
use inkwell::infrastructure::memory::{spawn_lock_pruner, InMemoryNovelLocks};
use inkwell::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository, SqliteNovelRepository,
    SqliteUserRepository,
};

/// 空闲小说锁的清理周期
const LOCK_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},inkwell={},tower_http=debug", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);

    tracing::info!("Inkwell - 连载小说创作后端");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    // 初始化数据库
    let db_config = DatabaseConfig::new(&config.database.path)
        .with_max_connections(config.database.max_connections);
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let novel_repo = Arc::new(SqliteNovelRepository::new(pool.clone()));
    let chapter_repo = Arc::new(SqliteChapterRepository::new(pool.clone()));

    // 按小说串行化排序修改
    let locks = Arc::new(InMemoryNovelLocks::new(config.ordering.lock_timeout()));

    // 认证
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let tokens = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl(),
    ));

    let state = Arc::new(AppState::new(
        user_repo,
        novel_repo,
        chapter_repo,
        locks.clone(),
        hasher,
        tokens,
    ));

    // 启动时全量对账，修复上次运行遗留的统计偏差
    if let Err(e) = state.stats.reconcile_all().await {
        tracing::warn!(error = %e, "Startup stats reconciliation failed");
    }

    // 锁表清理与统计对账互不依赖
    spawn_lock_pruner(locks, LOCK_PRUNE_INTERVAL);

    if config.reconcile.enabled {
        let stats = state.stats.clone();
        let period = Duration::from_secs(config.reconcile.interval_secs.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // 第一次 tick 立即返回
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if stats.pending_count() > 0 {
                    stats.retry_pending().await;
                }
            }
        });
    }

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
