//! SQLite Novel Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_error, fmt_ts, parse_id, parse_ts, DbPool};
use crate::application::ports::{NovelRecord, NovelRepositoryPort, RepositoryError};
use crate::domain::novel::{NovelStats, NovelStatus};

/// SQLite Novel Repository
pub struct SqliteNovelRepository {
    pool: DbPool,
}

impl SqliteNovelRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct NovelRow {
    id: String,
    user_id: String,
    title: String,
    description: String,
    cover: Option<String>,
    category: String,
    status: String,
    total_words: i64,
    total_chapters: i64,
    created_at: String,
    last_updated: String,
}

impl TryFrom<NovelRow> for NovelRecord {
    type Error = RepositoryError;

    fn try_from(row: NovelRow) -> Result<Self, Self::Error> {
        Ok(NovelRecord {
            id: parse_id(&row.id)?,
            user_id: parse_id(&row.user_id)?,
            title: row.title,
            description: row.description,
            cover: row.cover,
            category: row.category,
            status: NovelStatus::parse(&row.status).unwrap_or_default(),
            total_words: row.total_words.max(0) as usize,
            total_chapters: row.total_chapters.max(0) as usize,
            created_at: parse_ts(&row.created_at)?,
            last_updated: parse_ts(&row.last_updated)?,
        })
    }
}

const SELECT_NOVEL: &str = "SELECT id, user_id, title, description, cover, category, status, total_words, total_chapters, created_at, last_updated FROM novels";

#[async_trait]
impl NovelRepositoryPort for SqliteNovelRepository {
    async fn save(&self, novel: &NovelRecord) -> Result<(), RepositoryError> {
        // 统计字段由 refresh_stats 维护，更新时不覆盖
        sqlx::query(
            r#"
            INSERT INTO novels (id, user_id, title, description, cover, category, status,
                                total_words, total_chapters, created_at, last_updated)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                cover = excluded.cover,
                category = excluded.category,
                status = excluded.status,
                last_updated = MAX(novels.last_updated, excluded.last_updated)
            "#,
        )
        .bind(novel.id.to_string())
        .bind(novel.user_id.to_string())
        .bind(&novel.title)
        .bind(&novel.description)
        .bind(&novel.cover)
        .bind(&novel.category)
        .bind(novel.status.as_str())
        .bind(novel.total_words as i64)
        .bind(novel.total_chapters as i64)
        .bind(fmt_ts(novel.created_at))
        .bind(fmt_ts(novel.last_updated))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<NovelRecord>, RepositoryError> {
        let row: Option<NovelRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_NOVEL))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(NovelRecord::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<NovelRecord>, RepositoryError> {
        let rows: Vec<NovelRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = ? ORDER BY last_updated DESC",
            SELECT_NOVEL
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(NovelRecord::try_from).collect()
    }

    async fn find_all_ids(&self) -> Result<Vec<Uuid>, RepositoryError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM novels")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.iter().map(|(id,)| parse_id(id)).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM chapters WHERE novel_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        sqlx::query("DELETE FROM novels WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn refresh_stats(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<NovelStats>, RepositoryError> {
        // 汇总与写回在同一条语句内完成
        let row: Option<(i64, i64)> = sqlx::query_as(
            r#"
            UPDATE novels SET
                total_words = (SELECT COALESCE(SUM(word_count), 0) FROM chapters WHERE novel_id = novels.id),
                total_chapters = (SELECT COUNT(*) FROM chapters WHERE novel_id = novels.id),
                last_updated = MAX(last_updated, ?)
            WHERE id = ?
            RETURNING total_words, total_chapters
            "#,
        )
        .bind(fmt_ts(at))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(|(total_words, total_chapters)| NovelStats {
            total_words: total_words.max(0) as usize,
            total_chapters: total_chapters.max(0) as usize,
        }))
    }
}
