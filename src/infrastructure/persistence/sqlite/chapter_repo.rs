//! SQLite Chapter Repository
//!
//! (novel_id, order_index) 上有唯一约束，SQLite 逐行校验，
//! 平移时先把窗口内的章节取反暂存为负数，再一次性写回目标位置。
//! 改变排序的事务都以写语句开头，直接拿到写锁，避免读锁升级失败。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use uuid::Uuid;

use super::{db_error, fmt_ts, parse_id, parse_ts, DbPool};
use crate::application::ports::{
    ChapterChanges, ChapterRecord, ChapterRepositoryPort, ChapterSummaryRecord, RepositoryError,
};
use crate::domain::chapter::{ChapterStatus, ShiftWindow};

/// 移动中的章节暂存位置
const PARKED_INDEX: i64 = 0;

/// SQLite Chapter Repository
pub struct SqliteChapterRepository {
    pool: DbPool,
}

impl SqliteChapterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    novel_id: String,
    title: String,
    content: String,
    word_count: i64,
    order_index: i64,
    status: String,
    is_gated: bool,
    publish_time: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: parse_id(&row.id)?,
            novel_id: parse_id(&row.novel_id)?,
            title: row.title,
            content: row.content,
            word_count: row.word_count.max(0) as usize,
            order_index: to_order_index(row.order_index)?,
            status: ChapterStatus::parse(&row.status).unwrap_or_default(),
            is_gated: row.is_gated,
            publish_time: row.publish_time.as_deref().map(parse_ts).transpose()?,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

#[derive(FromRow)]
struct ChapterSummaryRow {
    id: String,
    title: String,
    word_count: i64,
    order_index: i64,
    status: String,
    is_gated: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ChapterSummaryRow> for ChapterSummaryRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterSummaryRow) -> Result<Self, Self::Error> {
        Ok(ChapterSummaryRecord {
            id: parse_id(&row.id)?,
            title: row.title,
            word_count: row.word_count.max(0) as usize,
            order_index: to_order_index(row.order_index)?,
            status: ChapterStatus::parse(&row.status).unwrap_or_default(),
            is_gated: row.is_gated,
            created_at: parse_ts(&row.created_at)?,
            updated_at: parse_ts(&row.updated_at)?,
        })
    }
}

fn to_order_index(value: i64) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .ok()
        .filter(|index| *index >= 1)
        .ok_or_else(|| RepositoryError::SerializationError(format!("Invalid order_index: {}", value)))
}

/// 按窗口平移章节位置（两阶段：取反暂存，再写回）
async fn apply_shift(
    conn: &mut SqliteConnection,
    novel_id: Uuid,
    shift: ShiftWindow,
) -> Result<u64, RepositoryError> {
    let parked = sqlx::query(
        r#"
        UPDATE chapters SET order_index = -order_index
        WHERE novel_id = ? AND order_index >= ? AND (? IS NULL OR order_index <= ?)
        "#,
    )
    .bind(novel_id.to_string())
    .bind(shift.lower as i64)
    .bind(shift.upper.map(i64::from))
    .bind(shift.upper.map(i64::from))
    .execute(&mut *conn)
    .await
    .map_err(db_error)?
    .rows_affected();

    if parked > 0 {
        sqlx::query(
            "UPDATE chapters SET order_index = -order_index + ? WHERE novel_id = ? AND order_index < 0",
        )
        .bind(shift.delta as i64)
        .bind(novel_id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    }

    Ok(parked)
}

const CHAPTER_COLUMNS: &str = "id, novel_id, title, content, word_count, order_index, status, is_gated, publish_time, created_at, updated_at";

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn append(&self, chapter: &ChapterRecord) -> Result<u32, RepositoryError> {
        // 位置在同一条语句内分配
        let (order_index,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO chapters (id, novel_id, title, content, word_count, order_index,
                                  status, is_gated, publish_time, created_at, updated_at)
            SELECT ?, ?, ?, ?, ?, COALESCE(MAX(order_index), 0) + 1, ?, ?, ?, ?, ?
            FROM chapters WHERE novel_id = ?
            RETURNING order_index
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.novel_id.to_string())
        .bind(&chapter.title)
        .bind(&chapter.content)
        .bind(chapter.word_count as i64)
        .bind(chapter.status.as_str())
        .bind(chapter.is_gated)
        .bind(chapter.publish_time.map(fmt_ts))
        .bind(fmt_ts(chapter.created_at))
        .bind(fmt_ts(chapter.updated_at))
        .bind(chapter.novel_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        to_order_index(order_index)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError> {
        let row: Option<ChapterRow> =
            sqlx::query_as(&format!("SELECT {} FROM chapters WHERE id = ?", CHAPTER_COLUMNS))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(ChapterRecord::try_from).transpose()
    }

    async fn find_by_novel_id(
        &self,
        novel_id: Uuid,
    ) -> Result<Vec<ChapterSummaryRecord>, RepositoryError> {
        let rows: Vec<ChapterSummaryRow> = sqlx::query_as(
            r#"
            SELECT id, title, word_count, order_index, status, is_gated, created_at, updated_at
            FROM chapters WHERE novel_id = ? ORDER BY order_index ASC
            "#,
        )
        .bind(novel_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(ChapterSummaryRecord::try_from).collect()
    }

    async fn count_by_novel(&self, novel_id: Uuid) -> Result<u32, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chapters WHERE novel_id = ?")
            .bind(novel_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        u32::try_from(count).map_err(|e| RepositoryError::SerializationError(e.to_string()))
    }

    async fn update(
        &self,
        id: Uuid,
        changes: &ChapterChanges,
        updated_at: DateTime<Utc>,
    ) -> Result<ChapterRecord, RepositoryError> {
        // 未给出的列保留存储中的当前值，不会覆盖并发的自动保存
        let (content, word_count) = match &changes.content {
            Some((content, word_count)) => (Some(content.as_str()), Some(*word_count as i64)),
            None => (None, None),
        };

        let row: Option<ChapterRow> = sqlx::query_as(&format!(
            r#"
            UPDATE chapters SET
                title = COALESCE(?, title),
                content = COALESCE(?, content),
                word_count = COALESCE(?, word_count),
                status = COALESCE(?, status),
                is_gated = COALESCE(?, is_gated),
                publish_time = COALESCE(publish_time, ?),
                updated_at = ?
            WHERE id = ?
            RETURNING {}
            "#,
            CHAPTER_COLUMNS
        ))
        .bind(changes.title.as_deref())
        .bind(content)
        .bind(word_count)
        .bind(changes.status.map(|status| status.as_str()))
        .bind(changes.is_gated)
        .bind(changes.publish_time.map(fmt_ts))
        .bind(fmt_ts(updated_at))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(ChapterRecord::try_from)
            .transpose()?
            .ok_or_else(|| RepositoryError::NotFound(format!("Chapter {}", id)))
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: &str,
        word_count: usize,
        saved_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE chapters SET content = ?, word_count = ?, updated_at = ? WHERE id = ?",
        )
        .bind(content)
        .bind(word_count as i64)
        .bind(fmt_ts(saved_at))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Chapter {}", id)));
        }

        Ok(())
    }

    async fn remove(
        &self,
        id: Uuid,
        novel_id: Uuid,
        order_index: u32,
        shift: ShiftWindow,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let deleted = sqlx::query(
            "DELETE FROM chapters WHERE id = ? AND novel_id = ? AND order_index = ?",
        )
        .bind(id.to_string())
        .bind(novel_id.to_string())
        .bind(order_index as i64)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?
        .rows_affected();

        if deleted != 1 {
            // tx 被 drop 时回滚
            return Err(RepositoryError::Conflict(format!(
                "Chapter {} is no longer at position {}",
                id, order_index
            )));
        }

        apply_shift(&mut *tx, novel_id, shift).await?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }

    async fn move_to(
        &self,
        id: Uuid,
        novel_id: Uuid,
        from: u32,
        to: u32,
        shift: ShiftWindow,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // 先把章节移出原位置，同时校验它仍在 from
        let parked = sqlx::query(
            "UPDATE chapters SET order_index = ? WHERE id = ? AND novel_id = ? AND order_index = ?",
        )
        .bind(PARKED_INDEX)
        .bind(id.to_string())
        .bind(novel_id.to_string())
        .bind(from as i64)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?
        .rows_affected();

        if parked != 1 {
            return Err(RepositoryError::Conflict(format!(
                "Chapter {} is no longer at position {}",
                id, from
            )));
        }

        apply_shift(&mut *tx, novel_id, shift).await?;

        sqlx::query("UPDATE chapters SET order_index = ? WHERE id = ?")
            .bind(to as i64)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chapter::ordering::{plan_removal, plan_reorder, ReorderPlan};
    use crate::test_support::TestContext;

    async fn order_of(ctx: &TestContext, novel_id: Uuid) -> Vec<(Uuid, u32)> {
        ctx.chapters
            .find_by_novel_id(novel_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.id, c.order_index))
            .collect()
    }

    async fn seed(ctx: &TestContext, count: usize) -> (Uuid, Vec<Uuid>) {
        let author = ctx.seed_user("author").await;
        let novel_id = ctx.seed_novel(author).await;
        let mut ids = Vec::new();
        for _ in 0..count {
            ids.push(ctx.seed_chapter(novel_id, "字").await);
        }
        (novel_id, ids)
    }

    #[tokio::test]
    async fn test_append_assigns_next_position() {
        let ctx = TestContext::new().await;
        let (novel_id, ids) = seed(&ctx, 3).await;

        assert_eq!(
            order_of(&ctx, novel_id).await,
            vec![(ids[0], 1), (ids[1], 2), (ids[2], 3)]
        );
        assert_eq!(ctx.chapters.count_by_novel(novel_id).await.unwrap(), 3);

        // 其他小说从 1 开始
        let (other, other_ids) = seed(&ctx, 1).await;
        assert_eq!(order_of(&ctx, other).await, vec![(other_ids[0], 1)]);
    }

    #[tokio::test]
    async fn test_remove_closes_gap() {
        let ctx = TestContext::new().await;
        let (novel_id, ids) = seed(&ctx, 4).await;

        ctx.chapters
            .remove(ids[1], novel_id, 2, plan_removal(2))
            .await
            .unwrap();

        assert_eq!(
            order_of(&ctx, novel_id).await,
            vec![(ids[0], 1), (ids[2], 2), (ids[3], 3)]
        );
    }

    #[tokio::test]
    async fn test_move_to_both_directions() {
        let ctx = TestContext::new().await;
        let (novel_id, ids) = seed(&ctx, 4).await;

        let ReorderPlan::Move { from, to, shift } = plan_reorder(1, 3, 4).unwrap() else {
            panic!("expected move");
        };
        ctx.chapters.move_to(ids[0], novel_id, from, to, shift).await.unwrap();
        assert_eq!(
            order_of(&ctx, novel_id).await,
            vec![(ids[1], 1), (ids[2], 2), (ids[0], 3), (ids[3], 4)]
        );

        let ReorderPlan::Move { from, to, shift } = plan_reorder(4, 1, 4).unwrap() else {
            panic!("expected move");
        };
        ctx.chapters.move_to(ids[3], novel_id, from, to, shift).await.unwrap();
        assert_eq!(
            order_of(&ctx, novel_id).await,
            vec![(ids[3], 1), (ids[1], 2), (ids[2], 3), (ids[0], 4)]
        );
    }

    #[tokio::test]
    async fn test_move_with_stale_position_is_conflict() {
        let ctx = TestContext::new().await;
        let (novel_id, ids) = seed(&ctx, 3).await;
        let before = order_of(&ctx, novel_id).await;

        // ids[0] 实际在 1，调用方以为在 2
        let ReorderPlan::Move { from, to, shift } = plan_reorder(2, 3, 3).unwrap() else {
            panic!("expected move");
        };
        let result = ctx.chapters.move_to(ids[0], novel_id, from, to, shift).await;

        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(order_of(&ctx, novel_id).await, before);

        let result = ctx.chapters.remove(ids[0], novel_id, 3, plan_removal(3)).await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        assert_eq!(order_of(&ctx, novel_id).await, before);
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let ctx = TestContext::new().await;
        let (_, ids) = seed(&ctx, 2).await;

        let changes = ChapterChanges {
            title: Some("新标题".to_string()),
            status: Some(ChapterStatus::Completed),
            publish_time: Some(Utc::now()),
            ..Default::default()
        };
        let updated = ctx.chapters.update(ids[1], &changes, Utc::now()).await.unwrap();
        assert_eq!(updated.title, "新标题");
        assert_eq!(updated.order_index, 2);

        let stored = ctx.chapters.find_by_id(ids[1]).await.unwrap().unwrap();
        assert_eq!(stored.title, "新标题");
        assert_eq!(stored.order_index, 2);
        assert_eq!(stored.status, ChapterStatus::Completed);
        assert!(stored.publish_time.is_some());

        let missing = ctx.chapters.update(Uuid::new_v4(), &changes, Utc::now()).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_only_writes_given_columns() {
        let ctx = TestContext::new().await;
        let (_, ids) = seed(&ctx, 1).await;

        ctx.chapters
            .update_content(ids[0], "新的正文", 4, Utc::now())
            .await
            .unwrap();

        let changes = ChapterChanges {
            is_gated: Some(true),
            ..Default::default()
        };
        let updated = ctx.chapters.update(ids[0], &changes, Utc::now()).await.unwrap();

        assert!(updated.is_gated);
        assert_eq!(updated.content, "新的正文");
        assert_eq!(updated.word_count, 4);
        assert_eq!(updated.title, "章节");
    }

    #[tokio::test]
    async fn test_publish_time_is_never_replaced() {
        let ctx = TestContext::new().await;
        let (_, ids) = seed(&ctx, 1).await;

        let first = Utc::now();
        let changes = ChapterChanges {
            status: Some(ChapterStatus::Completed),
            publish_time: Some(first),
            ..Default::default()
        };
        ctx.chapters.update(ids[0], &changes, first).await.unwrap();

        let later = ChapterChanges {
            publish_time: Some(first + chrono::Duration::hours(1)),
            ..changes
        };
        let updated = ctx.chapters.update(ids[0], &later, Utc::now()).await.unwrap();

        assert_eq!(
            updated.publish_time.map(|t| t.timestamp_micros()),
            Some(first.timestamp_micros())
        );
    }
}
