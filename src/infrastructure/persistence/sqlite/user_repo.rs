//! SQLite User Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::{db_error, fmt_ts, parse_id, parse_ts, DbPool};
use crate::application::ports::{RepositoryError, UserRecord, UserRepositoryPort};

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: parse_id(&row.id)?,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: parse_ts(&row.created_at)?,
        })
    }
}

const SELECT_USER: &str = "SELECT id, username, email, password_hash, created_at FROM users";

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn insert(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(fmt_ts(user.created_at))
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_USER))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{} WHERE username = ? OR email = ? LIMIT 1", SELECT_USER))
                .bind(login)
                .bind(login)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(UserRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{create_pool, run_migrations, DatabaseConfig};
    use chrono::Utc;

    async fn repo() -> SqliteUserRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteUserRepository::new(pool)
    }

    fn user(username: &str, email: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = repo().await;
        let alice = user("alice", "alice@example.com");
        repo.insert(&alice).await.unwrap();

        let by_id = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        let by_email = repo.find_by_login("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, alice.id);

        assert!(repo.find_by_login("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_reported() {
        let repo = repo().await;
        repo.insert(&user("alice", "alice@example.com")).await.unwrap();

        let result = repo.insert(&user("alice", "other@example.com")).await;
        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
    }
}
