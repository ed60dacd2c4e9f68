use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::calendar::{format_timestamp, parse_stored_timestamp};
use crate::domain::models::user::User;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::UserStorage;

const USER_COLUMNS: &str =
    "id, email, name, avatar_url, preferences, api_token, created_at, updated_at";

/// Repository for user accounts
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        let preferences: String = row.try_get("preferences")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            avatar_url: row.try_get("avatar_url")?,
            preferences: serde_json::from_str(&preferences)
                .context("Corrupt stored user preferences")?,
            api_token: row.try_get("api_token")?,
            created_at: parse_stored_timestamp(&created_at)?,
            updated_at: parse_stored_timestamp(&updated_at)?,
        })
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE {} = ?", USER_COLUMNS, column);
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, avatar_url, preferences, api_token, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.avatar_url)
        .bind(serde_json::to_string(&user.preferences)?)
        .bind(&user.api_token)
        .bind(format_timestamp(&user.created_at))
        .bind(format_timestamp(&user.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.fetch_one_by("id", user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_one_by("email", email).await
    }

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        self.fetch_one_by("api_token", token).await
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, avatar_url = ?, preferences = ?, api_token = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.avatar_url)
        .bind(serde_json::to_string(&user.preferences)?)
        .bind(&user.api_token)
        .bind(format_timestamp(&user.updated_at))
        .bind(&user.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }
}
