use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use shared::Gender;

use crate::domain::calendar::{format_date, format_timestamp, parse_stored_date, parse_stored_timestamp};
use crate::domain::models::child::Child;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::ChildStorage;

/// Repository for child profiles
#[derive(Clone)]
pub struct ChildRepository {
    db: DbConnection,
}

impl ChildRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_child(row: &SqliteRow) -> Result<Child> {
        let date_of_birth: String = row.try_get("date_of_birth")?;
        let gender: Option<String> = row.try_get("gender")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let gender = gender.map(|g| g.parse::<Gender>()).transpose()?;

        Ok(Child {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            date_of_birth: parse_stored_date(&date_of_birth)?,
            gender,
            avatar_url: row.try_get("avatar_url")?,
            color: row.try_get("color")?,
            created_at: parse_stored_timestamp(&created_at)?,
            updated_at: parse_stored_timestamp(&updated_at)?,
        })
    }

    fn gender_column(child: &Child) -> Option<&'static str> {
        child.gender.as_ref().map(Gender::as_str)
    }
}

#[async_trait]
impl ChildStorage for ChildRepository {
    async fn store_child(&self, child: &Child) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO children (id, user_id, name, date_of_birth, gender, avatar_url, color, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&child.id)
        .bind(&child.user_id)
        .bind(&child.name)
        .bind(format_date(child.date_of_birth))
        .bind(Self::gender_column(child))
        .bind(&child.avatar_url)
        .bind(&child.color)
        .bind(format_timestamp(&child.created_at))
        .bind(format_timestamp(&child.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_child(&self, user_id: &str, child_id: &str) -> Result<Option<Child>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, date_of_birth, gender, avatar_url, color, created_at, updated_at
            FROM children
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(child_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_child).transpose()
    }

    async fn list_children(&self, user_id: &str) -> Result<Vec<Child>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, name, date_of_birth, gender, avatar_url, color, created_at, updated_at
            FROM children
            WHERE user_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_child).collect()
    }

    async fn update_child(&self, child: &Child) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE children
            SET name = ?, date_of_birth = ?, gender = ?, avatar_url = ?, color = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&child.name)
        .bind(format_date(child.date_of_birth))
        .bind(Self::gender_column(child))
        .bind(&child.avatar_url)
        .bind(&child.color)
        .bind(format_timestamp(&child.updated_at))
        .bind(&child.id)
        .bind(&child.user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn delete_child(&self, user_id: &str, child_id: &str) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        let owned = sqlx::query("SELECT 1 FROM children WHERE id = ? AND user_id = ?")
            .bind(child_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .is_some();

        if !owned {
            tx.rollback().await?;
            return Ok(false);
        }

        for table in ["milestones", "growth_records", "daily_logs"] {
            let sql = format!("DELETE FROM {} WHERE child_id = ?", table);
            sqlx::query(&sql).bind(child_id).execute(&mut *tx).await?;
        }

        sqlx::query("DELETE FROM children WHERE id = ?")
            .bind(child_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
