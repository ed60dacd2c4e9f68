use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::LogType;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::calendar::{format_timestamp, parse_stored_timestamp};
use crate::domain::models::daily_log::{DailyLog, LogPayload};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::DailyLogStorage;

/// Repository for daily care logs. The typed payload is kept as a JSON
/// document in the `data` column next to its `log_type`.
#[derive(Clone)]
pub struct DailyLogRepository {
    db: DbConnection,
}

impl DailyLogRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_log(row: &SqliteRow) -> Result<DailyLog> {
        let id: String = row.try_get("id")?;
        let log_type: String = row.try_get("log_type")?;
        let data: String = row.try_get("data")?;
        let started_at: Option<String> = row.try_get("started_at")?;
        let ended_at: Option<String> = row.try_get("ended_at")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        let log_type: LogType = log_type.parse()?;
        let data: serde_json::Value = serde_json::from_str(&data)
            .with_context(|| format!("Corrupt data column for daily log {}", id))?;
        let payload = LogPayload::from_parts(log_type, Some(data))
            .with_context(|| format!("Stored payload of daily log {} does not match {}", id, log_type))?;

        Ok(DailyLog {
            id,
            child_id: row.try_get("child_id")?,
            payload,
            started_at: started_at.as_deref().map(parse_stored_timestamp).transpose()?,
            ended_at: ended_at.as_deref().map(parse_stored_timestamp).transpose()?,
            notes: row.try_get("notes")?,
            created_at: parse_stored_timestamp(&created_at)?,
            updated_at: parse_stored_timestamp(&updated_at)?,
        })
    }
}

#[async_trait]
impl DailyLogStorage for DailyLogRepository {
    async fn store_daily_log(&self, log: &DailyLog) -> Result<()> {
        let data = serde_json::to_string(&log.payload.to_value()?)?;

        sqlx::query(
            r#"
            INSERT INTO daily_logs (id, child_id, log_type, data, started_at, ended_at, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.id)
        .bind(&log.child_id)
        .bind(log.log_type().as_str())
        .bind(data)
        .bind(log.started_at.as_ref().map(format_timestamp))
        .bind(log.ended_at.as_ref().map(format_timestamp))
        .bind(&log.notes)
        .bind(format_timestamp(&log.created_at))
        .bind(format_timestamp(&log.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_daily_logs_between(
        &self,
        child_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyLog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, child_id, log_type, data, started_at, ended_at, notes, created_at, updated_at
            FROM daily_logs
            WHERE child_id = ? AND created_at >= ? AND created_at <= ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(child_id)
        .bind(format_timestamp(&start))
        .bind(format_timestamp(&end))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_log).collect()
    }
}
