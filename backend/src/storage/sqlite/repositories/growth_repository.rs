use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::calendar::{format_timestamp, parse_stored_timestamp};
use crate::domain::models::growth::GrowthRecord;
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::GrowthStorage;

const GROWTH_COLUMNS: &str =
    "id, child_id, height_cm, weight_kg, head_circumference_cm, recorded_at, notes, created_at";

/// Repository for growth measurements
#[derive(Clone)]
pub struct GrowthRepository {
    db: DbConnection,
}

impl GrowthRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_record(row: &SqliteRow) -> Result<GrowthRecord> {
        let recorded_at: String = row.try_get("recorded_at")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(GrowthRecord {
            id: row.try_get("id")?,
            child_id: row.try_get("child_id")?,
            height_cm: row.try_get("height_cm")?,
            weight_kg: row.try_get("weight_kg")?,
            head_circumference_cm: row.try_get("head_circumference_cm")?,
            recorded_at: parse_stored_timestamp(&recorded_at)?,
            notes: row.try_get("notes")?,
            created_at: parse_stored_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl GrowthStorage for GrowthRepository {
    async fn store_growth_record(&self, record: &GrowthRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO growth_records (id, child_id, height_cm, weight_kg, head_circumference_cm, recorded_at, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.child_id)
        .bind(record.height_cm)
        .bind(record.weight_kg)
        .bind(record.head_circumference_cm)
        .bind(format_timestamp(&record.recorded_at))
        .bind(&record.notes)
        .bind(format_timestamp(&record.created_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_growth_records(&self, child_id: &str) -> Result<Vec<GrowthRecord>> {
        let sql = format!(
            "SELECT {} FROM growth_records WHERE child_id = ? ORDER BY recorded_at ASC, created_at ASC",
            GROWTH_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(child_id)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn latest_growth_record(&self, child_id: &str) -> Result<Option<GrowthRecord>> {
        let sql = format!(
            "SELECT {} FROM growth_records WHERE child_id = ? ORDER BY recorded_at DESC, created_at DESC LIMIT 1",
            GROWTH_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(child_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }
}
