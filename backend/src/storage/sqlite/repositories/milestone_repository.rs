use anyhow::Result;
use async_trait::async_trait;
use shared::MilestoneCategory;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::calendar::{format_timestamp, parse_stored_timestamp};
use crate::domain::models::milestone::{Milestone, MilestoneTemplate};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::{MilestoneStorage, TemplateStorage};

const MILESTONE_COLUMNS: &str = "id, child_id, template_id, category, title, description, achieved_at, notes, photo_url, created_at, updated_at";

const TEMPLATE_COLUMNS: &str =
    "id, category, title, description, age_months_min, age_months_max, icon_name, sort_order, is_active";

/// Repository for achieved milestones and the milestone template catalog
#[derive(Clone)]
pub struct MilestoneRepository {
    db: DbConnection,
}

impl MilestoneRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_milestone(row: &SqliteRow) -> Result<Milestone> {
        let category: String = row.try_get("category")?;
        let achieved_at: Option<String> = row.try_get("achieved_at")?;
        let created_at: String = row.try_get("created_at")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(Milestone {
            id: row.try_get("id")?,
            child_id: row.try_get("child_id")?,
            template_id: row.try_get("template_id")?,
            category: category.parse()?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            achieved_at: achieved_at.as_deref().map(parse_stored_timestamp).transpose()?,
            notes: row.try_get("notes")?,
            photo_url: row.try_get("photo_url")?,
            created_at: parse_stored_timestamp(&created_at)?,
            updated_at: parse_stored_timestamp(&updated_at)?,
        })
    }

    fn row_to_template(row: &SqliteRow) -> Result<MilestoneTemplate> {
        let category: String = row.try_get("category")?;
        let age_months_min: i64 = row.try_get("age_months_min")?;
        let age_months_max: i64 = row.try_get("age_months_max")?;

        Ok(MilestoneTemplate {
            id: row.try_get("id")?,
            category: category.parse()?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            age_months_min: u32::try_from(age_months_min)?,
            age_months_max: u32::try_from(age_months_max)?,
            icon_name: row.try_get("icon_name")?,
            order: row.try_get("sort_order")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

#[async_trait]
impl MilestoneStorage for MilestoneRepository {
    async fn store_milestone(&self, milestone: &Milestone) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO milestones (id, child_id, template_id, category, title, description, achieved_at, notes, photo_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&milestone.id)
        .bind(&milestone.child_id)
        .bind(&milestone.template_id)
        .bind(milestone.category.as_str())
        .bind(&milestone.title)
        .bind(&milestone.description)
        .bind(milestone.achieved_at.as_ref().map(format_timestamp))
        .bind(&milestone.notes)
        .bind(&milestone.photo_url)
        .bind(format_timestamp(&milestone.created_at))
        .bind(format_timestamp(&milestone.updated_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_milestone(&self, milestone_id: &str) -> Result<Option<Milestone>> {
        let sql = format!("SELECT {} FROM milestones WHERE id = ?", MILESTONE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(milestone_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_milestone).transpose()
    }

    async fn list_milestones(&self, child_id: &str, limit: Option<u32>) -> Result<Vec<Milestone>> {
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(i64::from).unwrap_or(-1);
        let sql = format!(
            "SELECT {} FROM milestones WHERE child_id = ? ORDER BY achieved_at DESC, created_at DESC LIMIT ?",
            MILESTONE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(child_id)
            .bind(limit)
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::row_to_milestone).collect()
    }

    async fn update_achievement(&self, milestone: &Milestone) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE milestones
            SET achieved_at = ?, notes = ?, photo_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(milestone.achieved_at.as_ref().map(format_timestamp))
        .bind(&milestone.notes)
        .bind(&milestone.photo_url)
        .bind(format_timestamp(&milestone.updated_at))
        .bind(&milestone.id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn count_achieved(&self, child_id: &str) -> Result<u32> {
        let count: i64 = sqlx::query(
            "SELECT COUNT(*) AS n FROM milestones WHERE child_id = ? AND achieved_at IS NOT NULL",
        )
        .bind(child_id)
        .fetch_one(self.db.pool())
        .await?
        .try_get("n")?;
        Ok(u32::try_from(count)?)
    }

    async fn achieved_template_ids(&self, child_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT template_id FROM milestones WHERE child_id = ? AND template_id IS NOT NULL",
        )
        .bind(child_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| row.try_get("template_id").map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl TemplateStorage for MilestoneRepository {
    async fn store_template(&self, template: &MilestoneTemplate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO milestone_templates (id, category, title, description, age_months_min, age_months_max, icon_name, sort_order, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&template.id)
        .bind(template.category.as_str())
        .bind(&template.title)
        .bind(&template.description)
        .bind(i64::from(template.age_months_min))
        .bind(i64::from(template.age_months_max))
        .bind(&template.icon_name)
        .bind(template.order)
        .bind(template.is_active)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_template(&self, template_id: &str) -> Result<Option<MilestoneTemplate>> {
        let sql = format!("SELECT {} FROM milestone_templates WHERE id = ?", TEMPLATE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(template_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_template).transpose()
    }

    async fn list_active_templates(
        &self,
        category: Option<MilestoneCategory>,
    ) -> Result<Vec<MilestoneTemplate>> {
        let sql = format!(
            r#"
            SELECT {} FROM milestone_templates
            WHERE is_active = 1 AND (?1 IS NULL OR category = ?1)
            ORDER BY age_months_min ASC, sort_order ASC, id ASC
            "#,
            TEMPLATE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(category.map(|c| c.as_str()))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::row_to_template).collect()
    }

    async fn count_templates(&self) -> Result<u32> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM milestone_templates")
            .fetch_one(self.db.pool())
            .await?
            .try_get("n")?;
        Ok(u32::try_from(count)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn template(id: &str, category: MilestoneCategory, min: u32, order: i64) -> MilestoneTemplate {
        MilestoneTemplate {
            id: id.to_string(),
            category,
            title: format!("Template {}", id),
            description: "Description".to_string(),
            age_months_min: min,
            age_months_max: min + 3,
            icon_name: None,
            order,
            is_active: true,
        }
    }

    async fn setup_test() -> (DbConnection, MilestoneRepository) {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");
        sqlx::query(
            "INSERT INTO users (id, email, name, preferences, api_token, created_at, updated_at) VALUES ('u1', 'a@b.c', 'A', '{}', 't', '2024-01-01T00:00:00.000Z', '2024-01-01T00:00:00.000Z')",
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO children (id, user_id, name, date_of_birth, color, created_at, updated_at) VALUES ('c1', 'u1', 'Emma', '2023-06-15', '#8B5CF6', '2024-01-01T00:00:00.000Z', '2024-01-01T00:00:00.000Z')",
        )
        .execute(db.pool())
        .await
        .unwrap();
        let repo = MilestoneRepository::new(db.clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_templates_listed_in_curriculum_order() {
        let (_db, repo) = setup_test().await;

        repo.store_template(&template("c", MilestoneCategory::Social, 4, 0)).await.unwrap();
        repo.store_template(&template("b", MilestoneCategory::Physical, 2, 1)).await.unwrap();
        repo.store_template(&template("a", MilestoneCategory::Physical, 2, 0)).await.unwrap();
        let mut inactive = template("z", MilestoneCategory::Physical, 0, 0);
        inactive.is_active = false;
        repo.store_template(&inactive).await.unwrap();

        let all = repo.list_active_templates(None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let physical = repo.list_active_templates(Some(MilestoneCategory::Physical)).await.unwrap();
        assert_eq!(physical.len(), 2);
        assert_eq!(repo.count_templates().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_milestones_newest_achievement_first() {
        let (_db, repo) = setup_test().await;
        repo.store_template(&template("t1", MilestoneCategory::Physical, 0, 0)).await.unwrap();

        let base = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        for (id, day, template_id) in [("m1", 1, Some("t1")), ("m2", 3, None), ("m3", 2, None)] {
            let achieved = base + chrono::Duration::days(day);
            repo.store_milestone(&Milestone {
                id: id.to_string(),
                child_id: "c1".to_string(),
                template_id: template_id.map(str::to_string),
                category: MilestoneCategory::Physical,
                title: id.to_string(),
                description: None,
                achieved_at: Some(achieved),
                notes: None,
                photo_url: None,
                created_at: achieved,
                updated_at: achieved,
            })
            .await
            .unwrap();
        }

        let listed = repo.list_milestones("c1", None).await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m3", "m1"]);

        let limited = repo.list_milestones("c1", Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);

        assert_eq!(repo.count_achieved("c1").await.unwrap(), 3);
        assert_eq!(repo.achieved_template_ids("c1").await.unwrap(), vec!["t1".to_string()]);
    }

    #[tokio::test]
    async fn test_update_achievement_persists_fields() {
        let (_db, repo) = setup_test().await;
        let created = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let mut milestone = Milestone {
            id: "m1".to_string(),
            child_id: "c1".to_string(),
            template_id: None,
            category: MilestoneCategory::Language,
            title: "First word".to_string(),
            description: None,
            achieved_at: None,
            notes: None,
            photo_url: None,
            created_at: created,
            updated_at: created,
        };
        repo.store_milestone(&milestone).await.unwrap();
        assert_eq!(repo.count_achieved("c1").await.unwrap(), 0);

        milestone.achieved_at = Some(created + chrono::Duration::hours(1));
        milestone.notes = Some("Said mama".to_string());
        milestone.updated_at = created + chrono::Duration::hours(2);
        repo.update_achievement(&milestone).await.unwrap();

        let stored = repo.get_milestone("m1").await.unwrap().unwrap();
        assert_eq!(stored, milestone);
        assert_eq!(repo.count_achieved("c1").await.unwrap(), 1);
    }
}
