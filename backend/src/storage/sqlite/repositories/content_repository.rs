use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::calendar::{format_timestamp, parse_stored_timestamp};
use crate::domain::models::content::{Article, ArticleFilter, Tip};
use crate::storage::sqlite::connection::DbConnection;
use crate::storage::traits::ContentStorage;

const ARTICLE_COLUMNS: &str = "id, title, slug, excerpt, content, image_url, category, tags, read_time_min, age_months_min, age_months_max, is_published, published_at";

// An article without any age window matches every age
const ARTICLE_FILTER: &str = r#"
    is_published = 1
    AND (?1 IS NULL OR category = ?1)
    AND (
        ?2 IS NULL
        OR (age_months_min <= ?2 AND age_months_max >= ?2)
        OR (age_months_min IS NULL AND age_months_max IS NULL)
    )
"#;

/// Repository for tips and articles
#[derive(Clone)]
pub struct ContentRepository {
    db: DbConnection,
}

impl ContentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_tip(row: &SqliteRow) -> Result<Tip> {
        let age_months_min: i64 = row.try_get("age_months_min")?;
        let age_months_max: i64 = row.try_get("age_months_max")?;

        Ok(Tip {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            category: row.try_get("category")?,
            icon_name: row.try_get("icon_name")?,
            age_months_min: u32::try_from(age_months_min)?,
            age_months_max: u32::try_from(age_months_max)?,
            is_active: row.try_get("is_active")?,
        })
    }

    fn row_to_article(row: &SqliteRow) -> Result<Article> {
        let slug: String = row.try_get("slug")?;
        let tags: String = row.try_get("tags")?;
        let read_time_min: i64 = row.try_get("read_time_min")?;
        let age_months_min: Option<i64> = row.try_get("age_months_min")?;
        let age_months_max: Option<i64> = row.try_get("age_months_max")?;
        let published_at: Option<String> = row.try_get("published_at")?;

        let tags: Vec<String> = serde_json::from_str(&tags)
            .with_context(|| format!("Corrupt tags for article {}", slug))?;

        Ok(Article {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            excerpt: row.try_get("excerpt")?,
            content: row.try_get("content")?,
            image_url: row.try_get("image_url")?,
            category: row.try_get("category")?,
            tags,
            read_time_min: u32::try_from(read_time_min)?,
            age_months_min: age_months_min.map(u32::try_from).transpose()?,
            age_months_max: age_months_max.map(u32::try_from).transpose()?,
            is_published: row.try_get("is_published")?,
            published_at: published_at.as_deref().map(parse_stored_timestamp).transpose()?,
            slug,
        })
    }
}

#[async_trait]
impl ContentStorage for ContentRepository {
    async fn store_tip(&self, tip: &Tip) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tips (id, title, content, category, icon_name, age_months_min, age_months_max, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tip.id)
        .bind(&tip.title)
        .bind(&tip.content)
        .bind(&tip.category)
        .bind(&tip.icon_name)
        .bind(i64::from(tip.age_months_min))
        .bind(i64::from(tip.age_months_max))
        .bind(tip.is_active)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_tips_for_age(&self, age_months: u32, limit: Option<u32>) -> Result<Vec<Tip>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, category, icon_name, age_months_min, age_months_max, is_active
            FROM tips
            WHERE is_active = 1 AND age_months_min <= ?1 AND age_months_max >= ?1
            ORDER BY rowid ASC
            LIMIT ?2
            "#,
        )
        .bind(i64::from(age_months))
        .bind(limit.map(i64::from).unwrap_or(-1))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_tip).collect()
    }

    async fn count_tips(&self) -> Result<u32> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM tips")
            .fetch_one(self.db.pool())
            .await?
            .try_get("n")?;
        Ok(u32::try_from(count)?)
    }

    async fn store_article(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO articles (id, title, slug, excerpt, content, image_url, category, tags, read_time_min, age_months_min, age_months_max, is_published, published_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.id)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&article.image_url)
        .bind(&article.category)
        .bind(serde_json::to_string(&article.tags)?)
        .bind(i64::from(article.read_time_min))
        .bind(article.age_months_min.map(i64::from))
        .bind(article.age_months_max.map(i64::from))
        .bind(article.is_published)
        .bind(article.published_at.as_ref().map(format_timestamp))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_articles(&self, filter: &ArticleFilter, offset: u32, limit: u32) -> Result<Vec<Article>> {
        let sql = format!(
            "SELECT {} FROM articles WHERE {} ORDER BY published_at DESC, rowid DESC LIMIT ?3 OFFSET ?4",
            ARTICLE_COLUMNS, ARTICLE_FILTER
        );
        let rows = sqlx::query(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.age_months.map(i64::from))
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::row_to_article).collect()
    }

    async fn count_articles(&self, filter: &ArticleFilter) -> Result<u32> {
        let sql = format!("SELECT COUNT(*) AS n FROM articles WHERE {}", ARTICLE_FILTER);
        let count: i64 = sqlx::query(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.age_months.map(i64::from))
            .fetch_one(self.db.pool())
            .await?
            .try_get("n")?;
        Ok(u32::try_from(count)?)
    }

    async fn get_published_article(&self, slug: &str) -> Result<Option<Article>> {
        let sql = format!(
            "SELECT {} FROM articles WHERE slug = ? AND is_published = 1",
            ARTICLE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_article).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(slug: &str, category: &str, window: Option<(u32, u32)>, day: u32, published: bool) -> Article {
        Article {
            id: Article::generate_id(),
            title: slug.to_string(),
            slug: slug.to_string(),
            excerpt: "Excerpt".to_string(),
            content: "Content".to_string(),
            image_url: None,
            category: category.to_string(),
            tags: vec!["sleep".to_string(), "routine".to_string()],
            read_time_min: 4,
            age_months_min: window.map(|w| w.0),
            age_months_max: window.map(|w| w.1),
            is_published: published,
            published_at: Some(Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()),
        }
    }

    async fn seeded_repo() -> ContentRepository {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");
        let repo = ContentRepository::new(db);
        for a in [
            article("newborn-sleep", "sleep", Some((0, 3)), 1, true),
            article("toddler-sleep", "sleep", Some((12, 36)), 2, true),
            article("any-age", "health", None, 3, true),
            article("draft", "sleep", None, 4, false),
        ] {
            repo.store_article(&a).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_article_filters() {
        let repo = seeded_repo().await;

        let all = repo.list_articles(&ArticleFilter::default(), 0, 10).await.unwrap();
        let slugs: Vec<&str> = all.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["any-age", "toddler-sleep", "newborn-sleep"]);
        assert_eq!(all[0].tags, vec!["sleep".to_string(), "routine".to_string()]);

        let filter = ArticleFilter { category: None, age_months: Some(2) };
        let slugs: Vec<String> = repo
            .list_articles(&filter, 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.slug)
            .collect();
        assert_eq!(slugs, vec!["any-age".to_string(), "newborn-sleep".to_string()]);
        assert_eq!(repo.count_articles(&filter).await.unwrap(), 2);

        let filter = ArticleFilter { category: Some("sleep".to_string()), age_months: None };
        assert_eq!(repo.count_articles(&filter).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_article_paging_and_slug_lookup() {
        let repo = seeded_repo().await;

        let second_page = repo.list_articles(&ArticleFilter::default(), 2, 2).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].slug, "newborn-sleep");

        assert!(repo.get_published_article("any-age").await.unwrap().is_some());
        assert!(repo.get_published_article("draft").await.unwrap().is_none());
        assert!(repo.get_published_article("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tips_for_age() {
        let db = DbConnection::init_in_memory().await.unwrap();
        let repo = ContentRepository::new(db);
        for (id, min, max, active) in [("a", 0, 6, true), ("b", 3, 12, true), ("c", 0, 60, false)] {
            repo.store_tip(&Tip {
                id: id.to_string(),
                title: id.to_string(),
                content: "Content".to_string(),
                category: "general".to_string(),
                icon_name: None,
                age_months_min: min,
                age_months_max: max,
                is_active: active,
            })
            .await
            .unwrap();
        }

        let ids = |tips: Vec<Tip>| tips.into_iter().map(|t| t.id).collect::<Vec<_>>();
        assert_eq!(ids(repo.list_tips_for_age(4, None).await.unwrap()), vec!["a", "b"]);
        assert_eq!(ids(repo.list_tips_for_age(4, Some(1)).await.unwrap()), vec!["a"]);
        assert_eq!(ids(repo.list_tips_for_age(6, None).await.unwrap()), vec!["a", "b"]);
        assert!(repo.list_tips_for_age(13, None).await.unwrap().is_empty());
        assert_eq!(repo.count_tips().await.unwrap(), 3);
    }
}
