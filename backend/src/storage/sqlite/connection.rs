use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

const IN_MEMORY_URL: &str = "sqlite::memory:";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        avatar_url TEXT,
        preferences TEXT NOT NULL,
        api_token TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS children (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        date_of_birth TEXT NOT NULL,
        gender TEXT,
        avatar_url TEXT,
        color TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_children_user ON children(user_id, created_at);",
    r#"
    CREATE TABLE IF NOT EXISTS milestone_templates (
        id TEXT PRIMARY KEY,
        category TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        age_months_min INTEGER NOT NULL,
        age_months_max INTEGER NOT NULL,
        icon_name TEXT,
        sort_order INTEGER NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        CHECK (age_months_min <= age_months_max)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS milestones (
        id TEXT PRIMARY KEY,
        child_id TEXT NOT NULL,
        template_id TEXT,
        category TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        achieved_at TEXT,
        notes TEXT,
        photo_url TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE,
        FOREIGN KEY (template_id) REFERENCES milestone_templates (id)
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_milestones_child ON milestones(child_id, achieved_at DESC);",
    r#"
    CREATE TABLE IF NOT EXISTS growth_records (
        id TEXT PRIMARY KEY,
        child_id TEXT NOT NULL,
        height_cm REAL,
        weight_kg REAL,
        head_circumference_cm REAL,
        recorded_at TEXT NOT NULL,
        notes TEXT,
        created_at TEXT NOT NULL,
        FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_growth_child ON growth_records(child_id, recorded_at);",
    r#"
    CREATE TABLE IF NOT EXISTS daily_logs (
        id TEXT PRIMARY KEY,
        child_id TEXT NOT NULL,
        log_type TEXT NOT NULL,
        data TEXT NOT NULL,
        started_at TEXT,
        ended_at TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (child_id) REFERENCES children (id) ON DELETE CASCADE
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_daily_logs_child_created ON daily_logs(child_id, created_at DESC);",
    r#"
    CREATE TABLE IF NOT EXISTS tips (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        category TEXT NOT NULL,
        icon_name TEXT,
        age_months_min INTEGER NOT NULL,
        age_months_max INTEGER NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        excerpt TEXT NOT NULL,
        content TEXT NOT NULL,
        image_url TEXT,
        category TEXT NOT NULL,
        tags TEXT NOT NULL,
        read_time_min INTEGER NOT NULL,
        age_months_min INTEGER,
        age_months_max INTEGER,
        is_published INTEGER NOT NULL DEFAULT 1,
        published_at TEXT
    );
    "#,
];

/// DbConnection owns the SQLite pool shared by every repository
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Connect to `url`, creating the database file if needed, and make sure
    /// the schema exists
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database sees its own database,
        // so those pools are pinned to one long-lived connection.
        let pool_options = if url == IN_MEMORY_URL {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Fresh private in-memory database, used by tests and throwaway runs
    pub async fn init_in_memory() -> Result<Self> {
        Self::new(IN_MEMORY_URL, 1).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query, used by the health endpoint
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = DbConnection::init_in_memory().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let tables: Vec<String> = rows.iter().map(|row| row.get("name")).collect();

        for expected in [
            "articles",
            "children",
            "daily_logs",
            "growth_records",
            "milestone_templates",
            "milestones",
            "tips",
            "users",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_setup_schema_is_idempotent() {
        let db = DbConnection::init_in_memory().await.unwrap();
        DbConnection::setup_schema(db.pool()).await.expect("second schema run should succeed");
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_isolated() {
        let first = DbConnection::init_in_memory().await.unwrap();
        let second = DbConnection::init_in_memory().await.unwrap();

        sqlx::query("INSERT INTO tips (id, title, content, category, age_months_min, age_months_max) VALUES ('t', 'T', 'C', 'general', 0, 1)")
            .execute(first.pool())
            .await
            .unwrap();

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM tips")
            .fetch_one(second.pool())
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 0);
    }
}
