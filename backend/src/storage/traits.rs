//! # Storage Traits
//!
//! Storage abstractions the domain services depend on. The SQLite
//! repositories implement them; services only ever see `Arc<dyn ...>`.
//!
//! Ownership scoping happens here: child lookups always take the owning user
//! id, and nested records are reached through a child the caller owns.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::MilestoneCategory;

use crate::domain::models::child::Child;
use crate::domain::models::content::{Article, ArticleFilter, Tip};
use crate::domain::models::daily_log::DailyLog;
use crate::domain::models::growth::GrowthRecord;
use crate::domain::models::milestone::{Milestone, MilestoneTemplate};
use crate::domain::models::user::User;

#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_user_by_token(&self, token: &str) -> Result<Option<User>>;

    /// Overwrite the mutable profile fields and token of an existing user
    async fn update_user(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait ChildStorage: Send + Sync {
    async fn store_child(&self, child: &Child) -> Result<()>;

    /// Retrieve a child only if it belongs to `user_id`
    async fn get_child(&self, user_id: &str, child_id: &str) -> Result<Option<Child>>;

    /// List a user's children ordered by creation time
    async fn list_children(&self, user_id: &str) -> Result<Vec<Child>>;

    async fn update_child(&self, child: &Child) -> Result<()>;

    /// Delete a child and every record it owns.
    /// Returns false when nothing matched.
    async fn delete_child(&self, user_id: &str, child_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait MilestoneStorage: Send + Sync {
    async fn store_milestone(&self, milestone: &Milestone) -> Result<()>;

    async fn get_milestone(&self, milestone_id: &str) -> Result<Option<Milestone>>;

    /// Milestones of a child, most recently achieved first
    async fn list_milestones(&self, child_id: &str, limit: Option<u32>) -> Result<Vec<Milestone>>;

    /// Persist `achieved_at`, `notes`, `photo_url` and `updated_at`
    async fn update_achievement(&self, milestone: &Milestone) -> Result<()>;

    async fn count_achieved(&self, child_id: &str) -> Result<u32>;

    /// Template ids referenced by the child's milestones
    async fn achieved_template_ids(&self, child_id: &str) -> Result<Vec<String>>;
}

#[async_trait]
pub trait TemplateStorage: Send + Sync {
    async fn store_template(&self, template: &MilestoneTemplate) -> Result<()>;

    async fn get_template(&self, template_id: &str) -> Result<Option<MilestoneTemplate>>;

    /// Active templates in curriculum order `(age_months_min, order)`
    async fn list_active_templates(
        &self,
        category: Option<MilestoneCategory>,
    ) -> Result<Vec<MilestoneTemplate>>;

    async fn count_templates(&self) -> Result<u32>;
}

#[async_trait]
pub trait GrowthStorage: Send + Sync {
    async fn store_growth_record(&self, record: &GrowthRecord) -> Result<()>;

    /// All records of a child, oldest measurement first
    async fn list_growth_records(&self, child_id: &str) -> Result<Vec<GrowthRecord>>;

    async fn latest_growth_record(&self, child_id: &str) -> Result<Option<GrowthRecord>>;
}

#[async_trait]
pub trait DailyLogStorage: Send + Sync {
    async fn store_daily_log(&self, log: &DailyLog) -> Result<()>;

    /// Logs whose `created_at` lies within `[start, end]`, newest first
    async fn list_daily_logs_between(
        &self,
        child_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DailyLog>>;
}

#[async_trait]
pub trait ContentStorage: Send + Sync {
    async fn store_tip(&self, tip: &Tip) -> Result<()>;

    /// Active tips whose age window contains `age_months`
    async fn list_tips_for_age(&self, age_months: u32, limit: Option<u32>) -> Result<Vec<Tip>>;

    async fn count_tips(&self) -> Result<u32>;

    async fn store_article(&self, article: &Article) -> Result<()>;

    /// Published articles matching `filter`, newest publication first
    async fn list_articles(&self, filter: &ArticleFilter, offset: u32, limit: u32) -> Result<Vec<Article>>;

    async fn count_articles(&self, filter: &ArticleFilter) -> Result<u32>;

    async fn get_published_article(&self, slug: &str) -> Result<Option<Article>>;
}
