//! Domain models for parenting tips and articles.
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Tip {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub icon_name: Option<String>,
    pub age_months_min: u32,
    pub age_months_max: u32,
    pub is_active: bool,
}

impl Tip {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Shown when no tip covers the requested age
    pub fn default_tip() -> Self {
        Self {
            id: "default".to_string(),
            title: "Welcome to LittleSteps!".to_string(),
            content: "Every child develops at their own pace. Celebrate the small wins and enjoy this beautiful journey of parenthood!".to_string(),
            category: "general".to_string(),
            icon_name: Some("heart".to_string()),
            age_months_min: 0,
            age_months_max: 60,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub read_time_min: u32,
    /// Articles without an age window apply to every age
    pub age_months_min: Option<u32>,
    pub age_months_max: Option<u32>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Filter for article listings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub age_months: Option<u32>,
}
