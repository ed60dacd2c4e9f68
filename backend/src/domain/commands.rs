//! Domain-level command and query types.
//!
//! These structs are used by the services inside the domain layer and are
//! **not** exposed over the public API. The REST layer maps the DTOs from the
//! `shared` crate onto them. Date and timestamp fields stay as the raw client
//! strings here; the services parse them against the local calendar.

pub mod child {
    use shared::Gender;

    use crate::domain::models::child::Child;
    use crate::domain::models::growth::GrowthRecord;
    use crate::domain::models::milestone::Milestone;

    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub name: String,
        pub date_of_birth: String,
        pub gender: Option<Gender>,
        pub avatar_url: Option<String>,
        pub color: Option<String>,
    }

    /// Partial update; `None` leaves the field untouched
    #[derive(Debug, Clone, Default)]
    pub struct UpdateChildCommand {
        pub name: Option<String>,
        pub date_of_birth: Option<String>,
        pub gender: Option<Gender>,
        pub avatar_url: Option<String>,
        pub color: Option<String>,
    }

    /// A child together with its derived home-screen data
    #[derive(Debug, Clone)]
    pub struct ChildDetail {
        pub child: Child,
        pub age_months: u32,
        pub recent_milestones: Vec<Milestone>,
        pub latest_growth: Option<GrowthRecord>,
    }
}

pub mod milestone {
    use shared::MilestoneCategory;

    #[derive(Debug, Clone)]
    pub struct CreateMilestoneCommand {
        pub template_id: Option<String>,
        pub category: MilestoneCategory,
        pub title: String,
        pub description: Option<String>,
        pub achieved_at: Option<String>,
        pub notes: Option<String>,
        pub photo_url: Option<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct AchieveMilestoneCommand {
        pub achieved_at: Option<String>,
        pub notes: Option<String>,
        pub photo_url: Option<String>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ProgressResult {
        pub achieved: u32,
        pub total: u32,
        pub percentage: u32,
        pub age_months: u32,
    }
}

pub mod tracking {
    use chrono::NaiveDate;
    use serde_json::Value;
    use shared::{DiaperSummary, FeedingSummary, LogType, SleepSummary};

    #[derive(Debug, Clone, Default)]
    pub struct CreateGrowthRecordCommand {
        pub height_cm: Option<f64>,
        pub weight_kg: Option<f64>,
        pub head_circumference_cm: Option<f64>,
        pub recorded_at: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateDailyLogCommand {
        pub log_type: LogType,
        /// Untyped payload as sent by the client
        pub data: Option<Value>,
        pub started_at: Option<String>,
        pub ended_at: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct DailySummaryResult {
        pub date: NaiveDate,
        pub sleep: SleepSummary,
        pub feeding: FeedingSummary,
        pub diaper: DiaperSummary,
    }
}

pub mod content {
    use crate::domain::models::content::{Article, ArticleFilter};

    #[derive(Debug, Clone, Default)]
    pub struct ArticleListQuery {
        pub filter: ArticleFilter,
        pub page: Option<u32>,
        pub limit: Option<u32>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Pagination {
        pub page: u32,
        pub limit: u32,
        pub total: u32,
        pub total_pages: u32,
    }

    #[derive(Debug, Clone)]
    pub struct ArticleListResult {
        pub articles: Vec<Article>,
        pub pagination: Pagination,
    }
}

pub mod user {
    use shared::UserPreferences;

    #[derive(Debug, Clone, Default)]
    pub struct UpdateProfileCommand {
        pub name: Option<String>,
        pub avatar_url: Option<String>,
        pub preferences: Option<UserPreferences>,
    }
}
