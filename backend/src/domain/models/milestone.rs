//! Domain models for milestone templates and achieved milestones.
use chrono::{DateTime, Utc};
use shared::MilestoneCategory;
use uuid::Uuid;

/// Catalog entry. `age_months_min <= age_months_max` always holds for
/// persisted templates.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneTemplate {
    pub id: String,
    pub category: MilestoneCategory,
    pub title: String,
    pub description: String,
    pub age_months_min: u32,
    pub age_months_max: u32,
    pub icon_name: Option<String>,
    pub order: i64,
    pub is_active: bool,
}

impl MilestoneTemplate {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Sort key giving the canonical curriculum sequence
    pub fn curriculum_key(&self) -> (u32, i64) {
        (self.age_months_min, self.order)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub id: String,
    pub child_id: String,
    pub template_id: Option<String>,
    pub category: MilestoneCategory,
    pub title: String,
    pub description: Option<String>,
    pub achieved_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Milestone {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn is_achieved(&self) -> bool {
        self.achieved_at.is_some()
    }
}

/// An achieved milestone together with the template it was logged from
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneWithTemplate {
    pub milestone: Milestone,
    pub template: Option<MilestoneTemplate>,
}
