//! Wire types shared between the LittleSteps backend and its clients.
//!
//! Every struct here is a plain serde DTO. JSON field names are camelCase and
//! enum values are SCREAMING_SNAKE_CASE, which is the contract the mobile
//! client was built against. Timestamps travel as RFC 3339 strings and
//! calendar dates as `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Gender::Male, Gender::Female, Gender::Other]
            .into_iter()
            .find(|gender| gender.as_str() == s)
            .ok_or_else(|| UnknownVariantError::new("gender", s))
    }
}

/// A child profile owned by a single user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// ISO 8601 date (YYYY-MM-DD)
    pub date_of_birth: String,
    pub gender: Option<Gender>,
    pub avatar_url: Option<String>,
    /// `#RRGGBB` hex color used by the client to tint this child's screens
    pub color: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Child profile plus the derived data shown on the child's home screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildDetail {
    #[serde(flatten)]
    pub child: Child,
    pub age_months: u32,
    /// The five most recently achieved milestones, newest first
    pub recent_milestones: Vec<Milestone>,
    pub latest_growth: Option<GrowthRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChildRequest {
    pub name: String,
    pub date_of_birth: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Defaults to `#8B5CF6` when omitted
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChildRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneCategory {
    Physical,
    Cognitive,
    Social,
    Language,
    Emotional,
    SelfCare,
}

impl MilestoneCategory {
    pub const ALL: [MilestoneCategory; 6] = [
        MilestoneCategory::Physical,
        MilestoneCategory::Cognitive,
        MilestoneCategory::Social,
        MilestoneCategory::Language,
        MilestoneCategory::Emotional,
        MilestoneCategory::SelfCare,
    ];

    /// Wire name, also used as the stored column value
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneCategory::Physical => "PHYSICAL",
            MilestoneCategory::Cognitive => "COGNITIVE",
            MilestoneCategory::Social => "SOCIAL",
            MilestoneCategory::Language => "LANGUAGE",
            MilestoneCategory::Emotional => "EMOTIONAL",
            MilestoneCategory::SelfCare => "SELF_CARE",
        }
    }
}

impl fmt::Display for MilestoneCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilestoneCategory {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownVariantError::new("milestone category", s))
    }
}

/// Catalog entry describing an expected developmental event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneTemplate {
    pub id: String,
    pub category: MilestoneCategory,
    pub title: String,
    pub description: String,
    pub age_months_min: u32,
    pub age_months_max: u32,
    pub icon_name: Option<String>,
    /// Position in the curriculum among templates sharing `age_months_min`
    pub order: i64,
}

/// A milestone achieved by a specific child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub child_id: String,
    pub template_id: Option<String>,
    pub category: MilestoneCategory,
    pub title: String,
    pub description: Option<String>,
    pub achieved_at: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    /// Embedded template, present when the milestone was logged from the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<MilestoneTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneRequest {
    #[serde(default)]
    pub template_id: Option<String>,
    pub category: MilestoneCategory,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub achieved_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchieveMilestoneRequest {
    #[serde(default)]
    pub achieved_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneProgress {
    pub achieved: u32,
    pub total: u32,
    pub percentage: u32,
    pub age_months: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<String>,
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthRecord {
    pub id: String,
    pub child_id: String,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub head_circumference_cm: Option<f64>,
    pub recorded_at: String,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGrowthRecordRequest {
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub head_circumference_cm: Option<f64>,
    #[serde(default)]
    pub recorded_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogType {
    Sleep,
    FeedBreast,
    FeedBottle,
    FeedSolid,
    DiaperWet,
    DiaperDirty,
    DiaperMixed,
    Medication,
    Symptom,
    Activity,
}

impl LogType {
    pub const ALL: [LogType; 10] = [
        LogType::Sleep,
        LogType::FeedBreast,
        LogType::FeedBottle,
        LogType::FeedSolid,
        LogType::DiaperWet,
        LogType::DiaperDirty,
        LogType::DiaperMixed,
        LogType::Medication,
        LogType::Symptom,
        LogType::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Sleep => "SLEEP",
            LogType::FeedBreast => "FEED_BREAST",
            LogType::FeedBottle => "FEED_BOTTLE",
            LogType::FeedSolid => "FEED_SOLID",
            LogType::DiaperWet => "DIAPER_WET",
            LogType::DiaperDirty => "DIAPER_DIRTY",
            LogType::DiaperMixed => "DIAPER_MIXED",
            LogType::Medication => "MEDICATION",
            LogType::Symptom => "SYMPTOM",
            LogType::Activity => "ACTIVITY",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogType {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|log_type| log_type.as_str() == s)
            .ok_or_else(|| UnknownVariantError::new("log type", s))
    }
}

/// A timestamped care event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: String,
    pub child_id: String,
    #[serde(rename = "type")]
    pub log_type: LogType,
    /// Type-specific payload, e.g. `{"amountMl": 120}` for a bottle feed
    pub data: serde_json::Value,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyLogRequest {
    #[serde(rename = "type")]
    pub log_type: LogType,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// `?date=` query used by the daily log endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    pub count: u32,
    pub total_minutes: i64,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingSummary {
    pub count: u32,
    pub breast: u32,
    pub bottle: u32,
    pub solid: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaperSummary {
    pub count: u32,
    pub wet: u32,
    pub dirty: u32,
    pub mixed: u32,
}

/// Per-day tallies of sleep, feeding and diaper logs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// The local calendar day summarized (YYYY-MM-DD)
    pub date: String,
    pub sleep: SleepSummary,
    pub feeding: FeedingSummary,
    pub diaper: DiaperSummary,
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub icon_name: Option<String>,
    pub age_months_min: u32,
    pub age_months_max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
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
    pub age_months_min: Option<u32>,
    pub age_months_max: Option<u32>,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListResponse {
    pub articles: Vec<Article>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipQuery {
    pub age_months: u32,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    pub category: Option<String>,
    pub age_months: Option<u32>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementUnit {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub notifications: bool,
    pub theme: Theme,
    pub measurement_unit: MeasurementUnit,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            notifications: true,
            theme: Theme::default(),
            measurement_unit: MeasurementUnit::default(),
        }
    }
}

/// The authenticated account. The API token is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub preferences: UserPreferences,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub preferences: Option<UserPreferences>,
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Raised when a stored or queried string is not a known enum value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariantError {
    kind: &'static str,
    value: String,
}

impl UnknownVariantError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for UnknownVariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariantError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_value(MilestoneCategory::SelfCare).unwrap(),
            json!("SELF_CARE")
        );
        for category in MilestoneCategory::ALL {
            let parsed: MilestoneCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("WALKING".parse::<MilestoneCategory>().is_err());
    }

    #[test]
    fn test_log_type_wire_names_match_serde() {
        for log_type in LogType::ALL {
            let serialized = serde_json::to_value(log_type).unwrap();
            assert_eq!(serialized, json!(log_type.as_str()));
        }
    }

    #[test]
    fn test_create_daily_log_request_uses_type_key() {
        let request: CreateDailyLogRequest = serde_json::from_value(json!({
            "type": "FEED_BOTTLE",
            "data": { "amountMl": 120 },
            "startedAt": "2024-01-15T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(request.log_type, LogType::FeedBottle);
        assert_eq!(request.started_at.as_deref(), Some("2024-01-15T08:00:00Z"));
        assert!(request.ended_at.is_none());
    }

    #[test]
    fn test_child_detail_flattens_child_fields() {
        let detail = ChildDetail {
            child: Child {
                id: "c1".to_string(),
                user_id: "u1".to_string(),
                name: "Emma".to_string(),
                date_of_birth: "2023-06-15".to_string(),
                gender: Some(Gender::Female),
                avatar_url: None,
                color: "#8B5CF6".to_string(),
                created_at: "2024-01-01T00:00:00.000Z".to_string(),
                updated_at: "2024-01-01T00:00:00.000Z".to_string(),
            },
            age_months: 7,
            recent_milestones: vec![],
            latest_growth: None,
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["name"], json!("Emma"));
        assert_eq!(value["dateOfBirth"], json!("2023-06-15"));
        assert_eq!(value["gender"], json!("FEMALE"));
        assert_eq!(value["ageMonths"], json!(7));
        assert_eq!(value["latestGrowth"], json!(null));
    }

    #[test]
    fn test_user_preferences_defaults_fill_missing_fields() {
        let prefs: UserPreferences = serde_json::from_value(json!({ "theme": "DARK" })).unwrap();
        assert!(prefs.notifications);
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(prefs.measurement_unit, MeasurementUnit::Metric);
    }
}
