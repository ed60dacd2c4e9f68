//! Domain model for a growth measurement.
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct GrowthRecord {
    pub id: String,
    pub child_id: String,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub head_circumference_cm: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GrowthRecord {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn has_measurement(&self) -> bool {
        self.height_cm.is_some() || self.weight_kg.is_some() || self.head_circumference_cm.is_some()
    }
}
