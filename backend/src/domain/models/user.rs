//! Domain model for a user account.
use chrono::{DateTime, Utc};
use shared::UserPreferences;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub preferences: UserPreferences,
    /// Bearer token accepted for this account
    pub api_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}
