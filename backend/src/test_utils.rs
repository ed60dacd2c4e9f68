//! Fixtures shared by the unit tests: a pinned clock, an in-memory database
//! and helpers that insert a user and a child directly through storage.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Utc};
use mockable::Clock;
use shared::UserPreferences;

use crate::domain::calendar::LocalCalendar;
use crate::domain::models::child::{Child, DEFAULT_CHILD_COLOR};
use crate::domain::models::user::User;
use crate::storage::sqlite::{ChildRepository, DbConnection, UserRepository};
use crate::storage::traits::{ChildStorage, UserStorage};

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    pub utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub fn fixed_calendar(now: DateTime<Utc>, offset_minutes: i32) -> LocalCalendar {
    let offset = FixedOffset::east_opt(offset_minutes * 60).expect("valid test offset");
    LocalCalendar::new(Arc::new(FixtureClock { utc_now: now }), offset)
}

pub async fn test_db() -> DbConnection {
    DbConnection::init_in_memory()
        .await
        .expect("Failed to create test database")
}

pub async fn create_user(db: &DbConnection, email: &str, token: &str) -> User {
    let now = Utc::now();
    let user = User {
        id: User::generate_id(),
        email: email.to_string(),
        name: "Test Parent".to_string(),
        avatar_url: None,
        preferences: UserPreferences::default(),
        api_token: token.to_string(),
        created_at: now,
        updated_at: now,
    };
    UserRepository::new(db.clone())
        .store_user(&user)
        .await
        .expect("Failed to store test user");
    user
}

pub async fn create_child(db: &DbConnection, user_id: &str, date_of_birth: NaiveDate) -> Child {
    let now = Utc::now();
    let child = Child {
        id: Child::generate_id(),
        user_id: user_id.to_string(),
        name: "Emma".to_string(),
        date_of_birth,
        gender: None,
        avatar_url: None,
        color: DEFAULT_CHILD_COLOR.to_string(),
        created_at: now,
        updated_at: now,
    };
    ChildRepository::new(db.clone())
        .store_child(&child)
        .await
        .expect("Failed to store test child");
    child
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}
