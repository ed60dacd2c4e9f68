//! User accounts: bearer-token lookup, profile edits and the startup
//! provisioning of configured accounts.

use std::sync::Arc;

use shared::UserPreferences;
use tracing::{info, warn};

use crate::config::BootstrapUser;
use crate::domain::calendar::LocalCalendar;
use crate::domain::commands::user::UpdateProfileCommand;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::user::User;
use crate::storage::traits::UserStorage;

const MAX_USER_NAME_LENGTH: usize = 100;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStorage>,
    calendar: LocalCalendar,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStorage>, calendar: LocalCalendar) -> Self {
        Self { users, calendar }
    }

    /// Resolve a bearer token to its account
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        if token.is_empty() {
            return Err(DomainError::unauthorized("Missing bearer token"));
        }
        match self.users.get_user_by_token(token).await? {
            Some(user) => Ok(user),
            None => {
                warn!("Rejected unknown bearer token");
                Err(DomainError::unauthorized("Invalid bearer token"))
            }
        }
    }

    pub async fn get_profile(&self, user_id: &str) -> DomainResult<User> {
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    pub async fn update_profile(&self, user_id: &str, command: UpdateProfileCommand) -> DomainResult<User> {
        let mut user = self.get_profile(user_id).await?;

        if let Some(name) = command.name {
            let name = name.trim();
            if name.is_empty() || name.chars().count() > MAX_USER_NAME_LENGTH {
                return Err(DomainError::validation(format!(
                    "Name must be between 1 and {} characters",
                    MAX_USER_NAME_LENGTH
                )));
            }
            user.name = name.to_string();
        }
        if let Some(avatar_url) = command.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(preferences) = command.preferences {
            user.preferences = preferences;
        }
        user.updated_at = self.calendar.now();

        self.users.update_user(&user).await?;
        info!("Updated profile of user {}", user.id);
        Ok(user)
    }

    /// Create or refresh the configured accounts, matched by email. An
    /// existing account keeps its id, name and preferences; only its token
    /// is replaced.
    pub async fn bootstrap_users(&self, accounts: &[BootstrapUser]) -> DomainResult<()> {
        for account in accounts {
            let email = account.email.trim();
            match self.users.get_user_by_email(email).await? {
                Some(mut user) => {
                    if user.api_token != account.token {
                        user.api_token = account.token.clone();
                        user.updated_at = self.calendar.now();
                        self.users.update_user(&user).await?;
                        info!("Rotated API token of {}", email);
                    }
                }
                None => {
                    let now = self.calendar.now();
                    let user = User {
                        id: User::generate_id(),
                        email: email.to_string(),
                        name: account.name.clone(),
                        avatar_url: None,
                        preferences: UserPreferences::default(),
                        api_token: account.token.clone(),
                        created_at: now,
                        updated_at: now,
                    };
                    self.users.store_user(&user).await?;
                    info!("Provisioned user {}", email);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::UserRepository;
    use crate::test_utils::{fixed_calendar, test_db};
    use chrono::{TimeZone, Utc};
    use shared::Theme;

    async fn service() -> UserService {
        let db = test_db().await;
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        UserService::new(Arc::new(UserRepository::new(db)), fixed_calendar(now, 0))
    }

    fn account(email: &str, token: &str) -> BootstrapUser {
        BootstrapUser {
            email: email.to_string(),
            name: "Parent".to_string(),
            token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn test_bootstrap_and_authenticate() {
        let service = service().await;
        service.bootstrap_users(&[account("parent@example.com", "secret")]).await.unwrap();

        let user = service.authenticate("secret").await.unwrap();
        assert_eq!(user.email, "parent@example.com");
        assert!(matches!(service.authenticate("wrong").await, Err(DomainError::Unauthorized(_))));
        assert!(matches!(service.authenticate("").await, Err(DomainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_bootstrap_rotates_token_and_keeps_identity() {
        let service = service().await;
        service.bootstrap_users(&[account("parent@example.com", "old")]).await.unwrap();
        let original = service.authenticate("old").await.unwrap();

        service.bootstrap_users(&[account("parent@example.com", "new")]).await.unwrap();

        assert!(service.authenticate("old").await.is_err());
        let rotated = service.authenticate("new").await.unwrap();
        assert_eq!(rotated.id, original.id);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let service = service().await;
        service.bootstrap_users(&[account("parent@example.com", "secret")]).await.unwrap();
        let user = service.authenticate("secret").await.unwrap();

        let updated = service
            .update_profile(
                &user.id,
                UpdateProfileCommand {
                    name: Some(" Sam ".to_string()),
                    avatar_url: None,
                    preferences: Some(UserPreferences {
                        notifications: false,
                        theme: Theme::Dark,
                        ..Default::default()
                    }),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Sam");
        assert_eq!(updated.preferences.theme, Theme::Dark);
        assert_eq!(service.get_profile(&user.id).await.unwrap(), updated);

        let result = service
            .update_profile(&user.id, UpdateProfileCommand { name: Some("".to_string()), ..Default::default() })
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
