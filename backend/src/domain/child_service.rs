//! Child profiles: ownership-checked CRUD plus the age arithmetic every
//! other service builds on.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use tracing::{info, warn};

use crate::domain::calendar::{parse_date, LocalCalendar};
use crate::domain::commands::child::{ChildDetail, CreateChildCommand, UpdateChildCommand};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::child::{is_valid_hex_color, Child, DEFAULT_CHILD_COLOR};
use crate::storage::traits::{ChildStorage, GrowthStorage, MilestoneStorage};

const MAX_NAME_LENGTH: usize = 50;
const RECENT_MILESTONES: u32 = 5;

/// Whole calendar months between `date_of_birth` and `today`, ignoring the
/// day of month. Birth dates in the future yield 0.
pub fn age_in_months(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    let months = (today.year() - date_of_birth.year()) * 12 + today.month() as i32
        - date_of_birth.month() as i32;
    months.max(0) as u32
}

/// Load a child only when it belongs to `user_id`. Every child-scoped
/// operation goes through here before touching nested records.
pub async fn find_owned_child(
    children: &dyn ChildStorage,
    user_id: &str,
    child_id: &str,
) -> DomainResult<Child> {
    match children.get_child(user_id, child_id).await? {
        Some(child) => Ok(child),
        None => {
            warn!("Child {} not found for user {}", child_id, user_id);
            Err(DomainError::not_found("Child not found"))
        }
    }
}

/// Service for managing child profiles
#[derive(Clone)]
pub struct ChildService {
    children: Arc<dyn ChildStorage>,
    milestones: Arc<dyn MilestoneStorage>,
    growth: Arc<dyn GrowthStorage>,
    calendar: LocalCalendar,
}

impl ChildService {
    pub fn new(
        children: Arc<dyn ChildStorage>,
        milestones: Arc<dyn MilestoneStorage>,
        growth: Arc<dyn GrowthStorage>,
        calendar: LocalCalendar,
    ) -> Self {
        Self {
            children,
            milestones,
            growth,
            calendar,
        }
    }

    /// Age of `child` as of the local today
    pub fn age_months(&self, child: &Child) -> u32 {
        age_in_months(child.date_of_birth, self.calendar.today())
    }

    pub async fn create_child(&self, user_id: &str, command: CreateChildCommand) -> DomainResult<Child> {
        info!("Creating child for user {}", user_id);

        let name = Self::validate_name(&command.name)?;
        let date_of_birth = self.validate_date_of_birth(&command.date_of_birth)?;
        let color = match command.color {
            Some(color) => Self::validate_color(color)?,
            None => DEFAULT_CHILD_COLOR.to_string(),
        };

        let now = self.calendar.now();
        let child = Child {
            id: Child::generate_id(),
            user_id: user_id.to_string(),
            name,
            date_of_birth,
            gender: command.gender,
            avatar_url: command.avatar_url,
            color,
            created_at: now,
            updated_at: now,
        };

        self.children.store_child(&child).await?;
        info!("Created child {} ({})", child.id, child.name);
        Ok(child)
    }

    pub async fn list_children(&self, user_id: &str) -> DomainResult<Vec<Child>> {
        let children = self.children.list_children(user_id).await?;
        info!("Found {} children for user {}", children.len(), user_id);
        Ok(children)
    }

    pub async fn get_child(&self, user_id: &str, child_id: &str) -> DomainResult<Child> {
        find_owned_child(self.children.as_ref(), user_id, child_id).await
    }

    /// Child plus age, its most recent milestones and latest measurement
    pub async fn get_child_detail(&self, user_id: &str, child_id: &str) -> DomainResult<ChildDetail> {
        let child = self.get_child(user_id, child_id).await?;

        let recent_milestones = self
            .milestones
            .list_milestones(&child.id, Some(RECENT_MILESTONES))
            .await?;
        let latest_growth = self.growth.latest_growth_record(&child.id).await?;

        Ok(ChildDetail {
            age_months: self.age_months(&child),
            child,
            recent_milestones,
            latest_growth,
        })
    }

    pub async fn update_child(
        &self,
        user_id: &str,
        child_id: &str,
        command: UpdateChildCommand,
    ) -> DomainResult<Child> {
        info!("Updating child {}", child_id);
        let mut child = self.get_child(user_id, child_id).await?;

        if let Some(name) = command.name {
            child.name = Self::validate_name(&name)?;
        }
        if let Some(date_of_birth) = command.date_of_birth {
            child.date_of_birth = self.validate_date_of_birth(&date_of_birth)?;
        }
        if let Some(gender) = command.gender {
            child.gender = Some(gender);
        }
        if let Some(avatar_url) = command.avatar_url {
            child.avatar_url = Some(avatar_url);
        }
        if let Some(color) = command.color {
            child.color = Self::validate_color(color)?;
        }
        child.updated_at = self.calendar.now();

        self.children.update_child(&child).await?;
        Ok(child)
    }

    /// Delete a child together with its milestones, growth records and logs
    pub async fn delete_child(&self, user_id: &str, child_id: &str) -> DomainResult<()> {
        info!("Deleting child {}", child_id);

        if !self.children.delete_child(user_id, child_id).await? {
            warn!("Child {} not found for user {}", child_id, user_id);
            return Err(DomainError::not_found("Child not found"));
        }
        Ok(())
    }

    fn validate_name(name: &str) -> DomainResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("Child name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Child name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        Ok(name.to_string())
    }

    fn validate_date_of_birth(&self, value: &str) -> DomainResult<NaiveDate> {
        let date_of_birth = parse_date(value)?;
        if date_of_birth > self.calendar.today() {
            return Err(DomainError::validation("Date of birth cannot be in the future"));
        }
        Ok(date_of_birth)
    }

    fn validate_color(color: String) -> DomainResult<String> {
        if !is_valid_hex_color(&color) {
            return Err(DomainError::validation(format!(
                "Invalid color '{}': expected #RRGGBB",
                color
            )));
        }
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::growth::GrowthRecord;
    use crate::storage::sqlite::{ChildRepository, DbConnection, GrowthRepository, MilestoneRepository};
    use crate::test_utils::{create_user, date, fixed_calendar, test_db};
    use chrono::{TimeZone, Utc};
    use shared::Gender;

    fn service(db: &DbConnection) -> ChildService {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        ChildService::new(
            Arc::new(ChildRepository::new(db.clone())),
            Arc::new(MilestoneRepository::new(db.clone())),
            Arc::new(GrowthRepository::new(db.clone())),
            fixed_calendar(now, 0),
        )
    }

    fn create_command(name: &str, date_of_birth: &str) -> CreateChildCommand {
        CreateChildCommand {
            name: name.to_string(),
            date_of_birth: date_of_birth.to_string(),
            gender: Some(Gender::Female),
            avatar_url: None,
            color: None,
        }
    }

    #[test]
    fn test_age_in_months_ignores_day_of_month() {
        assert_eq!(age_in_months(date(2023, 7, 15), date(2024, 1, 15)), 6);
        assert_eq!(age_in_months(date(2023, 7, 31), date(2024, 1, 1)), 6);
        assert_eq!(age_in_months(date(2024, 1, 1), date(2024, 1, 31)), 0);
        assert_eq!(age_in_months(date(2021, 12, 25), date(2024, 1, 2)), 25);
    }

    #[test]
    fn test_age_in_months_clamps_future_birth_dates() {
        assert_eq!(age_in_months(date(2024, 3, 1), date(2024, 1, 15)), 0);
        assert_eq!(age_in_months(date(2025, 1, 1), date(2024, 1, 15)), 0);
    }

    #[tokio::test]
    async fn test_create_child_applies_defaults_and_trims() {
        let db = test_db().await;
        let user = create_user(&db, "parent@example.com", "token").await;
        let service = service(&db);

        let child = service
            .create_child(&user.id, create_command("  Emma  ", "2023-07-15"))
            .await
            .unwrap();

        assert_eq!(child.name, "Emma");
        assert_eq!(child.color, DEFAULT_CHILD_COLOR);
        assert_eq!(service.age_months(&child), 6);
        assert_eq!(service.get_child(&user.id, &child.id).await.unwrap(), child);
    }

    #[tokio::test]
    async fn test_create_child_validation() {
        let db = test_db().await;
        let user = create_user(&db, "parent@example.com", "token").await;
        let service = service(&db);

        let cases = [
            create_command("   ", "2023-07-15"),
            create_command(&"x".repeat(51), "2023-07-15"),
            create_command("Emma", "2024-01-16"),
            create_command("Emma", "15/07/2023"),
            CreateChildCommand {
                color: Some("purple".to_string()),
                ..create_command("Emma", "2023-07-15")
            },
        ];

        for command in cases {
            let result = service.create_child(&user.id, command).await;
            assert!(matches!(result, Err(DomainError::Validation(_))), "{:?}", result);
        }
    }

    #[tokio::test]
    async fn test_children_are_scoped_to_their_owner() {
        let db = test_db().await;
        let owner = create_user(&db, "owner@example.com", "owner-token").await;
        let other = create_user(&db, "other@example.com", "other-token").await;
        let service = service(&db);

        let child = service
            .create_child(&owner.id, create_command("Emma", "2023-07-15"))
            .await
            .unwrap();

        assert!(service.list_children(&other.id).await.unwrap().is_empty());
        assert!(matches!(
            service.get_child(&other.id, &child.id).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            service
                .update_child(&other.id, &child.id, UpdateChildCommand::default())
                .await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_child(&other.id, &child.id).await,
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(service.list_children(&owner.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_child_changes_only_given_fields() {
        let db = test_db().await;
        let user = create_user(&db, "parent@example.com", "token").await;
        let service = service(&db);
        let child = service
            .create_child(&user.id, create_command("Emma", "2023-07-15"))
            .await
            .unwrap();

        let updated = service
            .update_child(
                &user.id,
                &child.id,
                UpdateChildCommand {
                    color: Some("#10B981".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.color, "#10B981");
        assert_eq!(updated.name, "Emma");
        assert_eq!(updated.gender, Some(Gender::Female));
        assert_eq!(service.get_child(&user.id, &child.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_delete_child_cascades_and_detail_reflects_growth() {
        let db = test_db().await;
        let user = create_user(&db, "parent@example.com", "token").await;
        let service = service(&db);
        let child = service
            .create_child(&user.id, create_command("Emma", "2023-07-15"))
            .await
            .unwrap();

        let growth = GrowthRepository::new(db.clone());
        let recorded_at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        growth
            .store_growth_record(&GrowthRecord {
                id: GrowthRecord::generate_id(),
                child_id: child.id.clone(),
                height_cm: Some(66.0),
                weight_kg: None,
                head_circumference_cm: None,
                recorded_at,
                notes: None,
                created_at: recorded_at,
            })
            .await
            .unwrap();

        let detail = service.get_child_detail(&user.id, &child.id).await.unwrap();
        assert_eq!(detail.age_months, 6);
        assert!(detail.recent_milestones.is_empty());
        assert_eq!(detail.latest_growth.unwrap().height_cm, Some(66.0));

        service.delete_child(&user.id, &child.id).await.unwrap();
        assert!(growth.list_growth_records(&child.id).await.unwrap().is_empty());
        assert!(matches!(
            service.get_child(&user.id, &child.id).await,
            Err(DomainError::NotFound(_))
        ));
    }
}
