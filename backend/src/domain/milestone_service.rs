//! Milestone tracking: recording achievements, matching catalog templates to
//! a child's age window and computing progress through the curriculum.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use shared::MilestoneCategory;
use tracing::{info, warn};

use crate::domain::calendar::LocalCalendar;
use crate::domain::child_service::{age_in_months, find_owned_child};
use crate::domain::commands::milestone::{AchieveMilestoneCommand, CreateMilestoneCommand, ProgressResult};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::models::child::Child;
use crate::domain::models::milestone::{Milestone, MilestoneTemplate, MilestoneWithTemplate};
use crate::storage::traits::{ChildStorage, MilestoneStorage, TemplateStorage};

/// Months past the current age still shown as "coming soon"
pub const UPCOMING_LOOKAHEAD_MONTHS: u32 = 3;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_DESCRIPTION_LENGTH: usize = 500;
const MAX_NOTES_LENGTH: usize = 1000;

/// Templates whose window overlaps `[age, age + lookahead]` and that the
/// child has not achieved yet, in curriculum order
pub fn select_upcoming(
    templates: &[MilestoneTemplate],
    achieved_template_ids: &HashSet<String>,
    age_months: u32,
) -> Vec<MilestoneTemplate> {
    let horizon = age_months + UPCOMING_LOOKAHEAD_MONTHS;
    let mut upcoming: Vec<MilestoneTemplate> = templates
        .iter()
        .filter(|t| t.is_active)
        .filter(|t| t.age_months_min <= horizon && t.age_months_max >= age_months)
        .filter(|t| !achieved_template_ids.contains(&t.id))
        .cloned()
        .collect();

    upcoming.sort_by_key(MilestoneTemplate::curriculum_key);
    upcoming
}

/// `total` counts every active template that has opened by `age_months`,
/// including ones whose window already closed, and never drops below
/// `achieved`
pub fn compute_progress(templates: &[MilestoneTemplate], achieved: u32, age_months: u32) -> ProgressResult {
    let opened = templates
        .iter()
        .filter(|t| t.is_active && t.age_months_min <= age_months)
        .count() as u32;
    let total = opened.max(achieved);

    let percentage = if total > 0 {
        (f64::from(achieved) / f64::from(total) * 100.0).round() as u32
    } else {
        0
    };

    ProgressResult {
        achieved,
        total,
        percentage,
        age_months,
    }
}

/// Service for achieved milestones and the template catalog
#[derive(Clone)]
pub struct MilestoneService {
    children: Arc<dyn ChildStorage>,
    milestones: Arc<dyn MilestoneStorage>,
    templates: Arc<dyn TemplateStorage>,
    calendar: LocalCalendar,
}

impl MilestoneService {
    pub fn new(
        children: Arc<dyn ChildStorage>,
        milestones: Arc<dyn MilestoneStorage>,
        templates: Arc<dyn TemplateStorage>,
        calendar: LocalCalendar,
    ) -> Self {
        Self {
            children,
            milestones,
            templates,
            calendar,
        }
    }

    fn age_months(&self, child: &Child) -> u32 {
        age_in_months(child.date_of_birth, self.calendar.today())
    }

    pub async fn create_milestone(
        &self,
        user_id: &str,
        child_id: &str,
        command: CreateMilestoneCommand,
    ) -> DomainResult<MilestoneWithTemplate> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;
        info!("Recording milestone '{}' for child {}", command.title, child.id);

        let title = command.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::validation("Milestone title cannot be empty"));
        }
        check_length("title", &title, MAX_TITLE_LENGTH)?;
        if let Some(description) = &command.description {
            check_length("description", description, MAX_DESCRIPTION_LENGTH)?;
        }
        if let Some(notes) = &command.notes {
            check_length("notes", notes, MAX_NOTES_LENGTH)?;
        }

        let template = match &command.template_id {
            Some(template_id) => Some(self.templates.get_template(template_id).await?.ok_or_else(|| {
                DomainError::validation(format!("Unknown milestone template: {}", template_id))
            })?),
            None => None,
        };

        let achieved_at = match &command.achieved_at {
            Some(value) => self.calendar.parse_past_timestamp(value, "achievedAt")?,
            None => self.calendar.now(),
        };

        let now = self.calendar.now();
        let milestone = Milestone {
            id: Milestone::generate_id(),
            child_id: child.id,
            template_id: command.template_id,
            category: command.category,
            title,
            description: command.description,
            achieved_at: Some(achieved_at),
            notes: command.notes,
            photo_url: command.photo_url,
            created_at: now,
            updated_at: now,
        };

        self.milestones.store_milestone(&milestone).await?;
        Ok(MilestoneWithTemplate { milestone, template })
    }

    /// A child's milestones, most recently achieved first, each with its
    /// template when it came from the catalog
    pub async fn list_milestones(&self, user_id: &str, child_id: &str) -> DomainResult<Vec<MilestoneWithTemplate>> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;
        let milestones = self.milestones.list_milestones(&child.id, None).await?;

        let mut templates: HashMap<String, Option<MilestoneTemplate>> = HashMap::new();
        let mut listed = Vec::with_capacity(milestones.len());
        for milestone in milestones {
            let template = match &milestone.template_id {
                Some(template_id) => {
                    if !templates.contains_key(template_id) {
                        let fetched = self.templates.get_template(template_id).await?;
                        templates.insert(template_id.clone(), fetched);
                    }
                    templates.get(template_id).cloned().flatten()
                }
                None => None,
            };
            listed.push(MilestoneWithTemplate { milestone, template });
        }

        Ok(listed)
    }

    pub async fn upcoming_milestones(&self, user_id: &str, child_id: &str) -> DomainResult<Vec<MilestoneTemplate>> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;
        let age_months = self.age_months(&child);

        let templates = self.templates.list_active_templates(None).await?;
        let achieved: HashSet<String> = self
            .milestones
            .achieved_template_ids(&child.id)
            .await?
            .into_iter()
            .collect();

        let upcoming = select_upcoming(&templates, &achieved, age_months);
        info!(
            "{} upcoming milestones for child {} at {} months",
            upcoming.len(),
            child.id,
            age_months
        );
        Ok(upcoming)
    }

    /// Mark a milestone achieved. Notes and photo are replaced only when
    /// given; concurrent calls resolve as last write wins.
    pub async fn achieve_milestone(
        &self,
        user_id: &str,
        milestone_id: &str,
        command: AchieveMilestoneCommand,
    ) -> DomainResult<Milestone> {
        let mut milestone = match self.milestones.get_milestone(milestone_id).await? {
            Some(milestone) => milestone,
            None => {
                warn!("Milestone {} not found", milestone_id);
                return Err(DomainError::not_found("Milestone not found"));
            }
        };

        if self.children.get_child(user_id, &milestone.child_id).await?.is_none() {
            warn!("Milestone {} is not owned by user {}", milestone_id, user_id);
            return Err(DomainError::not_found("Milestone not found"));
        }

        if let Some(notes) = &command.notes {
            check_length("notes", notes, MAX_NOTES_LENGTH)?;
        }

        milestone.achieved_at = Some(match &command.achieved_at {
            Some(value) => self.calendar.parse_past_timestamp(value, "achievedAt")?,
            None => self.calendar.now(),
        });
        if command.notes.is_some() {
            milestone.notes = command.notes;
        }
        if command.photo_url.is_some() {
            milestone.photo_url = command.photo_url;
        }
        milestone.updated_at = self.calendar.now();

        self.milestones.update_achievement(&milestone).await?;
        info!("Milestone {} achieved", milestone.id);
        Ok(milestone)
    }

    /// Public catalog query. `category` is the raw wire value; an unknown
    /// value is a validation error.
    pub async fn list_templates(&self, category: Option<&str>) -> DomainResult<Vec<MilestoneTemplate>> {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| {
                c.parse::<MilestoneCategory>()
                    .map_err(|e| DomainError::validation(e.to_string()))
            })
            .transpose()?;

        Ok(self.templates.list_active_templates(category).await?)
    }

    pub async fn progress(&self, user_id: &str, child_id: &str) -> DomainResult<ProgressResult> {
        let child = find_owned_child(self.children.as_ref(), user_id, child_id).await?;
        let age_months = self.age_months(&child);

        let achieved = self.milestones.count_achieved(&child.id).await?;
        let templates = self.templates.list_active_templates(None).await?;

        Ok(compute_progress(&templates, achieved, age_months))
    }
}

fn check_length(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            field, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sqlite::{ChildRepository, DbConnection, MilestoneRepository};
    use crate::test_utils::{create_child, create_user, date, fixed_calendar, test_db};
    use chrono::{TimeZone, Utc};

    fn template(id: &str, min: u32, max: u32, order: i64) -> MilestoneTemplate {
        MilestoneTemplate {
            id: id.to_string(),
            category: MilestoneCategory::Physical,
            title: id.to_string(),
            description: String::new(),
            age_months_min: min,
            age_months_max: max,
            icon_name: None,
            order,
            is_active: true,
        }
    }

    fn ids(templates: &[MilestoneTemplate]) -> Vec<&str> {
        templates.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_select_upcoming_window_and_order() {
        let templates = vec![
            template("closed", 0, 3, 0),
            template("later-b", 8, 12, 1),
            template("now", 4, 7, 0),
            template("later-a", 8, 10, 0),
            template("too-far", 9, 14, 0),
        ];

        let upcoming = select_upcoming(&templates, &HashSet::new(), 5);
        assert_eq!(ids(&upcoming), vec!["now", "later-a", "later-b"]);
    }

    #[test]
    fn test_select_upcoming_skips_achieved_and_inactive() {
        let mut inactive = template("inactive", 5, 6, 2);
        inactive.is_active = false;
        let templates = vec![template("a", 5, 6, 0), template("b", 5, 6, 1), inactive];
        let achieved: HashSet<String> = ["a".to_string()].into_iter().collect();

        let upcoming = select_upcoming(&templates, &achieved, 5);
        assert_eq!(ids(&upcoming), vec!["b"]);
    }

    #[test]
    fn test_progress_counts_closed_windows() {
        let templates = vec![template("a", 0, 2, 0), template("b", 3, 5, 0), template("c", 9, 12, 0)];

        let progress = compute_progress(&templates, 1, 6);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.percentage, 50);
        assert_eq!(progress.age_months, 6);
    }

    #[test]
    fn test_progress_never_exceeds_100_percent() {
        let templates = vec![template("a", 0, 2, 0)];

        let progress = compute_progress(&templates, 4, 1);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.percentage, 100);

        let empty = compute_progress(&[], 0, 0);
        assert_eq!((empty.total, empty.percentage), (0, 0));
    }

    #[test]
    fn test_progress_rounds_percentage() {
        let templates = vec![template("a", 0, 1, 0), template("b", 0, 1, 1), template("c", 0, 1, 2)];
        assert_eq!(compute_progress(&templates, 1, 1).percentage, 33);
        assert_eq!(compute_progress(&templates, 2, 1).percentage, 67);
    }

    struct Fixture {
        service: MilestoneService,
        repo: MilestoneRepository,
        user_id: String,
        child_id: String,
    }

    async fn fixture(db: DbConnection) -> Fixture {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let user = create_user(&db, "parent@example.com", "token").await;
        // Six months old on the fixture date
        let child = create_child(&db, &user.id, date(2023, 7, 2)).await;

        let repo = MilestoneRepository::new(db.clone());
        for t in [template("t-early", 0, 3, 0), template("t-now", 5, 8, 0), template("t-soon", 8, 10, 0)] {
            repo.store_template(&t).await.unwrap();
        }

        let service = MilestoneService::new(
            Arc::new(ChildRepository::new(db.clone())),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            fixed_calendar(now, 0),
        );
        Fixture {
            service,
            repo,
            user_id: user.id,
            child_id: child.id,
        }
    }

    fn create_command(template_id: Option<&str>, title: &str) -> CreateMilestoneCommand {
        CreateMilestoneCommand {
            template_id: template_id.map(str::to_string),
            category: MilestoneCategory::Physical,
            title: title.to_string(),
            description: None,
            achieved_at: None,
            notes: None,
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_embeds_template() {
        let f = fixture(test_db().await).await;

        let created = f
            .service
            .create_milestone(&f.user_id, &f.child_id, create_command(Some("t-now"), "Sits up"))
            .await
            .unwrap();
        assert_eq!(created.template.as_ref().map(|t| t.id.as_str()), Some("t-now"));
        assert_eq!(
            created.milestone.achieved_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap())
        );

        let listed = f.service.list_milestones(&f.user_id, &f.child_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].template.as_ref().map(|t| t.id.as_str()), Some("t-now"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let f = fixture(test_db().await).await;

        let unknown_template = create_command(Some("nope"), "Sits up");
        let future = CreateMilestoneCommand {
            achieved_at: Some("2024-02-01T00:00:00Z".to_string()),
            ..create_command(None, "Sits up")
        };
        let blank = create_command(None, "  ");

        for command in [unknown_template, future, blank] {
            let result = f.service.create_milestone(&f.user_id, &f.child_id, command).await;
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }

        let result = f
            .service
            .create_milestone(&f.user_id, "missing-child", create_command(None, "Sits up"))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_upcoming_and_progress_follow_achievements() {
        let f = fixture(test_db().await).await;

        let upcoming = f.service.upcoming_milestones(&f.user_id, &f.child_id).await.unwrap();
        assert_eq!(ids(&upcoming), vec!["t-now", "t-soon"]);

        let progress = f.service.progress(&f.user_id, &f.child_id).await.unwrap();
        assert_eq!(progress, ProgressResult { achieved: 0, total: 2, percentage: 0, age_months: 6 });

        f.service
            .create_milestone(&f.user_id, &f.child_id, create_command(Some("t-now"), "Sits up"))
            .await
            .unwrap();

        let upcoming = f.service.upcoming_milestones(&f.user_id, &f.child_id).await.unwrap();
        assert_eq!(ids(&upcoming), vec!["t-soon"]);

        let progress = f.service.progress(&f.user_id, &f.child_id).await.unwrap();
        assert_eq!((progress.achieved, progress.total, progress.percentage), (1, 2, 50));
    }

    #[tokio::test]
    async fn test_achieve_keeps_notes_unless_given() {
        let f = fixture(test_db().await).await;
        let created = f
            .service
            .create_milestone(
                &f.user_id,
                &f.child_id,
                CreateMilestoneCommand {
                    notes: Some("At grandma's".to_string()),
                    ..create_command(None, "Rolls over")
                },
            )
            .await
            .unwrap();

        let achieved = f
            .service
            .achieve_milestone(
                &f.user_id,
                &created.milestone.id,
                AchieveMilestoneCommand {
                    achieved_at: Some("2024-01-10".to_string()),
                    notes: None,
                    photo_url: Some("https://example.com/p.jpg".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(achieved.notes.as_deref(), Some("At grandma's"));
        assert_eq!(achieved.photo_url.as_deref(), Some("https://example.com/p.jpg"));
        assert_eq!(achieved.achieved_at, Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()));
        assert_eq!(f.repo.get_milestone(&achieved.id).await.unwrap().unwrap(), achieved);
    }

    #[tokio::test]
    async fn test_achieve_requires_ownership() {
        let db = test_db().await;
        let f = fixture(db.clone()).await;
        let stranger = create_user(&db, "stranger@example.com", "stranger-token").await;
        let created = f
            .service
            .create_milestone(&f.user_id, &f.child_id, create_command(None, "Claps"))
            .await
            .unwrap();

        let result = f
            .service
            .achieve_milestone(&stranger.id, &created.milestone.id, AchieveMilestoneCommand::default())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));

        let result = f
            .service
            .achieve_milestone(&f.user_id, "missing", AchieveMilestoneCommand::default())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_templates_category_filter() {
        let f = fixture(test_db().await).await;

        assert_eq!(f.service.list_templates(None).await.unwrap().len(), 3);
        assert_eq!(f.service.list_templates(Some("PHYSICAL")).await.unwrap().len(), 3);
        assert!(f.service.list_templates(Some("SOCIAL")).await.unwrap().is_empty());
        assert!(matches!(
            f.service.list_templates(Some("WALKING")).await,
            Err(DomainError::Validation(_))
        ));
    }
}
