use shared::{
    AchieveMilestoneRequest, CreateMilestoneRequest, Milestone as SharedMilestone,
    MilestoneProgress, MilestoneTemplate as SharedTemplate,
};

use crate::domain::calendar::format_timestamp;
use crate::domain::commands::milestone::{AchieveMilestoneCommand, CreateMilestoneCommand, ProgressResult};
use crate::domain::models::milestone::{Milestone, MilestoneTemplate, MilestoneWithTemplate};

/// Mapper between the milestone DTOs and the domain milestone models
pub struct MilestoneMapper;

impl MilestoneMapper {
    pub fn to_template_dto(domain: MilestoneTemplate) -> SharedTemplate {
        SharedTemplate {
            id: domain.id,
            category: domain.category,
            title: domain.title,
            description: domain.description,
            age_months_min: domain.age_months_min,
            age_months_max: domain.age_months_max,
            icon_name: domain.icon_name,
            order: domain.order,
        }
    }

    pub fn to_dto(domain: Milestone, template: Option<MilestoneTemplate>) -> SharedMilestone {
        SharedMilestone {
            id: domain.id,
            child_id: domain.child_id,
            template_id: domain.template_id,
            category: domain.category,
            title: domain.title,
            description: domain.description,
            achieved_at: domain.achieved_at.as_ref().map(format_timestamp),
            notes: domain.notes,
            photo_url: domain.photo_url,
            created_at: format_timestamp(&domain.created_at),
            updated_at: format_timestamp(&domain.updated_at),
            template: template.map(Self::to_template_dto),
        }
    }

    pub fn to_dto_with_template(domain: MilestoneWithTemplate) -> SharedMilestone {
        Self::to_dto(domain.milestone, domain.template)
    }

    pub fn to_progress_dto(progress: ProgressResult) -> MilestoneProgress {
        MilestoneProgress {
            achieved: progress.achieved,
            total: progress.total,
            percentage: progress.percentage,
            age_months: progress.age_months,
        }
    }

    pub fn to_create_command(request: CreateMilestoneRequest) -> CreateMilestoneCommand {
        CreateMilestoneCommand {
            template_id: request.template_id,
            category: request.category,
            title: request.title,
            description: request.description,
            achieved_at: request.achieved_at,
            notes: request.notes,
            photo_url: request.photo_url,
        }
    }

    pub fn to_achieve_command(request: AchieveMilestoneRequest) -> AchieveMilestoneCommand {
        AchieveMilestoneCommand {
            achieved_at: request.achieved_at,
            notes: request.notes,
            photo_url: request.photo_url,
        }
    }
}
