use shared::{
    Child as SharedChild, ChildDetail as SharedChildDetail, CreateChildRequest, UpdateChildRequest,
};

use crate::domain::calendar::{format_date, format_timestamp};
use crate::domain::commands::child::{ChildDetail, CreateChildCommand, UpdateChildCommand};
use crate::domain::models::child::Child as DomainChild;
use crate::io::rest::mappers::{MilestoneMapper, TrackingMapper};

/// Mapper between the child DTOs and the domain child model
pub struct ChildMapper;

impl ChildMapper {
    pub fn to_dto(domain: DomainChild) -> SharedChild {
        SharedChild {
            id: domain.id,
            user_id: domain.user_id,
            name: domain.name,
            date_of_birth: format_date(domain.date_of_birth),
            gender: domain.gender,
            avatar_url: domain.avatar_url,
            color: domain.color,
            created_at: format_timestamp(&domain.created_at),
            updated_at: format_timestamp(&domain.updated_at),
        }
    }

    pub fn to_detail_dto(detail: ChildDetail) -> SharedChildDetail {
        SharedChildDetail {
            child: Self::to_dto(detail.child),
            age_months: detail.age_months,
            recent_milestones: detail
                .recent_milestones
                .into_iter()
                .map(|m| MilestoneMapper::to_dto(m, None))
                .collect(),
            latest_growth: detail.latest_growth.map(TrackingMapper::to_growth_dto),
        }
    }

    pub fn to_create_command(request: CreateChildRequest) -> CreateChildCommand {
        CreateChildCommand {
            name: request.name,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            avatar_url: request.avatar_url,
            color: request.color,
        }
    }

    pub fn to_update_command(request: UpdateChildRequest) -> UpdateChildCommand {
        UpdateChildCommand {
            name: request.name,
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            avatar_url: request.avatar_url,
            color: request.color,
        }
    }
}
