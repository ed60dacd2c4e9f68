use shared::{UpdateProfileRequest, User as SharedUser};

use crate::domain::calendar::format_timestamp;
use crate::domain::commands::user::UpdateProfileCommand;
use crate::domain::models::user::User;

/// Mapper between the profile DTOs and the user model. The API token never
/// leaves the backend.
pub struct UserMapper;

impl UserMapper {
    pub fn to_dto(domain: User) -> SharedUser {
        SharedUser {
            id: domain.id,
            email: domain.email,
            name: domain.name,
            avatar_url: domain.avatar_url,
            preferences: domain.preferences,
            created_at: format_timestamp(&domain.created_at),
            updated_at: format_timestamp(&domain.updated_at),
        }
    }

    pub fn to_update_command(request: UpdateProfileRequest) -> UpdateProfileCommand {
        UpdateProfileCommand {
            name: request.name,
            avatar_url: request.avatar_url,
            preferences: request.preferences,
        }
    }
}
