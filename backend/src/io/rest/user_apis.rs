//! # REST API for the Caller's Profile

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiResult;
use crate::io::rest::mappers::UserMapper;
use crate::AppState;
use shared::{UpdateProfileRequest, User};

/// GET /users/profile
pub async fn get_profile(user: AuthUser) -> ApiResult<Json<User>> {
    info!("GET /users/profile");
    Ok(Json(UserMapper::to_dto(user.0)))
}

/// PATCH /users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    info!("PATCH /users/profile");

    let command = UserMapper::to_update_command(request);
    let updated = state.user_service.update_profile(user.id(), command).await?;
    Ok(Json(UserMapper::to_dto(updated)))
}
