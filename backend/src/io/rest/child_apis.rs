//! # REST API for Child Management
//!
//! Endpoints for creating, retrieving, updating and deleting the caller's
//! children.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiResult;
use crate::io::rest::mappers::ChildMapper;
use crate::AppState;
use shared::{Child, ChildDetail, CreateChildRequest, UpdateChildRequest};

/// POST /children
pub async fn create_child(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateChildRequest>,
) -> ApiResult<(StatusCode, Json<Child>)> {
    info!("POST /children");

    let command = ChildMapper::to_create_command(request);
    let child = state.child_service.create_child(user.id(), command).await?;
    Ok((StatusCode::CREATED, Json(ChildMapper::to_dto(child))))
}

/// GET /children
pub async fn list_children(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<Child>>> {
    info!("GET /children");

    let children = state.child_service.list_children(user.id()).await?;
    Ok(Json(children.into_iter().map(ChildMapper::to_dto).collect()))
}

/// GET /children/:id
pub async fn get_child(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
) -> ApiResult<Json<ChildDetail>> {
    info!("GET /children/{}", child_id);

    let detail = state.child_service.get_child_detail(user.id(), &child_id).await?;
    Ok(Json(ChildMapper::to_detail_dto(detail)))
}

/// PATCH /children/:id
pub async fn update_child(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> ApiResult<Json<Child>> {
    info!("PATCH /children/{}", child_id);

    let command = ChildMapper::to_update_command(request);
    let child = state.child_service.update_child(user.id(), &child_id, command).await?;
    Ok(Json(ChildMapper::to_dto(child)))
}

/// DELETE /children/:id
pub async fn delete_child(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
) -> ApiResult<StatusCode> {
    info!("DELETE /children/{}", child_id);

    state.child_service.delete_child(user.id(), &child_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
