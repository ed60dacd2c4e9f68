//! # REST API for Milestones
//!
//! Achieved milestones per child, upcoming suggestions, progress and the
//! public template catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiResult;
use crate::io::rest::mappers::MilestoneMapper;
use crate::AppState;
use shared::{
    AchieveMilestoneRequest, CreateMilestoneRequest, Milestone, MilestoneProgress,
    MilestoneTemplate, TemplateQuery,
};

/// POST /milestones/child/:childId
pub async fn create_milestone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
    Json(request): Json<CreateMilestoneRequest>,
) -> ApiResult<(StatusCode, Json<Milestone>)> {
    info!("POST /milestones/child/{}", child_id);

    let command = MilestoneMapper::to_create_command(request);
    let created = state
        .milestone_service
        .create_milestone(user.id(), &child_id, command)
        .await?;
    Ok((StatusCode::CREATED, Json(MilestoneMapper::to_dto_with_template(created))))
}

/// GET /milestones/child/:childId
pub async fn list_milestones(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
) -> ApiResult<Json<Vec<Milestone>>> {
    info!("GET /milestones/child/{}", child_id);

    let milestones = state.milestone_service.list_milestones(user.id(), &child_id).await?;
    Ok(Json(
        milestones
            .into_iter()
            .map(MilestoneMapper::to_dto_with_template)
            .collect(),
    ))
}

/// GET /milestones/child/:childId/upcoming
pub async fn upcoming_milestones(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
) -> ApiResult<Json<Vec<MilestoneTemplate>>> {
    info!("GET /milestones/child/{}/upcoming", child_id);

    let templates = state
        .milestone_service
        .upcoming_milestones(user.id(), &child_id)
        .await?;
    Ok(Json(templates.into_iter().map(MilestoneMapper::to_template_dto).collect()))
}

/// GET /milestones/child/:childId/progress
pub async fn milestone_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
) -> ApiResult<Json<MilestoneProgress>> {
    info!("GET /milestones/child/{}/progress", child_id);

    let progress = state.milestone_service.progress(user.id(), &child_id).await?;
    Ok(Json(MilestoneMapper::to_progress_dto(progress)))
}

/// PATCH /milestones/:id/achieve
pub async fn achieve_milestone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(milestone_id): Path<String>,
    Json(request): Json<AchieveMilestoneRequest>,
) -> ApiResult<Json<Milestone>> {
    info!("PATCH /milestones/{}/achieve", milestone_id);

    let command = MilestoneMapper::to_achieve_command(request);
    let milestone = state
        .milestone_service
        .achieve_milestone(user.id(), &milestone_id, command)
        .await?;
    Ok(Json(MilestoneMapper::to_dto(milestone, None)))
}

/// GET /milestones/templates?category=
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> ApiResult<Json<Vec<MilestoneTemplate>>> {
    info!("GET /milestones/templates category={:?}", query.category);

    let templates = state
        .milestone_service
        .list_templates(query.category.as_deref())
        .await?;
    Ok(Json(templates.into_iter().map(MilestoneMapper::to_template_dto).collect()))
}
