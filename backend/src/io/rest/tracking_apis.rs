//! # REST API for Growth and Daily Logs

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::io::rest::auth::AuthUser;
use crate::io::rest::error::ApiResult;
use crate::io::rest::mappers::TrackingMapper;
use crate::AppState;
use shared::{
    CreateDailyLogRequest, CreateGrowthRecordRequest, DailyLog, DailySummary, DateQuery, GrowthRecord,
};

/// POST /tracking/growth/:childId
pub async fn create_growth_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
    Json(request): Json<CreateGrowthRecordRequest>,
) -> ApiResult<(StatusCode, Json<GrowthRecord>)> {
    info!("POST /tracking/growth/{}", child_id);

    let command = TrackingMapper::to_growth_command(request);
    let record = state
        .tracking_service
        .create_growth_record(user.id(), &child_id, command)
        .await?;
    Ok((StatusCode::CREATED, Json(TrackingMapper::to_growth_dto(record))))
}

/// GET /tracking/growth/:childId
pub async fn list_growth_records(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
) -> ApiResult<Json<Vec<GrowthRecord>>> {
    info!("GET /tracking/growth/{}", child_id);

    let records = state.tracking_service.list_growth_records(user.id(), &child_id).await?;
    Ok(Json(records.into_iter().map(TrackingMapper::to_growth_dto).collect()))
}

/// GET /tracking/growth/:childId/latest
pub async fn latest_growth_record(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
) -> ApiResult<Json<Option<GrowthRecord>>> {
    info!("GET /tracking/growth/{}/latest", child_id);

    let record = state.tracking_service.latest_growth_record(user.id(), &child_id).await?;
    Ok(Json(record.map(TrackingMapper::to_growth_dto)))
}

/// POST /tracking/logs/:childId
pub async fn create_daily_log(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
    Json(request): Json<CreateDailyLogRequest>,
) -> ApiResult<(StatusCode, Json<DailyLog>)> {
    info!("POST /tracking/logs/{} type={}", child_id, request.log_type);

    let command = TrackingMapper::to_log_command(request);
    let log = state
        .tracking_service
        .create_daily_log(user.id(), &child_id, command)
        .await?;
    Ok((StatusCode::CREATED, Json(TrackingMapper::to_log_dto(log)?)))
}

/// GET /tracking/logs/:childId?date=
pub async fn list_daily_logs(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<Vec<DailyLog>>> {
    info!("GET /tracking/logs/{} date={:?}", child_id, query.date);

    let logs = state
        .tracking_service
        .list_daily_logs(user.id(), &child_id, query.date.as_deref())
        .await?;
    let logs = logs
        .into_iter()
        .map(TrackingMapper::to_log_dto)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Json(logs))
}

/// GET /tracking/logs/:childId/summary?date=
pub async fn daily_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(child_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<DailySummary>> {
    info!("GET /tracking/logs/{}/summary date={:?}", child_id, query.date);

    let summary = state
        .tracking_service
        .daily_summary(user.id(), &child_id, query.date.as_deref())
        .await?;
    Ok(Json(TrackingMapper::to_summary_dto(summary)))
}
