use axum::extract::State;
use axum::Json;
use shared::HealthResponse;

use crate::io::rest::error::ApiResult;
use crate::AppState;

/// GET /health: answers once the database responds
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.db.ping().await?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
