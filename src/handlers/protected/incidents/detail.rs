// handlers/protected/incidents/detail.rs - GET /incidents/:id handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, PathParam};
use crate::router::AppState;

/// GET /incidents/:id - Full incident with people and relation lists
pub async fn incident_get(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> ApiResult<Value> {
    let incident = state.incidents.get(id).await?;
    Ok(ApiResponse::success(
        "Fetched incident",
        json!({ "incident": incident }),
    ))
}
