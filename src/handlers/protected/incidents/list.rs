// handlers/protected/incidents/list.rs - GET /incidents handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::database::models::IncidentFilter;
use crate::middleware::{ApiResponse, ApiResult, QueryParams};
use crate::router::AppState;

/// GET /incidents - Overview rows, newest first, optionally filtered by
/// exact `status`, `category` and `severity`
pub async fn incidents_get(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<IncidentFilter>,
) -> ApiResult<Value> {
    let incidents = state.incidents.list(filter).await?;
    Ok(ApiResponse::success(
        "Fetched incidents",
        json!({ "incidents": incidents }),
    ))
}
