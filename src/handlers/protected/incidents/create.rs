// handlers/protected/incidents/create.rs - POST /incidents/create handler

use axum::{extract::State, Extension};
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::IncidentInput;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, JsonBody};
use crate::router::AppState;

/// POST /incidents/create - Open an incident reported by the caller
///
/// Expected Input:
/// ```json
/// {
///   "title": "DB down",
///   "type": "1",
///   "severity": "high",
///   "summary": "...",
///   "products": [2, 5],
///   "areas": [],
///   "indicators": [],
///   "started_at": "2024-03-10T09:30"
/// }
/// ```
///
/// Responds 201 with `data.incidentID`.
pub async fn incident_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<IncidentInput>,
) -> ApiResult<Value> {
    info!(user_id = user.id, title = %input.title, "Handling POST /incidents/create");

    let id = state.incidents.create(input, user.id).await?;
    Ok(ApiResponse::created(
        "Incident created successfully",
        json!({ "incidentID": id }),
    ))
}
