// handlers/protected/incidents/update.rs - POST /incidents/update/* handlers
//
// Each route changes exactly one aspect of an incident. An unknown id is 404.

use axum::extract::State;
use serde_json::Value;
use tracing::info;

use crate::database::models::{
    IncidentRolesUpdate, IncidentSeverityUpdate, IncidentStatusUpdate, IncidentSummaryUpdate,
    IncidentTypeUpdate,
};
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::router::AppState;

fn updated(msg: &str) -> ApiResponse<Value> {
    ApiResponse::success(msg, Value::Null)
}

/// POST /incidents/update/summary - `{ "id": 1, "summary": "..." }`
pub async fn incident_update_summary(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IncidentSummaryUpdate>,
) -> ApiResult<Value> {
    info!(incident_id = input.id, "Updating incident summary");
    state.incidents.update_summary(input).await?;
    Ok(updated("Incident summary updated successfully"))
}

/// POST /incidents/update/status - `{ "id": 1, "status": "Resolved" }`
pub async fn incident_update_status(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IncidentStatusUpdate>,
) -> ApiResult<Value> {
    info!(incident_id = input.id, status = %input.status, "Updating incident status");
    state.incidents.update_status(input).await?;
    Ok(updated("Incident status updated successfully"))
}

/// POST /incidents/update/severity - `{ "id": 1, "severity": "high" }`
pub async fn incident_update_severity(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IncidentSeverityUpdate>,
) -> ApiResult<Value> {
    info!(incident_id = input.id, severity = %input.severity, "Updating incident severity");
    state.incidents.update_severity(input).await?;
    Ok(updated("Incident severity updated successfully"))
}

/// POST /incidents/update/type - `{ "id": 1, "type": 2 }`
pub async fn incident_update_type(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IncidentTypeUpdate>,
) -> ApiResult<Value> {
    info!(incident_id = input.id, incident_type = input.incident_type, "Updating incident type");
    state.incidents.update_type(input).await?;
    Ok(updated("Incident type updated successfully"))
}

/// POST /incidents/update/roles - `{ "id": 1, "lead": 3, "qe": 4 }`, either role optional
pub async fn incident_update_roles(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IncidentRolesUpdate>,
) -> ApiResult<Value> {
    info!(incident_id = input.id, lead = ?input.lead, qe = ?input.qe, "Updating incident roles");
    state.incidents.update_roles(input).await?;
    Ok(updated("Incident roles updated successfully"))
}
