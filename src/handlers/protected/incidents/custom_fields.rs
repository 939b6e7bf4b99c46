// handlers/protected/incidents/custom_fields.rs - POST /incidents/custom-fields handler

use axum::extract::State;
use serde_json::Value;
use tracing::info;

use crate::database::models::IncidentCustomFieldsUpdate;
use crate::middleware::{ApiResponse, ApiResult, JsonBody};
use crate::router::AppState;

/// POST /incidents/custom-fields - Replace impact/treatment/mitigator (when
/// given) and all five relation sets
///
/// Relations are replaced wholesale: send the complete desired set for each.
/// A list left out of the body is cleared.
pub async fn incident_custom_fields(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<IncidentCustomFieldsUpdate>,
) -> ApiResult<Value> {
    info!(incident_id = input.id, "Updating incident custom fields");
    state.incidents.update_custom_fields(input).await?;
    Ok(ApiResponse::success(
        "Incident custom fields updated successfully",
        Value::Null,
    ))
}
