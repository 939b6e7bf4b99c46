use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Tz;
use tracing::{debug, info};

use super::validation::validate_input;
use super::ServiceError;
use crate::database::models::{
    IncidentCustomFieldsUpdate, IncidentDetail, IncidentFilter, IncidentInput, IncidentOverview,
    IncidentRolesUpdate, IncidentSeverityUpdate, IncidentStatusUpdate, IncidentSummaryUpdate,
    IncidentTypeUpdate, NewIncident,
};
use crate::database::repositories::IncidentRepository;
use crate::types::parse_timestamp;

pub struct IncidentService {
    incidents: Arc<dyn IncidentRepository>,
    default_status: String,
    timezone: Tz,
}

impl IncidentService {
    pub fn new(incidents: Arc<dyn IncidentRepository>, default_status: String, timezone: Tz) -> Self {
        Self {
            incidents,
            default_status,
            timezone,
        }
    }

    /// Validate and store a new incident reported by `reporter`
    pub async fn create(&self, input: IncidentInput, reporter: i32) -> Result<i32, ServiceError> {
        validate_input(&input)?;

        let impact_started_at = match input.started_at.as_deref() {
            Some(raw) => parse_timestamp(raw, self.timezone)
                .map_err(|_| ServiceError::validation("started_at must be a valid timestamp"))?,
            None => None,
        };

        let status = input
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.default_status.clone());

        let incident = NewIncident {
            title: input.title,
            incident_type: input.incident_type,
            severity: input.severity,
            summary: input.summary,
            reporter,
            status,
            reported_at: Utc::now(),
            category: non_blank(input.category),
            impact: non_blank(input.impact),
            lead: input.lead,
            source: non_blank(input.source),
            impact_started_at,
            slack_thread: non_blank(input.slack_thread),
            products: input.products,
            areas: input.areas,
            indicators: input.indicators,
        };

        let id = self.incidents.create_incident(&incident).await?;
        info!(incident_id = id, reporter, "Incident created");
        Ok(id)
    }

    pub async fn list(&self, filter: IncidentFilter) -> Result<Vec<IncidentOverview>, ServiceError> {
        let filter = IncidentFilter {
            status: non_blank(filter.status),
            category: non_blank(filter.category),
            severity: non_blank(filter.severity),
        };
        debug!(?filter, "Listing incidents");
        Ok(self.incidents.get_incidents(&filter).await?)
    }

    pub async fn get(&self, id: i32) -> Result<IncidentDetail, ServiceError> {
        if id < 1 {
            return Err(ServiceError::validation("id must be greater than or equal to 1"));
        }
        Ok(self.incidents.get_incident_by_id(id).await?)
    }

    pub async fn update_summary(&self, input: IncidentSummaryUpdate) -> Result<(), ServiceError> {
        validate_input(&input)?;
        Ok(self.incidents.update_summary(input.id, &input.summary).await?)
    }

    pub async fn update_status(&self, input: IncidentStatusUpdate) -> Result<(), ServiceError> {
        validate_input(&input)?;
        Ok(self.incidents.update_status(input.id, &input.status).await?)
    }

    pub async fn update_severity(&self, input: IncidentSeverityUpdate) -> Result<(), ServiceError> {
        validate_input(&input)?;
        Ok(self.incidents.update_severity(input.id, &input.severity).await?)
    }

    pub async fn update_type(&self, input: IncidentTypeUpdate) -> Result<(), ServiceError> {
        validate_input(&input)?;
        Ok(self.incidents.update_type(input.id, input.incident_type).await?)
    }

    pub async fn update_roles(&self, input: IncidentRolesUpdate) -> Result<(), ServiceError> {
        validate_input(&input)?;
        Ok(self.incidents.update_roles(&input).await?)
    }

    pub async fn update_custom_fields(&self, input: IncidentCustomFieldsUpdate) -> Result<(), ServiceError> {
        validate_input(&input)?;
        Ok(self.incidents.update_custom_fields(&input).await?)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
