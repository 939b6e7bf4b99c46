use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::database::models::option::OptionItem;
use crate::types::deserialize_flexible_id;

/// Option sets an incident links to through join tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Products,
    Areas,
    Causes,
    FaultySystems,
    PerformanceIndicators,
}

impl RelationKind {
    pub const ALL: [RelationKind; 5] = [
        RelationKind::Products,
        RelationKind::Areas,
        RelationKind::Causes,
        RelationKind::FaultySystems,
        RelationKind::PerformanceIndicators,
    ];

    pub fn join_table(self) -> &'static str {
        match self {
            RelationKind::Products => "incident_products",
            RelationKind::Areas => "incident_areas",
            RelationKind::Causes => "incident_causes",
            RelationKind::FaultySystems => "incident_faulty_systems",
            RelationKind::PerformanceIndicators => "incident_performance_indicators",
        }
    }

    pub fn related_column(self) -> &'static str {
        match self {
            RelationKind::Products => "product_id",
            RelationKind::Areas => "area_id",
            RelationKind::Causes => "cause_id",
            RelationKind::FaultySystems => "faulty_system_id",
            RelationKind::PerformanceIndicators => "performance_indicator_id",
        }
    }

    pub fn option_table(self) -> &'static str {
        match self {
            RelationKind::Products => "products",
            RelationKind::Areas => "areas",
            RelationKind::Causes => "causes",
            RelationKind::FaultySystems => "faulty_systems",
            RelationKind::PerformanceIndicators => "performance_indicators",
        }
    }
}

/// Body of `POST /incidents/create`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IncidentInput {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    #[serde(default)]
    pub title: String,
    #[validate(range(min = 1, message = "type is required"))]
    #[serde(rename = "type", default, deserialize_with = "deserialize_flexible_id")]
    pub incident_type: i32,
    #[validate(length(min = 1, message = "severity is required"))]
    #[serde(default)]
    pub severity: String,
    #[validate(length(min = 1, message = "summary is required"))]
    #[serde(default)]
    pub summary: String,
    pub status: Option<String>,
    pub category: Option<String>,
    pub impact: Option<String>,
    pub lead: Option<i32>,
    pub source: Option<String>,
    #[serde(default)]
    pub products: Vec<i32>,
    #[serde(default)]
    pub areas: Vec<i32>,
    #[serde(default)]
    pub indicators: Vec<i32>,
    /// Raw form value, parsed by the service in the reporting timezone
    #[serde(alias = "impactStartedAt")]
    pub started_at: Option<String>,
    #[serde(alias = "slackThread")]
    pub slack_thread: Option<String>,
}

/// Fully resolved incident ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    pub title: String,
    pub incident_type: i32,
    pub severity: String,
    pub summary: String,
    pub reporter: i32,
    pub status: String,
    pub reported_at: DateTime<Utc>,
    pub category: Option<String>,
    pub impact: Option<String>,
    pub lead: Option<i32>,
    pub source: Option<String>,
    pub impact_started_at: Option<DateTime<Utc>>,
    pub slack_thread: Option<String>,
    pub products: Vec<i32>,
    pub areas: Vec<i32>,
    pub indicators: Vec<i32>,
}

/// Query string of `GET /incidents`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
}

/// Row of the incident list
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IncidentOverview {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub incident_type: i32,
    pub severity: String,
    pub summary: String,
    pub status: String,
    pub impact_started_at: Option<DateTime<Utc>>,
    pub lead: Option<String>,
    pub lead_avatar: Option<String>,
}

/// Incident columns plus the names and avatars of the people attached to it
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    pub id: i32,
    pub reference: Option<i32>,
    pub title: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub incident_type: i32,
    pub severity: String,
    pub summary: String,
    pub status: String,
    pub category: Option<String>,
    pub reporter: i32,
    pub reporter_name: Option<String>,
    pub reporter_avatar: Option<String>,
    pub lead: Option<i32>,
    pub lead_name: Option<String>,
    pub lead_avatar: Option<String>,
    pub qe: Option<i32>,
    pub qe_name: Option<String>,
    pub qe_avatar: Option<String>,
    pub impact: Option<String>,
    pub treatment: Option<String>,
    pub mitigator: Option<String>,
    pub post_mortem: Option<String>,
    pub incident_source: Option<String>,
    pub slack_channel: Option<String>,
    pub slack_thread: Option<String>,
    pub related_incident: Option<i32>,
    pub post_to_status_page: Option<bool>,
    pub impact_started_at: Option<DateTime<Utc>>,
    pub impact_stopped_at: Option<DateTime<Utc>>,
    pub reported_at: DateTime<Utc>,
    pub identified_at: Option<DateTime<Utc>>,
    pub fixed_at: Option<DateTime<Utc>>,
    pub documentation_at: Option<DateTime<Utc>>,
    pub in_review_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// `GET /incidents/:id` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetail {
    #[serde(flatten)]
    pub incident: IncidentRecord,
    pub products: Vec<OptionItem>,
    pub areas: Vec<OptionItem>,
    pub causes: Vec<OptionItem>,
    pub faulty_systems: Vec<OptionItem>,
    pub performance_indicators: Vec<OptionItem>,
}

impl IncidentDetail {
    pub fn new(incident: IncidentRecord) -> Self {
        Self {
            incident,
            products: Vec::new(),
            areas: Vec::new(),
            causes: Vec::new(),
            faulty_systems: Vec::new(),
            performance_indicators: Vec::new(),
        }
    }

    pub fn relation_mut(&mut self, kind: RelationKind) -> &mut Vec<OptionItem> {
        match kind {
            RelationKind::Products => &mut self.products,
            RelationKind::Areas => &mut self.areas,
            RelationKind::Causes => &mut self.causes,
            RelationKind::FaultySystems => &mut self.faulty_systems,
            RelationKind::PerformanceIndicators => &mut self.performance_indicators,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IncidentSummaryUpdate {
    #[validate(range(min = 1, message = "id is required"))]
    #[serde(default)]
    pub id: i32,
    #[validate(length(min = 1, message = "summary is required"))]
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IncidentStatusUpdate {
    #[validate(range(min = 1, message = "id is required"))]
    #[serde(default)]
    pub id: i32,
    #[validate(length(min = 1, message = "status is required"))]
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IncidentSeverityUpdate {
    #[validate(range(min = 1, message = "id is required"))]
    #[serde(default)]
    pub id: i32,
    #[validate(length(min = 1, message = "severity is required"))]
    #[serde(default)]
    pub severity: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IncidentTypeUpdate {
    #[validate(range(min = 1, message = "id is required"))]
    #[serde(default)]
    pub id: i32,
    #[validate(range(min = 1, message = "type is required"))]
    #[serde(rename = "type", default, deserialize_with = "deserialize_flexible_id")]
    pub incident_type: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IncidentRolesUpdate {
    #[validate(range(min = 1, message = "id is required"))]
    #[serde(default)]
    pub id: i32,
    pub lead: Option<i32>,
    pub qe: Option<i32>,
}

/// Replaces impact/treatment/mitigator when given and every relation set
/// wholesale. An omitted list is the same as an empty one.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IncidentCustomFieldsUpdate {
    #[validate(range(min = 1, message = "id is required"))]
    #[serde(default)]
    pub id: i32,
    pub impact: Option<String>,
    pub treatment: Option<String>,
    pub mitigator: Option<String>,
    #[serde(default)]
    pub products: Vec<i32>,
    #[serde(default)]
    pub areas: Vec<i32>,
    #[serde(default)]
    pub causes: Vec<i32>,
    #[serde(default, alias = "faulty_systems")]
    pub faulty_systems: Vec<i32>,
    #[serde(default, alias = "performance_indicators")]
    pub performance_indicators: Vec<i32>,
}

impl IncidentCustomFieldsUpdate {
    pub fn relation(&self, kind: RelationKind) -> &[i32] {
        match kind {
            RelationKind::Products => &self.products,
            RelationKind::Areas => &self.areas,
            RelationKind::Causes => &self.causes,
            RelationKind::FaultySystems => &self.faulty_systems,
            RelationKind::PerformanceIndicators => &self.performance_indicators,
        }
    }
}

/// Ids in first-seen order without repeats; join rows are keyed on the pair.
pub fn distinct_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
