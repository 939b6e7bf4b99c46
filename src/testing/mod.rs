//! In-memory repositories and a request driver for router-level tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use crate::config::UserConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::incident::distinct_ids;
use crate::database::models::{
    IncidentCustomFieldsUpdate, IncidentDetail, IncidentFilter, IncidentOverview, IncidentRecord,
    IncidentRolesUpdate, NewIncident, NewUser, OptionItem, OptionKind, RelationKind, User, UserPublicData,
};
use crate::database::repositories::{IncidentRepository, OptionsRepository, UserRepository};
use crate::router::{app, AppState, SessionSettings};
use crate::services::{IncidentService, OptionsService, UserService};

mod api;

pub const TEST_SECRET: &str = "test-secret";

fn not_found(id: i32) -> DatabaseError {
    DatabaseError::NotFound(format!("incident with ID {} not found", id))
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(&self, user: &NewUser) -> Result<i32, DatabaseError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".into()));
        }
        let id = users.len() as i32 + 1;
        users.push(User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
            role: user.role.clone(),
            team: user.team.clone(),
            avatar_url: None,
        });
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn list_public(&self) -> Result<Vec<UserPublicData>, DatabaseError> {
        Ok(self.users.lock().unwrap().iter().map(UserPublicData::from).collect())
    }
}

#[derive(Clone)]
struct StoredIncident {
    incident: NewIncident,
    treatment: Option<String>,
    mitigator: Option<String>,
    qe: Option<i32>,
}

/// Incidents plus their relation rows, keyed like the join tables
#[derive(Default)]
pub struct InMemoryIncidents {
    incidents: Mutex<BTreeMap<i32, StoredIncident>>,
    relations: Mutex<HashMap<(i32, RelationKind), Vec<i32>>>,
}

impl InMemoryIncidents {
    /// Relation ids stored for an incident, in insertion order
    pub fn relation_ids(&self, id: i32, kind: RelationKind) -> Vec<i32> {
        self.relations.lock().unwrap().get(&(id, kind)).cloned().unwrap_or_default()
    }

    fn update<F>(&self, id: i32, apply: F) -> Result<(), DatabaseError>
    where
        F: FnOnce(&mut StoredIncident),
    {
        let mut incidents = self.incidents.lock().unwrap();
        let stored = incidents.get_mut(&id).ok_or_else(|| not_found(id))?;
        apply(stored);
        Ok(())
    }
}

fn option_item(id: i32) -> OptionItem {
    OptionItem {
        id,
        name: format!("option {}", id),
    }
}

#[async_trait]
impl IncidentRepository for InMemoryIncidents {
    async fn create_incident(&self, incident: &NewIncident) -> Result<i32, DatabaseError> {
        let mut incidents = self.incidents.lock().unwrap();
        let id = incidents.keys().next_back().copied().unwrap_or(0) + 1;
        incidents.insert(
            id,
            StoredIncident {
                incident: incident.clone(),
                treatment: None,
                mitigator: None,
                qe: None,
            },
        );

        let mut relations = self.relations.lock().unwrap();
        relations.insert((id, RelationKind::Products), distinct_ids(&incident.products));
        relations.insert((id, RelationKind::Areas), distinct_ids(&incident.areas));
        relations.insert(
            (id, RelationKind::PerformanceIndicators),
            distinct_ids(&incident.indicators),
        );
        Ok(id)
    }

    async fn get_incidents(&self, filter: &IncidentFilter) -> Result<Vec<IncidentOverview>, DatabaseError> {
        let matches = |wanted: &Option<String>, actual: Option<&str>| match wanted {
            Some(w) => actual == Some(w.as_str()),
            None => true,
        };

        Ok(self
            .incidents
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|(_, s)| {
                matches(&filter.status, Some(s.incident.status.as_str()))
                    && matches(&filter.category, s.incident.category.as_deref())
                    && matches(&filter.severity, Some(s.incident.severity.as_str()))
            })
            .map(|(id, s)| IncidentOverview {
                id: *id,
                title: s.incident.title.clone(),
                incident_type: s.incident.incident_type,
                severity: s.incident.severity.clone(),
                summary: s.incident.summary.clone(),
                status: s.incident.status.clone(),
                impact_started_at: s.incident.impact_started_at,
                lead: None,
                lead_avatar: None,
            })
            .collect())
    }

    async fn get_incident_by_id(&self, id: i32) -> Result<IncidentDetail, DatabaseError> {
        let stored = self
            .incidents
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))?;
        let incident = stored.incident;

        let mut detail = IncidentDetail::new(IncidentRecord {
            id,
            reference: None,
            title: incident.title,
            incident_type: incident.incident_type,
            severity: incident.severity,
            summary: incident.summary,
            status: incident.status,
            category: incident.category,
            reporter: incident.reporter,
            reporter_name: None,
            reporter_avatar: None,
            lead: incident.lead,
            lead_name: None,
            lead_avatar: None,
            qe: stored.qe,
            qe_name: None,
            qe_avatar: None,
            impact: incident.impact,
            treatment: stored.treatment,
            mitigator: stored.mitigator,
            post_mortem: None,
            incident_source: incident.source,
            slack_channel: None,
            slack_thread: incident.slack_thread,
            related_incident: None,
            post_to_status_page: None,
            impact_started_at: incident.impact_started_at,
            impact_stopped_at: None,
            reported_at: incident.reported_at,
            identified_at: None,
            fixed_at: None,
            documentation_at: None,
            in_review_at: None,
            resolved_at: None,
            closed_at: None,
        });
        for kind in RelationKind::ALL {
            *detail.relation_mut(kind) = self.relation_ids(id, kind).into_iter().map(option_item).collect();
        }
        Ok(detail)
    }

    async fn update_summary(&self, id: i32, summary: &str) -> Result<(), DatabaseError> {
        self.update(id, |s| s.incident.summary = summary.to_string())
    }

    async fn update_status(&self, id: i32, status: &str) -> Result<(), DatabaseError> {
        self.update(id, |s| s.incident.status = status.to_string())
    }

    async fn update_severity(&self, id: i32, severity: &str) -> Result<(), DatabaseError> {
        self.update(id, |s| s.incident.severity = severity.to_string())
    }

    async fn update_type(&self, id: i32, incident_type: i32) -> Result<(), DatabaseError> {
        self.update(id, |s| s.incident.incident_type = incident_type)
    }

    async fn update_roles(&self, roles: &IncidentRolesUpdate) -> Result<(), DatabaseError> {
        if roles.lead.is_none() && roles.qe.is_none() {
            return Ok(());
        }
        self.update(roles.id, |s| {
            if roles.lead.is_some() {
                s.incident.lead = roles.lead;
            }
            if roles.qe.is_some() {
                s.qe = roles.qe;
            }
        })
    }

    async fn update_custom_fields(&self, update: &IncidentCustomFieldsUpdate) -> Result<(), DatabaseError> {
        self.update(update.id, |s| {
            if update.impact.is_some() {
                s.incident.impact = update.impact.clone();
            }
            if update.treatment.is_some() {
                s.treatment = update.treatment.clone();
            }
            if update.mitigator.is_some() {
                s.mitigator = update.mitigator.clone();
            }
        })?;

        let mut relations = self.relations.lock().unwrap();
        for kind in RelationKind::ALL {
            relations.insert((update.id, kind), distinct_ids(update.relation(kind)));
        }
        Ok(())
    }
}

/// Every lookup table holds `{1, "<table> 1"}` and `{2, "<table> 2"}`
pub struct StaticOptions;

#[async_trait]
impl OptionsRepository for StaticOptions {
    async fn list_active(&self, kind: OptionKind) -> Result<Vec<OptionItem>, DatabaseError> {
        Ok((1..=2)
            .map(|id| OptionItem {
                id,
                name: format!("{} {}", kind.table(), id),
            })
            .collect())
    }
}

/// Router wired to the in-memory repositories
pub struct TestApp {
    pub router: Router,
    pub incidents: Arc<InMemoryIncidents>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Must run inside a tokio runtime; the lazy pool is never connected.
    pub fn new() -> Self {
        let incidents = Arc::new(InMemoryIncidents::default());
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://firewatch@localhost/firewatch_test")
            .unwrap();

        let state = AppState {
            users: Arc::new(UserService::new(
                Arc::new(InMemoryUsers::default()),
                UserConfig::default(),
                4,
            )),
            incidents: Arc::new(IncidentService::new(
                incidents.clone(),
                "Investigating".to_string(),
                chrono_tz::America::Sao_Paulo,
            )),
            options: Arc::new(OptionsService::new(Arc::new(StaticOptions))),
            session: SessionSettings {
                jwt_secret: TEST_SECRET.to_string(),
                jwt_expiry_hours: 24,
                cookie_secure: false,
            },
            pool,
        };

        Self {
            router: app(state, &["http://localhost:5173".to_string()]),
            incidents,
        }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>, token: Option<&str>) -> TestResponse {
        let raw = body.map(|b| b.to_string());
        self.send_raw(method, uri, raw, token).await
    }

    pub async fn send_raw(&self, method: Method, uri: &str, body: Option<String>, token: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(raw) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(raw)
            }
            None => Body::empty(),
        };

        self.dispatch(builder.body(body).unwrap()).await
    }

    pub async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, headers, body }
    }

    /// Register and log in, returning the session token
    pub async fn login_as(&self, email: &str) -> String {
        let credentials = serde_json::json!({"name": "Jane", "email": email, "password": "secret123"});
        let registered = self.send(Method::POST, "/auth/register", Some(credentials.clone()), None).await;
        assert_eq!(registered.status, StatusCode::CREATED);

        let login = self.send(Method::POST, "/auth/login", Some(credentials), None).await;
        assert_eq!(login.status, StatusCode::OK);
        login.body["data"]["token"].as_str().unwrap().to_string()
    }
}
