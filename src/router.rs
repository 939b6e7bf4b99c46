use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::config::SecurityConfig;
use crate::database::manager::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{IncidentService, OptionsService, UserService};

/// Token and cookie parameters shared by login and the auth middleware
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cookie_secure: bool,
}

impl From<&SecurityConfig> for SessionSettings {
    fn from(security: &SecurityConfig) -> Self {
        Self {
            jwt_secret: security.jwt_secret.clone(),
            jwt_expiry_hours: security.jwt_expiry_hours,
            cookie_secure: security.cookie_secure,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub incidents: Arc<IncidentService>,
    pub options: Arc<OptionsService>,
    pub session: SessionSettings,
    pub pool: PgPool,
}

pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        .merge(options_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/register", post(auth::register_post))
        .route("/auth/login", post(auth::login_post))
}

fn options_routes() -> Router<AppState> {
    Router::new().route("/options/:kind", get(public::options_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::incidents;

    Router::new()
        .route("/users", get(protected::users_get))
        .route("/incidents", get(incidents::incidents_get))
        .route("/incidents/create", post(incidents::incident_create))
        .route("/incidents/:id", get(incidents::incident_get))
        .route("/incidents/update/summary", post(incidents::incident_update_summary))
        .route("/incidents/update/status", post(incidents::incident_update_status))
        .route("/incidents/update/severity", post(incidents::incident_update_severity))
        .route("/incidents/update/type", post(incidents::incident_update_type))
        .route("/incidents/update/roles", post(incidents::incident_update_roles))
        .route("/incidents/custom-fields", post(incidents::incident_custom_fields))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::HEAD,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .max_age(Duration::from_secs(300))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "error": false,
        "msg": "Firewatch API",
        "data": {
            "name": "Firewatch API",
            "version": version,
            "description": "Incident management backend",
            "endpoints": {
                "auth": "/auth/register, /auth/login (public)",
                "options": "/options/:kind (public)",
                "users": "/users (protected)",
                "incidents": "/incidents, /incidents/:id, /incidents/create (protected)",
                "updates": "/incidents/update/{summary,status,severity,type,roles}, /incidents/custom-fields (protected)",
                "health": "/health (public)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "error": false,
                "msg": "ok",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
