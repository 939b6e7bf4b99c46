use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use firewatch_api::config;
use firewatch_api::database::repositories::{PgIncidentRepository, PgOptionsRepository, PgUserRepository};
use firewatch_api::database::DatabaseManager;
use firewatch_api::router::{app, AppState, SessionSettings};
use firewatch_api::services::{IncidentService, OptionsService, UserService};
use firewatch_api::types::parse_timezone;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    info!("Starting Firewatch API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    if config.database.auto_migrate {
        DatabaseManager::migrate(&pool).await.context("failed to apply schema")?;
    }

    let timezone = parse_timezone(&config.incidents.timezone)?;

    let state = AppState {
        users: Arc::new(UserService::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            config.users.clone(),
            config.security.bcrypt_cost,
        )),
        incidents: Arc::new(IncidentService::new(
            Arc::new(PgIncidentRepository::new(pool.clone())),
            config.incidents.default_status.clone(),
            timezone,
        )),
        options: Arc::new(OptionsService::new(Arc::new(PgOptionsRepository::new(pool.clone())))),
        session: SessionSettings::from(&config.security),
        pool,
    };

    let app = app(state, &config.security.cors_origins);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Firewatch API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
