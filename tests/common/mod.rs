use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub const DATABASE_ENV: &str = "FIREWATCH_TEST_DATABASE_URL";

// Held while a server boots so schema bootstrap never runs twice at once.
static STARTUP: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// A server process owned by one test; dropping it kills the process.
pub struct TestServer {
    pub base_url: String,
    pub database_url: String,
    child: Child,
}

impl TestServer {
    fn spawn(database_url: String) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_firewatch-api"));
        cmd.env("APP_ENV", "development")
            .env("HOST", "127.0.0.1")
            .env("PORT", port.to_string())
            .env("DATABASE_URL", &database_url)
            .env("DATABASE_AUTO_MIGRATE", "true")
            .env("SECURITY_BCRYPT_COST", "4")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            base_url,
            database_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn pool(&self) -> Result<PgPool> {
        Ok(PgPoolOptions::new()
            .max_connections(2)
            .connect(&self.database_url)
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn a server for the calling test and await it. `None` when no test database is configured.
pub async fn ensure_server() -> Result<Option<TestServer>> {
    let Ok(database_url) = std::env::var(DATABASE_ENV) else {
        eprintln!("{} not set, skipping", DATABASE_ENV);
        return Ok(None);
    };

    let _startup = STARTUP.lock().await;
    let server = TestServer::spawn(database_url)?;
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(Some(server))
}

/// Email that no earlier run has registered
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{}-{}@firewatch.test", prefix, nanos)
}

/// Client with a cookie store, registered and logged in
pub async fn logged_in_client(server: &TestServer, prefix: &str) -> Result<(reqwest::Client, Value)> {
    let client = reqwest::Client::builder().cookie_store(true).build()?;
    let credentials = json!({"name": "Integration", "email": unique_email(prefix), "password": "secret123"});

    let res = client.post(server.url("/auth/register")).json(&credentials).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.post(server.url("/auth/login")).json(&credentials).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    Ok((client, body["data"].clone()))
}

/// Insert an active lookup row and return its id
pub async fn insert_option(pool: &PgPool, table: &str, name: &str) -> Result<i32> {
    let id = sqlx::query_scalar::<_, i32>(&format!("INSERT INTO {} (name) VALUES ($1) RETURNING id", table))
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}
