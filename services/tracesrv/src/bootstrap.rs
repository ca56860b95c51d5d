//! Service startup and the offline commands
//!
//! `serve` opens the database, builds the router and runs until a shutdown
//! signal. `check` and `create_user` share the same database setup.

use std::sync::Arc;

use common::shutdown::wait_for_shutdown;
use common::sqlite::SqliteClient;
use errors::{TraceError, TraceResult};
use tracing::info;

use crate::app_state::AppState;
use crate::auth::UserInfo;
use crate::config::Config;
use crate::routes::create_routes;
use crate::store::schema;

/// Open the configured database and create missing tables
pub async fn open_database(config: &Config) -> TraceResult<Arc<SqliteClient>> {
    let client = SqliteClient::new(&config.database.path)
        .await
        .map_err(|e| {
            TraceError::Database(format!(
                "Failed to open database {}: {}",
                config.database.path, e
            ))
        })?;
    schema::init_schema(client.pool()).await?;
    Ok(Arc::new(client))
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn serve(config: Config) -> TraceResult<()> {
    config.validate()?;
    let config = Arc::new(config);

    let sqlite_client = open_database(&config).await?;
    let state = Arc::new(AppState::new(config.clone(), sqlite_client.clone())?);
    let app = create_routes(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TraceError::Configuration(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("API server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            wait_for_shutdown().await;
        })
        .await
        .map_err(|e| TraceError::Internal(format!("Server error: {}", e)))?;

    sqlite_client.close().await;
    info!("tracesrv stopped");
    Ok(())
}

/// Summary printed by `tracesrv check`
#[derive(Debug)]
pub struct CheckReport {
    pub bind_addr: String,
    pub database: String,
    pub users: i64,
    pub vegetables: i64,
    pub dev_secret: bool,
}

/// Validate configuration and database connectivity
pub async fn check(config: &Config) -> TraceResult<CheckReport> {
    config.validate()?;
    let client = open_database(config).await?;
    client
        .ping()
        .await
        .map_err(|e| TraceError::Database(format!("Database ping failed: {}", e)))?;

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(client.pool())
        .await?;
    let vegetables: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vegetables")
        .fetch_one(client.pool())
        .await?;
    client.close().await;

    Ok(CheckReport {
        bind_addr: config.bind_addr(),
        database: config.database.path.clone(),
        users,
        vegetables,
        dev_secret: config.uses_dev_secret(),
    })
}

/// Register a user without going through the HTTP API
pub async fn create_user(
    config: Config,
    username: &str,
    password: &str,
    role: Option<&str>,
) -> TraceResult<UserInfo> {
    config.validate()?;
    let config = Arc::new(config);
    let client = open_database(&config).await?;
    let state = AppState::new(config, client.clone())?;

    let user = state.auth.register(username, password, role).await?;
    client.close().await;
    Ok(user.into())
}
