//! Application state shared by all handlers

use std::sync::Arc;

use common::sqlite::SqliteClient;
use errors::TraceResult;
use tracing::info;

use crate::auth::{AuthService, JwtManager};
use crate::config::Config;
use crate::store::{SqliteStore, VegetableRepository};

pub struct AppState {
    pub config: Arc<Config>,

    /// Connection pool behind the repositories
    pub sqlite_client: Arc<SqliteClient>,

    pub auth: Arc<AuthService>,

    pub vegetables: Arc<dyn VegetableRepository>,
}

impl AppState {
    /// Wire the SQLite store, token manager and auth service together
    ///
    /// The schema must already exist. Fails when the configured token
    /// lifetime cannot be represented.
    pub fn new(config: Arc<Config>, sqlite_client: Arc<SqliteClient>) -> TraceResult<Self> {
        let store = Arc::new(SqliteStore::new(sqlite_client.pool().clone()));
        let jwt = Arc::new(JwtManager::new(&config.auth.jwt_secret, config.token_ttl()?));
        let auth = Arc::new(AuthService::new(
            store.clone(),
            jwt,
            config.auth.rehash_legacy_passwords,
        ));

        info!(
            "App state ready: db={}, token ttl={}m",
            sqlite_client.path(),
            config.auth.token_ttl_minutes
        );

        Ok(Self {
            config,
            sqlite_client,
            auth,
            vegetables: store,
        })
    }

    pub fn jwt(&self) -> &Arc<JwtManager> {
        self.auth.jwt()
    }
}
