//! Service configuration
//!
//! Layered with figment: built-in defaults, then an optional config file
//! (TOML, YAML or JSON by extension), then `TRACESRV_` environment variables
//! where `__` separates nested keys (`TRACESRV_AUTH__JWT_SECRET`).

use std::path::Path;

use errors::{TraceError, TraceResult};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "tracesrv.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TRACESRV_";

/// Secret shipped in the defaults; startup warns while it is still in use
pub const DEV_JWT_SECRET: &str = "tracesrv-dev-secret-change-this-in-production";

/// Longest accepted access token lifetime (one year)
pub const MAX_TOKEN_TTL_MINUTES: u64 = 525_600;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub log: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/tracesrv.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Access token lifetime
    pub token_ttl_minutes: u64,
    /// Replace plaintext credentials with a salted hash on successful login
    pub rehash_legacy_passwords: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_minutes: 60,
            rehash_legacy_passwords: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,
    pub json: bool,
    /// Daily-rolling log file directory; console only when unset
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            dir: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults, file and environment
    pub fn load(path: Option<&Path>) -> TraceResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        figment = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(TraceError::Configuration(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                match path.extension().and_then(|ext| ext.to_str()) {
                    Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
                    Some("json") => figment.merge(Json::file(path)),
                    _ => figment.merge(Toml::file(path)),
                }
            },
            None => figment.merge(Toml::file(DEFAULT_CONFIG_FILE)),
        };

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| TraceError::Configuration(e.to_string()))?;

        Ok(config)
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> TraceResult<()> {
        if self.server.port == 0 {
            return Err(TraceError::Configuration(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(TraceError::Configuration(
                "database.path must not be empty".to_string(),
            ));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(TraceError::Configuration(
                "auth.jwt_secret must not be empty".to_string(),
            ));
        }
        if self.auth.token_ttl_minutes == 0 {
            return Err(TraceError::Configuration(
                "auth.token_ttl_minutes must be at least 1".to_string(),
            ));
        }
        if self.auth.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(TraceError::Configuration(format!(
                "auth.token_ttl_minutes must be at most {}",
                MAX_TOKEN_TTL_MINUTES
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Token lifetime as a duration; errors when it does not fit one
    pub fn token_ttl(&self) -> TraceResult<chrono::Duration> {
        i64::try_from(self.auth.token_ttl_minutes)
            .ok()
            .and_then(chrono::Duration::try_minutes)
            .ok_or_else(|| {
                TraceError::Configuration(format!(
                    "auth.token_ttl_minutes out of range: {}",
                    self.auth.token_ttl_minutes
                ))
            })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}
