//! Authentication and authorization
//!
//! - [`password`]: Argon2 hashing with the legacy plaintext fallback
//! - [`jwt`]: access token issuing and verification
//! - [`gate`]: per-route request gate (authentication) and role gate
//! - [`service`]: registration and login

pub mod gate;
pub mod jwt;
pub mod password;
pub mod service;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::UserRecord;

pub use gate::{authenticate, authorize, RouteMetadata};
pub use jwt::{AccessToken, JwtManager};
pub use service::AuthService;

pub const DEFAULT_ROLE: &str = "user";
pub const ADMIN_ROLE: &str = "admin";

/// Token claims, attached to request extensions once verified
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,        // User ID
    pub username: String,   // Username
    pub roles: Vec<String>, // User roles
    pub exp: usize,         // Expiration time (as UTC timestamp)
    pub iat: usize,         // Issued at (as UTC timestamp)
    pub jti: Uuid,          // JWT ID (unique identifier)
}

/// User as exposed over the API; never carries the credential
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserInfo {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
