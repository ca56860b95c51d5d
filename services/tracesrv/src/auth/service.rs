use std::sync::Arc;

use errors::{TraceError, TraceResult};
use tracing::{info, warn};

use super::password::{self, Verification};
use super::{AccessToken, JwtManager, DEFAULT_ROLE};
use crate::store::{UserRecord, UserRepository};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Registration and login
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtManager>,
    rehash_legacy: bool,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt: Arc<JwtManager>, rehash_legacy: bool) -> Self {
        Self {
            users,
            jwt,
            rehash_legacy,
        }
    }

    pub fn jwt(&self) -> &Arc<JwtManager> {
        &self.jwt
    }

    /// Create a user with a salted credential
    ///
    /// `role` defaults to `"user"`.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> TraceResult<UserRecord> {
        let username = username.trim();
        if username.is_empty() {
            return Err(TraceError::BadRequest("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(TraceError::BadRequest("password must not be empty".to_string()));
        }
        let role = match role.map(str::trim) {
            Some("") => {
                return Err(TraceError::BadRequest("role must not be empty".to_string()));
            },
            Some(role) => role,
            None => DEFAULT_ROLE,
        };

        let hashed = hash_blocking(password.to_string()).await?;
        let user = self.users.create_user(username, &hashed, role).await?;
        info!("Registered user {} ({}) as {}", user.username, user.id, user.role);
        Ok(user)
    }

    /// Verify credentials and issue an access token
    pub async fn login(&self, username: &str, password: &str) -> TraceResult<AccessToken> {
        let username = username.trim();
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| TraceError::unauthenticated(INVALID_CREDENTIALS))?;

        let outcome = check_blocking(password.to_string(), user.password.clone()).await?;
        if !outcome.is_match() {
            return Err(TraceError::unauthenticated(INVALID_CREDENTIALS));
        }

        if outcome.is_degraded() {
            warn!(
                "User {} authenticated through the plaintext credential fallback ({:?})",
                user.id, outcome
            );
            if self.rehash_legacy {
                self.upgrade_credential(&user, password).await;
            }
        }

        self.jwt.issue(&user)
    }

    /// Replace a plaintext credential; failure never blocks the login
    async fn upgrade_credential(&self, user: &UserRecord, password: &str) {
        let result = match hash_blocking(password.to_string()).await {
            Ok(hashed) => self.users.update_password(user.id, &hashed).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!("Upgraded credential of user {} to a salted hash", user.id),
            Err(e) => warn!("Could not upgrade credential of user {}: {}", user.id, e),
        }
    }
}

// Argon2 runs on the blocking pool
async fn hash_blocking(plaintext: String) -> TraceResult<String> {
    tokio::task::spawn_blocking(move || password::hash(&plaintext))
        .await
        .map_err(|e| TraceError::Internal(format!("hashing task failed: {}", e)))?
}

async fn check_blocking(plaintext: String, stored: String) -> TraceResult<Verification> {
    tokio::task::spawn_blocking(move || password::check(&plaintext, &stored))
        .await
        .map_err(|e| TraceError::Internal(format!("verification task failed: {}", e)))
}
