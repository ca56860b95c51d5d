use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Claims;
use crate::store::UserRecord;
use errors::{TraceError, TraceResult};

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Body returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until expiry
    pub expires_in: i64,
}

/// Signs and verifies access tokens with a server-held secret
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue an access token for a verified user
    ///
    /// The user's single role becomes a one-element `roles` claim.
    pub fn issue(&self, user: &UserRecord) -> TraceResult<AccessToken> {
        let now = Utc::now();
        let exp = now.checked_add_signed(self.ttl).ok_or_else(|| {
            TraceError::Internal(format!("Token lifetime out of range: {}", self.ttl))
        })?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            roles: vec![user.role.clone()],
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4(),
        };

        let access_token = self.sign(&claims)?;
        Ok(AccessToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl.num_seconds(),
        })
    }

    pub fn sign(&self, claims: &Claims) -> TraceResult<String> {
        encode(&Header::new(JWT_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| TraceError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate signature and expiry, then return the claims
    pub fn verify(&self, token: &str) -> TraceResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TraceError::unauthenticated("Token expired"),
                _ => TraceError::unauthenticated(format!("Invalid token: {}", e)),
            })
    }
}
