//! Per-route access control
//!
//! Every secured route carries a [`RouteMetadata`]. The request gate decides
//! whether a bearer token must be presented and verifies it; the role gate then
//! checks the verified roles against the route's requirement.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use errors::{TraceError, TraceResult};
use tracing::debug;

use super::{Claims, JwtManager};

const BEARER_PREFIX: &str = "Bearer ";

/// Access requirements declared when a route is registered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMetadata {
    pub is_public: bool,
    /// Any one of these roles grants access; empty means unrestricted
    pub required_roles: Vec<String>,
}

impl RouteMetadata {
    pub fn public() -> Self {
        Self {
            is_public: true,
            required_roles: Vec::new(),
        }
    }

    pub fn roles(roles: &[&str]) -> Self {
        Self {
            is_public: false,
            required_roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Retrieval methods pass the request gate without a token
pub fn is_read_only(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Request gate
///
/// Public routes and read-only methods pass without looking at the token, so
/// they never carry an identity. Everything else needs a valid bearer token.
pub fn authenticate(
    meta: &RouteMetadata,
    method: &Method,
    headers: &HeaderMap,
    jwt: &JwtManager,
) -> TraceResult<Option<Claims>> {
    if meta.is_public || is_read_only(method) {
        return Ok(None);
    }

    let token = bearer_token(headers)
        .ok_or_else(|| TraceError::unauthenticated("Missing bearer token"))?;
    jwt.verify(token).map(Some)
}

/// Role gate
pub fn authorize(required: &[String], roles: Option<&[String]>) -> TraceResult<()> {
    if required.is_empty() {
        return Ok(());
    }

    let roles = roles.ok_or(TraceError::LoginRequired)?;
    if roles.iter().any(|role| required.contains(role)) {
        Ok(())
    } else {
        Err(TraceError::InsufficientRole {
            required: required.to_vec(),
        })
    }
}

/// State handed to [`guard`] for one route
#[derive(Clone)]
pub struct GateContext {
    pub jwt: Arc<JwtManager>,
    pub meta: Arc<RouteMetadata>,
}

/// Middleware running both gates, then the handler
///
/// Verified claims are inserted into the request extensions.
pub async fn guard(
    State(ctx): State<GateContext>,
    mut req: Request,
    next: Next,
) -> Result<Response, TraceError> {
    let claims = authenticate(&ctx.meta, req.method(), req.headers(), &ctx.jwt)?;
    authorize(
        &ctx.meta.required_roles,
        claims.as_ref().map(|c| c.roles.as_slice()),
    )?;

    if let Some(claims) = claims {
        debug!("Request by user {} ({})", claims.username, claims.sub);
        req.extensions_mut().insert(claims);
    }

    Ok(next.run(req).await)
}
