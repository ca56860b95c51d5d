//! API route table
//!
//! Every route is registered through [`SecuredRouter::route`] together with its
//! [`RouteMetadata`], which wraps the method router in the access gate.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{auth_handlers, health_handlers, vegetable_handlers};
use crate::app_state::AppState;
use crate::auth::gate::{guard, GateContext};
use crate::auth::{JwtManager, RouteMetadata, ADMIN_ROLE};

/// Router builder that attaches access metadata to each registration
pub struct SecuredRouter {
    router: Router<Arc<AppState>>,
    jwt: Arc<JwtManager>,
}

impl SecuredRouter {
    pub fn new(jwt: Arc<JwtManager>) -> Self {
        Self {
            router: Router::new(),
            jwt,
        }
    }

    /// Register `method_router` at `path` behind the gate for `meta`
    ///
    /// Several calls with the same path merge their methods, each keeping its
    /// own metadata.
    pub fn route(
        mut self,
        path: &str,
        method_router: MethodRouter<Arc<AppState>>,
        meta: RouteMetadata,
    ) -> Self {
        let ctx = GateContext {
            jwt: self.jwt.clone(),
            meta: Arc::new(meta),
        };
        self.router = self.router.route(
            path,
            method_router.route_layer(middleware::from_fn_with_state(ctx, guard)),
        );
        self
    }

    pub fn into_router(self) -> Router<Arc<AppState>> {
        self.router
    }
}

/// Build the complete application router
pub fn create_routes(state: Arc<AppState>) -> Router {
    SecuredRouter::new(state.jwt().clone())
        // Health
        .route(
            "/health",
            get(health_handlers::health_check),
            RouteMetadata::public(),
        )
        // Auth
        .route(
            "/auth/login",
            post(auth_handlers::login),
            RouteMetadata::public(),
        )
        .route(
            "/auth/register",
            post(auth_handlers::register),
            RouteMetadata::public(),
        )
        // Vegetables
        .route(
            "/vegetables",
            get(vegetable_handlers::list_vegetables),
            RouteMetadata::default(),
        )
        .route(
            "/vegetables",
            post(vegetable_handlers::create_vegetable),
            RouteMetadata::default(),
        )
        .route(
            "/vegetables/{id}",
            get(vegetable_handlers::get_vegetable),
            RouteMetadata::default(),
        )
        .route(
            "/vegetables/{id}",
            patch(vegetable_handlers::edit_vegetable),
            RouteMetadata::default(),
        )
        .route(
            "/vegetables/{id}",
            delete(vegetable_handlers::delete_vegetable),
            RouteMetadata::roles(&[ADMIN_ROLE]),
        )
        .into_router()
        .layer(middleware::from_fn(common::logging::http_request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
