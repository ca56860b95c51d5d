//! Login and registration

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use common::SuccessResponse;
use errors::TraceResult;

use super::dto::{LoginRequest, RegisterRequest};
use super::ApiJson;
use crate::app_state::AppState;
use crate::auth::{AccessToken, UserInfo};

/// @route POST /auth/login (public)
/// @output 200 AccessToken, 401 on bad credentials
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> TraceResult<Json<SuccessResponse<AccessToken>>> {
    let token = state.auth.login(&req.username, &req.password).await?;
    Ok(Json(SuccessResponse::new(token)))
}

/// @route POST /auth/register (public)
/// @output 201 created user without its credential, 400 on duplicate username
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> TraceResult<(StatusCode, Json<SuccessResponse<UserInfo>>)> {
    let user = state
        .auth
        .register(&req.username, &req.password, req.role.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(UserInfo::from(user))),
    ))
}
