//! Vegetable inventory handlers
//!
//! Reads are open to anonymous callers; writes arrive here only after the
//! gate has verified a token, so `Claims` is present in the extensions.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, Extension};
use common::SuccessResponse;
use errors::TraceResult;
use tracing::info;

use super::dto::DeletedResponse;
use super::{ApiJson, ApiPath};
use crate::app_state::AppState;
use crate::auth::Claims;
use crate::vegetables::{NewVegetable, Vegetable, VegetableEdit};

/// @route GET /vegetables
pub async fn list_vegetables(
    State(state): State<Arc<AppState>>,
) -> TraceResult<Json<SuccessResponse<Vec<Vegetable>>>> {
    let vegetables = state.vegetables.list().await?;
    let total = vegetables.len();
    Ok(Json(
        SuccessResponse::new(vegetables).with_metadata("total", serde_json::Value::from(total)),
    ))
}

/// @route GET /vegetables/{id}
pub async fn get_vegetable(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> TraceResult<Json<SuccessResponse<Vegetable>>> {
    let vegetable = state.vegetables.get(id).await?;
    Ok(Json(SuccessResponse::new(vegetable)))
}

/// @route POST /vegetables
pub async fn create_vegetable(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiJson(new): ApiJson<NewVegetable>,
) -> TraceResult<(StatusCode, Json<SuccessResponse<Vegetable>>)> {
    let vegetable = state.vegetables.create(&new).await?;
    info!(
        "User {} created vegetable {} ({})",
        claims.username, vegetable.id, vegetable.name
    );
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(vegetable))))
}

/// @route PATCH /vegetables/{id}
/// @input VegetableEdit, e.g. `{"type": "inc_quantity", "by": 5}`
pub async fn edit_vegetable(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(edit): ApiJson<VegetableEdit>,
) -> TraceResult<Json<SuccessResponse<Vegetable>>> {
    let vegetable = state.vegetables.edit(id, &edit).await?;
    info!("User {} applied {} to vegetable {}", claims.username, edit.kind(), id);
    Ok(Json(SuccessResponse::new(vegetable)))
}

/// @route DELETE /vegetables/{id} (admin)
pub async fn delete_vegetable(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    ApiPath(id): ApiPath<i64>,
) -> TraceResult<Json<SuccessResponse<DeletedResponse>>> {
    state.vegetables.delete(id).await?;
    info!("User {} deleted vegetable {}", claims.username, id);
    Ok(Json(SuccessResponse::new(DeletedResponse { deleted: id })))
}
