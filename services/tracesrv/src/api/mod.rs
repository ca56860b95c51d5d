//! HTTP handlers

pub mod auth_handlers;
pub mod dto;
pub mod health_handlers;
pub mod vegetable_handlers;

use axum::extract::{FromRequest, FromRequestParts};
use errors::TraceError;

/// JSON body whose rejections use the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(TraceError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose rejections use the error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(TraceError))]
pub struct ApiPath<T>(pub T);
