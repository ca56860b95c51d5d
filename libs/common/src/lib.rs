//! Shared runtime plumbing for tracesrv
//!
//! - logging initialisation
//! - graceful shutdown signal
//! - SQLite connection pool
//! - API response envelope

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod api_types;
pub mod logging;
pub mod shutdown;

pub use api_types::SuccessResponse;
