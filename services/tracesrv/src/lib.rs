//! tracesrv: traceability inventory service
//!
//! Vegetable inventory over HTTP with token authentication, a per-route
//! role gate and typed edit operations, backed by SQLite.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod routes;
pub mod store;
pub mod vegetables;

pub use app_state::AppState;
pub use config::Config;
pub use routes::create_routes;
pub use vegetables::{NewVegetable, Vegetable, VegetableEdit};
