//! Persistence
//!
//! Handlers and the auth service only see the repository traits; [`SqliteStore`]
//! implements both over one connection pool.

pub mod schema;
mod users;
mod vegetables;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::sqlite::SqlitePool;
use errors::TraceResult;
use serde::{Deserialize, Serialize};

use crate::vegetables::{NewVegetable, Vegetable, VegetableEdit};

/// Stored user row, credential included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Salted hash, or the raw password on legacy rows
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> TraceResult<Option<UserRecord>>;

    /// Insert a user unless the username is taken (`DuplicateUser`)
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> TraceResult<UserRecord>;

    async fn update_password(&self, id: i64, password_hash: &str) -> TraceResult<()>;
}

#[async_trait]
pub trait VegetableRepository: Send + Sync {
    async fn list(&self) -> TraceResult<Vec<Vegetable>>;

    async fn get(&self, id: i64) -> TraceResult<Vegetable>;

    async fn create(&self, new: &NewVegetable) -> TraceResult<Vegetable>;

    /// Read, apply and write back one edit atomically
    async fn edit(&self, id: i64, edit: &VegetableEdit) -> TraceResult<Vegetable>;

    async fn delete(&self, id: i64) -> TraceResult<()>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables if missing
    pub async fn init_schema(&self) -> TraceResult<()> {
        schema::init_schema(&self.pool).await
    }
}
