use async_trait::async_trait;
use chrono::Utc;
use errors::{TraceError, TraceResult};

use super::{SqliteStore, UserRecord, UserRepository};

const USER_COLUMNS: &str = "id, username, password, role, created_at";

#[async_trait]
impl UserRepository for SqliteStore {
    async fn find_by_username(&self, username: &str) -> TraceResult<Option<UserRecord>> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
        let user = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: &str,
    ) -> TraceResult<UserRecord> {
        // Existence check and insert in one statement
        let sql = format!(
            r#"
            INSERT INTO users (username, password, role, created_at)
            SELECT ?, ?, ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM users WHERE username = ?)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let inserted = sqlx::query_as::<_, UserRecord>(&sql)
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .bind(Utc::now())
            .bind(username)
            .fetch_optional(self.pool())
            .await;

        match inserted {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(TraceError::DuplicateUser(username.to_string())),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(TraceError::DuplicateUser(username.to_string()))
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> TraceResult<()> {
        let result = sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(TraceError::not_found(format!("user {}", id)));
        }
        Ok(())
    }
}
