//! Table definitions

use common::sqlite::SqlitePool;
use errors::TraceResult;
use tracing::debug;

pub const USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL
    )
"#;

pub const VEGETABLES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS vegetables (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 0
    )
"#;

pub async fn init_schema(pool: &SqlitePool) -> TraceResult<()> {
    debug!("Init tracesrv tables");

    for ddl in [USERS_TABLE, VEGETABLES_TABLE] {
        sqlx::query(ddl).execute(pool).await?;
    }

    Ok(())
}
