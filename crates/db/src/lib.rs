//! PostgreSQL persistence for the restaurant backend: pool setup,
//! migrations, row models, repositories, and [`PgBackend`], the database
//! implementation of the core cart and order backend traits.

use sqlx::postgres::PgPoolOptions;

pub mod backend;
pub mod models;
pub mod repositories;

pub use backend::PgBackend;

pub type DbPool = sqlx::PgPool;

/// Default pool size when `DB_MAX_CONNECTIONS` is not set.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// SQLSTATE for unique constraint violations.
pub const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for foreign key violations.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";

/// The violated constraint name when `err` is a database error with the
/// given SQLSTATE.
pub fn violated_constraint<'e>(err: &'e sqlx::Error, sqlstate: &str) -> Option<&'e str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(sqlstate) => {
            Some(db_err.constraint().unwrap_or("unknown"))
        }
        _ => None,
    }
}
