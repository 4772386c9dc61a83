//! Database pool construction and startup schema creation

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::DatabaseConfig, error::AppResult};

pub type DbPool = Pool<Sqlite>;

/// Create the database connection pool.
///
/// The database file is created on first run. Foreign keys are enforced on
/// every connection so the books.author_id constraint actually holds.
pub async fn connect(config: &DatabaseConfig) -> AppResult<DbPool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create the authors and books tables if they do not exist yet.
///
/// There is no migration framework; the schema is small enough that the
/// initial table creation is the only DDL the server ever runs.
pub async fn init_schema(pool: &DbPool) -> AppResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            bio  TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            title            TEXT NOT NULL,
            summary          TEXT,
            publication_date DATE,
            author_id        INTEGER NOT NULL REFERENCES authors(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
