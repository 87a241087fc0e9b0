//! Database module for PostgreSQL persistence

pub mod models;
pub mod repository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

// Environment variable names
const ENV_POSTGRES_HOST: &str = "PAPERAUDIT_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "PAPERAUDIT_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "PAPERAUDIT_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "PAPERAUDIT_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "PAPERAUDIT_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "paperaudit";
const DEFAULT_POSTGRES_PASSWORD: &str = "paperaudit";
const DEFAULT_POSTGRES_DB: &str = "paperaudit";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS manuscripts (
            id VARCHAR(64) PRIMARY KEY,
            owner_id VARCHAR(128) NOT NULL,
            title TEXT NOT NULL,
            paper_type VARCHAR(40) NOT NULL,
            content TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Current analysis snapshot, one per manuscript
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analysis_snapshots (
            manuscript_id VARCHAR(64) PRIMARY KEY REFERENCES manuscripts(id) ON DELETE CASCADE,
            payload JSONB NOT NULL,
            warnings JSONB NOT NULL DEFAULT '[]',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Append-only audit history for trend display
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analysis_history (
            id BIGSERIAL PRIMARY KEY,
            manuscript_id VARCHAR(64) NOT NULL REFERENCES manuscripts(id) ON DELETE CASCADE,
            readiness_score INT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_progress (
            user_id VARCHAR(128) PRIMARY KEY,
            xp BIGINT NOT NULL DEFAULT 0,
            level INT NOT NULL DEFAULT 1,
            streak INT NOT NULL DEFAULT 0,
            last_active_date VARCHAR(10)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_manuscripts_owner_id ON manuscripts(owner_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_analysis_history_manuscript_id ON analysis_history(manuscript_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
