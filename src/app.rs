//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::{ManuscriptRepository, ProgressRepository};
use crate::model::Config;
use crate::service::{AuditService, LlmClient, RateLimiter};

/// Application state containing all services and shared resources
///
/// This struct centralizes service initialization and makes it easy to inject
/// dependencies into Actix-web handlers.
pub struct AppState {
    /// Database connection pool
    pub db_pool: Arc<PgPool>,
    /// Manuscript and analysis persistence
    pub manuscripts: ManuscriptRepository,
    /// Gamification progress persistence
    pub progress: ProgressRepository,
    /// LLM-backed audit service
    pub audit_service: Arc<AuditService>,
    /// Per-user audit rate limiter
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. LLM client initialization (requires OPENAI_API_KEY)
    /// 3. Service dependency graph construction
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        let llm_client =
            LlmClient::from_env().map_err(|_| AppError::MissingConfig("OPENAI_API_KEY"))?;

        let manuscripts = ManuscriptRepository::new(db_pool.clone());
        let progress = ProgressRepository::new(db_pool.clone());
        let audit_service = Arc::new(AuditService::new(llm_client));
        let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));

        Ok(Self {
            db_pool: Arc::new(db_pool),
            manuscripts,
            progress,
            audit_service,
            rate_limiter,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(&'static str),
}
