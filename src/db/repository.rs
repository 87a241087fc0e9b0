//! Repositories for manuscript, analysis, and progress persistence

use sqlx::PgPool;

use super::models::{AnalysisHistoryRow, AnalysisSnapshotRow, ManuscriptRow, UserProgressRow};
use super::DbError;
use crate::model::{Manuscript, UserProgress, ValidatedAnalysis};

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

/// Repository for manuscript and analysis operations
#[derive(Clone)]
pub struct ManuscriptRepository {
    pool: PgPool,
}

impl ManuscriptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update a manuscript
    pub async fn upsert(&self, manuscript: &Manuscript) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO manuscripts (id, owner_id, title, paper_type, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                owner_id = EXCLUDED.owner_id,
                title = EXCLUDED.title,
                paper_type = EXCLUDED.paper_type
            "#,
        )
        .bind(&manuscript.id)
        .bind(&manuscript.owner_id)
        .bind(&manuscript.title)
        .bind(manuscript.paper_type.as_str())
        .bind(&manuscript.content)
        .bind(manuscript.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %manuscript.id, "Upserted manuscript");
        Ok(())
    }

    /// Get a manuscript by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Manuscript, DbError> {
        let row: ManuscriptRow = sqlx::query_as(
            r#"
            SELECT * FROM manuscripts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        Ok(row.into_domain())
    }

    /// List a user's manuscripts, most recent first
    pub async fn list_for_owner(
        &self,
        owner_id: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Manuscript>, DbError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);

        let rows: Vec<ManuscriptRow> = sqlx::query_as(
            r#"
            SELECT * FROM manuscripts
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ManuscriptRow::into_domain).collect())
    }

    /// Store a validated analysis as the manuscript's current snapshot and
    /// append it to the history log. A re-audit replaces the snapshot; the
    /// history row is never updated in place.
    pub async fn store_analysis(
        &self,
        manuscript_id: &str,
        analysis: &ValidatedAnalysis,
    ) -> Result<(), DbError> {
        let payload = serde_json::to_value(&analysis.response)
            .map_err(|e| DbError::Serialization(e.to_string()))?;
        let warnings = serde_json::to_value(&analysis.warnings)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO analysis_snapshots (manuscript_id, payload, warnings, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (manuscript_id) DO UPDATE SET
                payload = EXCLUDED.payload,
                warnings = EXCLUDED.warnings,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(manuscript_id)
        .bind(&payload)
        .bind(&warnings)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO analysis_history (manuscript_id, readiness_score)
            VALUES ($1, $2)
            "#,
        )
        .bind(manuscript_id)
        .bind(analysis.response.readiness_score as i32)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            manuscript_id = %manuscript_id,
            readiness_score = analysis.response.readiness_score,
            "Stored analysis snapshot"
        );
        Ok(())
    }

    /// Get the current analysis snapshot for a manuscript
    pub async fn get_analysis(&self, manuscript_id: &str) -> Result<ValidatedAnalysis, DbError> {
        let row: AnalysisSnapshotRow = sqlx::query_as(
            r#"
            SELECT * FROM analysis_snapshots WHERE manuscript_id = $1
            "#,
        )
        .bind(manuscript_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(manuscript_id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List history entries for a manuscript, oldest first for trend display
    pub async fn analysis_history(
        &self,
        manuscript_id: &str,
    ) -> Result<Vec<AnalysisHistoryRow>, DbError> {
        let rows: Vec<AnalysisHistoryRow> = sqlx::query_as(
            r#"
            SELECT * FROM analysis_history
            WHERE manuscript_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(manuscript_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Repository for user gamification progress
#[derive(Clone)]
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's progress, or fresh progress if none is recorded yet
    pub async fn get_or_default(&self, user_id: &str) -> Result<UserProgress, DbError> {
        let row: Option<UserProgressRow> = sqlx::query_as(
            r#"
            SELECT * FROM user_progress WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(UserProgressRow::into_domain)
            .unwrap_or_else(|| UserProgress::new(user_id.to_string())))
    }

    /// Persist a user's progress
    pub async fn upsert(&self, progress: &UserProgress) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO user_progress (user_id, xp, level, streak, last_active_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                xp = EXCLUDED.xp,
                level = EXCLUDED.level,
                streak = EXCLUDED.streak,
                last_active_date = EXCLUDED.last_active_date
            "#,
        )
        .bind(&progress.user_id)
        .bind(progress.xp)
        .bind(progress.level)
        .bind(progress.streak)
        .bind(&progress.last_active_date)
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id = %progress.user_id, xp = progress.xp, "Upserted user progress");
        Ok(())
    }
}
