//! REST API endpoints for running audits and reading analyses

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::db::repository::{ManuscriptRepository, ProgressRepository};
use crate::db::DbError;
use crate::model::{UserProgress, ValidatedAnalysis};
use crate::service::gamification::{advance_streak, audit_xp, level_for_xp};
use crate::service::{AuditService, RateLimiter};

/// Request body for running an audit
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunAuditRequest {
    pub user_id: String,
    /// Focus areas requested for this audit, e.g. "Methods" or
    /// "Comprehensive Review"
    #[serde(default)]
    pub help_types: Vec<String>,
}

/// Response for a completed audit
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunAuditResponse {
    #[serde(flatten)]
    pub analysis: ValidatedAnalysis,
    pub progress: UserProgress,
}

/// One history entry for trend display
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub readiness_score: i32,
    pub created_at: String,
}

/// Run an audit for a manuscript
///
/// Rate-limited per user. Persists the validated analysis as the current
/// snapshot, appends to the history log, and updates the user's
/// gamification progress.
#[utoipa::path(
    post,
    path = "/v1/manuscripts/{id}/audit",
    params(
        ("id" = String, Path, description = "Manuscript ID")
    ),
    request_body = RunAuditRequest,
    responses(
        (status = 200, description = "Audit completed", body = RunAuditResponse),
        (status = 404, description = "Manuscript not found"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 502, description = "LLM call failed")
    ),
    tag = "audits"
)]
#[post("/v1/manuscripts/{id}/audit")]
pub async fn run_audit(
    manuscripts: web::Data<ManuscriptRepository>,
    progress_repo: web::Data<ProgressRepository>,
    audit_service: web::Data<AuditService>,
    rate_limiter: web::Data<RateLimiter>,
    path: web::Path<String>,
    body: web::Json<RunAuditRequest>,
) -> Result<HttpResponse, ApiError> {
    let manuscript_id = path.into_inner();
    let body = body.into_inner();

    if !rate_limiter.check(&body.user_id) {
        return Err(ApiError::RateLimited(body.user_id));
    }

    let manuscript = manuscripts
        .get_by_id(&manuscript_id)
        .await
        .map_err(|e| match e {
            DbError::NotFound(id) => ApiError::ManuscriptNotFound(id),
            other => other.into(),
        })?;

    let validated = audit_service.audit(&manuscript, &body.help_types).await?;

    manuscripts.store_analysis(&manuscript.id, &validated).await?;

    let progress = award_progress(
        &progress_repo,
        &body.user_id,
        manuscript.content.len(),
        &body.help_types,
        validated.response.readiness_score,
    )
    .await?;

    Ok(HttpResponse::Ok().json(RunAuditResponse {
        analysis: validated,
        progress,
    }))
}

/// Apply the gamification accumulators to a user's persisted progress
async fn award_progress(
    progress_repo: &ProgressRepository,
    user_id: &str,
    text_length: usize,
    help_types: &[String],
    readiness_score: i64,
) -> Result<UserProgress, ApiError> {
    let mut progress = progress_repo.get_or_default(user_id).await?;

    let earned = audit_xp(text_length, help_types, Some(readiness_score));
    progress.xp += i64::from(earned);
    progress.level = level_for_xp(progress.xp);

    let update = advance_streak(progress.last_active_date.as_deref(), progress.streak);
    progress.streak = update.streak;
    progress.last_active_date = Some(update.date);

    progress_repo.upsert(&progress).await?;

    tracing::info!(
        user_id = %user_id,
        earned_xp = earned,
        total_xp = progress.xp,
        level = progress.level,
        streak = progress.streak,
        "Awarded audit progress"
    );

    Ok(progress)
}

/// Get the current analysis snapshot for a manuscript
#[utoipa::path(
    get,
    path = "/v1/manuscripts/{id}/analysis",
    params(
        ("id" = String, Path, description = "Manuscript ID")
    ),
    responses(
        (status = 200, description = "Current analysis", body = ValidatedAnalysis),
        (status = 404, description = "No analysis for this manuscript")
    ),
    tag = "audits"
)]
#[get("/v1/manuscripts/{id}/analysis")]
pub async fn get_analysis(
    manuscripts: web::Data<ManuscriptRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let analysis = manuscripts.get_analysis(&id).await.map_err(|e| match e {
        DbError::NotFound(id) => ApiError::AnalysisNotFound(id),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(analysis))
}

/// Get the audit score history for a manuscript
#[utoipa::path(
    get,
    path = "/v1/manuscripts/{id}/analysis/history",
    params(
        ("id" = String, Path, description = "Manuscript ID")
    ),
    responses(
        (status = 200, description = "Score history, oldest first", body = [HistoryEntry])
    ),
    tag = "audits"
)]
#[get("/v1/manuscripts/{id}/analysis/history")]
pub async fn get_history(
    manuscripts: web::Data<ManuscriptRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let entries: Vec<HistoryEntry> = manuscripts
        .analysis_history(&id)
        .await?
        .into_iter()
        .map(|row| HistoryEntry {
            readiness_score: row.readiness_score,
            created_at: row.created_at.to_rfc3339(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(entries))
}

/// Configure audit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(run_audit).service(get_analysis).service(get_history);
}
