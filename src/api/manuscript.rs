//! REST API endpoints for manuscripts and paper-type detection

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::error::ApiError;
use crate::db::repository::ManuscriptRepository;
use crate::model::{DetectionResult, Manuscript, PaperType};
use crate::service::detection::detect_paper_type;

/// Request body for registering a manuscript
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateManuscriptRequest {
    pub owner_id: String,
    pub title: String,
    /// Plain manuscript text; extraction from source documents happens
    /// before this endpoint
    pub text: String,
    /// Explicit paper type; when absent the detector picks one
    pub paper_type: Option<PaperType>,
}

/// Response for a registered manuscript
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateManuscriptResponse {
    pub id: String,
    pub paper_type: PaperType,
    /// Present when the paper type was auto-detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<DetectionResult>,
}

/// Summary of a manuscript for list responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManuscriptSummary {
    pub id: String,
    pub title: String,
    pub paper_type: PaperType,
    pub created_at: String,
}

/// Query parameters for listing manuscripts
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListManuscriptsParams {
    /// Owner whose manuscripts to list
    pub owner_id: String,
    /// Maximum number of manuscripts (default: 20, max: 100)
    pub limit: Option<i64>,
}

/// Register a manuscript for auditing
#[utoipa::path(
    post,
    path = "/v1/manuscripts",
    request_body = CreateManuscriptRequest,
    responses(
        (status = 201, description = "Manuscript registered", body = CreateManuscriptResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "manuscripts"
)]
#[post("/v1/manuscripts")]
pub async fn create_manuscript(
    repository: web::Data<ManuscriptRepository>,
    body: web::Json<CreateManuscriptRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Manuscript text is empty".to_string()));
    }

    let (paper_type, detection) = match body.paper_type {
        Some(explicit) => (explicit, None),
        None => {
            let result = detect_paper_type(&body.text);
            (result.detected_type, Some(result))
        }
    };

    let manuscript = Manuscript::new(body.owner_id, body.title, body.text, paper_type);
    repository.upsert(&manuscript).await?;

    tracing::info!(
        id = %manuscript.id,
        paper_type = paper_type.as_str(),
        detected = detection.is_some(),
        "Manuscript registered"
    );

    Ok(HttpResponse::Created().json(CreateManuscriptResponse {
        id: manuscript.id,
        paper_type,
        detection,
    }))
}

/// List a user's manuscripts
#[utoipa::path(
    get,
    path = "/v1/manuscripts",
    params(ListManuscriptsParams),
    responses(
        (status = 200, description = "Manuscripts retrieved", body = [ManuscriptSummary]),
        (status = 500, description = "Internal server error")
    ),
    tag = "manuscripts"
)]
#[get("/v1/manuscripts")]
pub async fn list_manuscripts(
    repository: web::Data<ManuscriptRepository>,
    query: web::Query<ListManuscriptsParams>,
) -> Result<HttpResponse, ApiError> {
    let manuscripts = repository
        .list_for_owner(&query.owner_id, query.limit)
        .await?;

    let summaries: Vec<ManuscriptSummary> = manuscripts
        .into_iter()
        .map(|m| ManuscriptSummary {
            id: m.id,
            title: m.title,
            paper_type: m.paper_type,
            created_at: m.created_at.to_rfc3339(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(summaries))
}

/// Get a manuscript by ID
#[utoipa::path(
    get,
    path = "/v1/manuscripts/{id}",
    params(
        ("id" = String, Path, description = "Manuscript ID (content hash)")
    ),
    responses(
        (status = 200, description = "Manuscript retrieved", body = Manuscript),
        (status = 404, description = "Manuscript not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "manuscripts"
)]
#[get("/v1/manuscripts/{id}")]
pub async fn get_manuscript(
    repository: web::Data<ManuscriptRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let manuscript = repository
        .get_by_id(&id)
        .await
        .map_err(|e| match e {
            crate::db::DbError::NotFound(id) => ApiError::ManuscriptNotFound(id),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(manuscript))
}

/// Request body for standalone paper-type detection
#[derive(Debug, Deserialize, ToSchema)]
pub struct DetectRequest {
    pub text: String,
}

/// Detect the paper type of supplied text
#[utoipa::path(
    post,
    path = "/v1/detect",
    request_body = DetectRequest,
    responses(
        (status = 200, description = "Detection result", body = DetectionResult)
    ),
    tag = "manuscripts"
)]
#[post("/v1/detect")]
pub async fn detect(body: web::Json<DetectRequest>) -> impl Responder {
    HttpResponse::Ok().json(detect_paper_type(&body.text))
}

/// Configure manuscript routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_manuscript)
        .service(list_manuscripts)
        .service(get_manuscript)
        .service(detect);
}
