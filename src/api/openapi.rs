//! OpenAPI specification endpoints

use actix_web::{get, HttpResponse, Responder};
use utoipa::OpenApi;

/// OpenAPI documentation for the service
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::manuscript::create_manuscript,
        crate::api::manuscript::list_manuscripts,
        crate::api::manuscript::get_manuscript,
        crate::api::manuscript::detect,
        crate::api::audit::run_audit,
        crate::api::audit::get_analysis,
        crate::api::audit::get_history,
        crate::api::progress::get_progress,
        crate::api::health::liveness,
        crate::api::health::readiness,
    ),
    tags(
        (name = "manuscripts", description = "Manuscript registration and paper-type detection"),
        (name = "audits", description = "Audit execution and analysis retrieval"),
        (name = "progress", description = "Gamification progress"),
        (name = "health", description = "Health probes"),
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json);
}
