//! REST API endpoint for user gamification progress

use actix_web::{get, web, HttpResponse};

use crate::api::error::ApiError;
use crate::db::repository::ProgressRepository;
use crate::model::UserProgress;

/// Get a user's XP, level, and streak
///
/// Users with no recorded activity get fresh level-1 progress.
#[utoipa::path(
    get,
    path = "/v1/progress/{user_id}",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User progress", body = UserProgress)
    ),
    tag = "progress"
)]
#[get("/v1/progress/{user_id}")]
pub async fn get_progress(
    repository: web::Data<ProgressRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    let progress = repository.get_or_default(&user_id).await?;

    Ok(HttpResponse::Ok().json(progress))
}

/// Configure progress routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_progress);
}
