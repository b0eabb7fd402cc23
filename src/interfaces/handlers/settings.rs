use actix_web::{get, post, put, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::settings::{ProjectSettingsUpdate, WebsiteSettingsPatch},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    use_cases::Written,
    AppState,
};

#[get("/settings/website")]
pub async fn get_website_settings(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let settings = state.settings_service.website().await?;
    Ok(HttpResponse::Ok().json(settings))
}

/// Needs-publish state for the admin dashboard banner.
#[get("/settings/website/status")]
pub async fn website_status(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let status = state.settings_service.status().await?;
    Ok(HttpResponse::Ok().json(status))
}

#[get("/settings/projects")]
pub async fn get_project_settings(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let settings = state.settings_service.project_settings().await?;
    Ok(HttpResponse::Ok().json(settings))
}

#[instrument(skip(_claims, state, patch))]
#[put("/settings/website")]
pub async fn update_website_settings(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    patch: web::Json<WebsiteSettingsPatch>,
) -> Result<impl Responder, AppError> {
    let written = state
        .settings_service
        .update_website(patch.into_inner())
        .await?;

    let (status, settings) = match written {
        Written::Saved(settings) => ("success", settings),
        Written::Unchanged(settings) => ("unchanged", settings),
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "settings": settings,
    })))
}

#[instrument(skip(_claims, state, update))]
#[put("/settings/projects")]
pub async fn update_project_settings(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    update: web::Json<ProjectSettingsUpdate>,
) -> Result<impl Responder, AppError> {
    let written = state
        .settings_service
        .update_project_settings(update.into_inner())
        .await?;

    let (status, settings) = match written {
        Written::Saved(settings) => ("success", settings),
        Written::Unchanged(settings) => ("unchanged", settings),
    };
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "settings": settings,
    })))
}

#[instrument(skip(_claims, state))]
#[post("/settings/website/publish")]
pub async fn publish_website(
    _claims: AdminClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let receipt = state.settings_service.publish().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": "Website data and configuration published successfully",
        "publishedAt": receipt.published_at,
        "projectCount": receipt.project_count,
    })))
}
