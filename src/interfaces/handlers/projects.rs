use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::project::ProjectDraft, errors::AppError, use_cases::extractors::AdminClaims,
    use_cases::Written, AppState,
};

#[get("/projects")]
pub async fn list_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let projects = state.project_service.list().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/projects/{id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project = state.project_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state, draft))]
#[post("/projects")]
pub async fn create_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    draft: web::Json<ProjectDraft>,
) -> Result<impl Responder, AppError> {
    let project = state.project_service.create(draft.into_inner()).await?;
    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(_claims, state, draft))]
#[put("/projects/{id}")]
pub async fn update_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    draft: web::Json<ProjectDraft>,
) -> Result<impl Responder, AppError> {
    let id = id.into_inner();
    let written = state.project_service.update(id, draft.into_inner()).await?;

    let response = match written {
        Written::Saved(project) => serde_json::json!({
            "id": id,
            "status": "updated",
            "message": "Project updated successfully",
            "project": project,
        }),
        Written::Unchanged(project) => serde_json::json!({
            "id": id,
            "status": "unchanged",
            "message": "No changes to save",
            "project": project,
        }),
    };
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(_claims, state))]
#[delete("/projects/{id}")]
pub async fn delete_project(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.project_service.delete(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
