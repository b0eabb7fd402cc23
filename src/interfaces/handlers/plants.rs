use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::plant::PlantDraft, errors::AppError, repositories::plant::PlantRepository,
    use_cases::extractors::AdminClaims, AppState,
};

#[get("/plants")]
pub async fn list_plants(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let plants = state.plant_repo.list_plants().await?;
    Ok(HttpResponse::Ok().json(plants))
}

#[get("/plants/{id}")]
pub async fn get_plant(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let plant = state.plant_repo.get_plant(&id).await?;
    Ok(HttpResponse::Ok().json(plant))
}

#[instrument(skip(_claims, state, draft))]
#[post("/plants")]
pub async fn create_plant(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    draft: web::Json<PlantDraft>,
) -> Result<impl Responder, AppError> {
    let draft = draft.into_inner();
    draft.validate()?;

    let plant = draft.into_plant(Uuid::new_v4(), Utc::now());
    state.plant_repo.insert_plant(&plant).await?;
    Ok(HttpResponse::Created().json(plant))
}

#[instrument(skip(_claims, state, draft))]
#[put("/plants/{id}")]
pub async fn update_plant(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    draft: web::Json<PlantDraft>,
) -> Result<impl Responder, AppError> {
    let draft = draft.into_inner();
    draft.validate()?;

    let existing = state.plant_repo.get_plant(&id).await?;
    let updated = draft.applied_to(&existing);
    state.plant_repo.update_plant(&updated).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[instrument(skip(_claims, state))]
#[delete("/plants/{id}")]
pub async fn delete_plant(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    state.plant_repo.delete_plant(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
