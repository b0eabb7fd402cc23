use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Responder};
use futures::FutureExt;
use serde_json::Value;

use crate::{
    constants::{
        PUBLISHED_CONFIG_KEY, PUBLISHED_CONFIG_OBJECT, PUBLISHED_PROJECTS_KEY,
        PUBLISHED_PROJECTS_OBJECT,
    },
    errors::AppError,
    infrastructure::cache::LoadError,
    repositories::storage::ObjectStore,
    AppState,
};

/// Published snapshots, as consumed by the public site. Reads go through
/// the single-flight cache so a burst of page loads triggers at most one
/// storage fetch per key; publish invalidates the keys.
#[get("/published/website")]
pub async fn published_website(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let doc = fetch_published(&state, PUBLISHED_CONFIG_KEY, PUBLISHED_CONFIG_OBJECT).await?;
    Ok(HttpResponse::Ok().json(&*doc))
}

#[get("/published/projects")]
pub async fn published_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let doc = fetch_published(&state, PUBLISHED_PROJECTS_KEY, PUBLISHED_PROJECTS_OBJECT).await?;
    Ok(HttpResponse::Ok().json(&*doc))
}

async fn fetch_published(
    state: &web::Data<AppState>,
    key: &str,
    object_path: &'static str,
) -> Result<Arc<Value>, AppError> {
    let store = state.storage.clone();

    state
        .published_cache
        .get_or_fetch(key, move || {
            async move {
                let bytes = store.get(object_path).await.map_err(|e| match e {
                    AppError::NotFound(_) => LoadError::Missing,
                    other => LoadError::Failed(other.to_string()),
                })?;
                let value: Value = serde_json::from_slice(&bytes)
                    .map_err(|e| LoadError::Failed(format!("Corrupt published object: {}", e)))?;
                Ok(Arc::new(value))
            }
            .boxed()
        })
        .await
        .map_err(|e| match e {
            LoadError::Missing => AppError::NotFound("Nothing has been published yet".into()),
            LoadError::Failed(msg) => AppError::InternalError(msg),
        })
}
