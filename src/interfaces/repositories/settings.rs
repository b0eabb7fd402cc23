use async_trait::async_trait;
use sqlx::types::Json;

use crate::{
    constants::{SETTINGS_PROJECTS_DOC, SETTINGS_WEBSITE_DOC},
    entities::settings::{ProjectSettings, WebsiteSettings},
    errors::AppError,
    repositories::sqlx_repo::SqlxSettingsRepo,
};

/// The two singleton documents, stored whole as JSONB rows keyed by name.
/// Reads tolerate sparse or older documents (every field defaults, stamps
/// normalize), writes replace the document — Firestore-style semantics on
/// Postgres.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get_website(&self) -> Result<Option<WebsiteSettings>, AppError>;
    async fn put_website(&self, settings: &WebsiteSettings) -> Result<(), AppError>;
    async fn get_project_settings(&self) -> Result<Option<ProjectSettings>, AppError>;
    async fn put_project_settings(&self, settings: &ProjectSettings) -> Result<(), AppError>;
}

impl SqlxSettingsRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSettingsRepo { pool }
    }

    async fn get_document(&self, doc: &str) -> Result<Option<serde_json::Value>, AppError> {
        let data: Option<Json<serde_json::Value>> =
            sqlx::query_scalar("SELECT data FROM settings WHERE doc = $1")
                .bind(doc)
                .fetch_optional(&self.pool)
                .await?;

        Ok(data.map(|d| d.0))
    }

    async fn put_document(&self, doc: &str, data: serde_json::Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO settings (doc, data, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (doc) DO UPDATE SET data = EXCLUDED.data, updated_at = now()
            "#,
        )
        .bind(doc)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for SqlxSettingsRepo {
    async fn get_website(&self) -> Result<Option<WebsiteSettings>, AppError> {
        match self.get_document(SETTINGS_WEBSITE_DOC).await? {
            Some(data) => {
                let settings = serde_json::from_value(data)
                    .map_err(|e| AppError::InternalError(format!("Corrupt website settings document: {}", e)))?;
                Ok(Some(settings))
            }
            None => Ok(None),
        }
    }

    async fn put_website(&self, settings: &WebsiteSettings) -> Result<(), AppError> {
        let data = serde_json::to_value(settings)?;
        self.put_document(SETTINGS_WEBSITE_DOC, data).await
    }

    async fn get_project_settings(&self) -> Result<Option<ProjectSettings>, AppError> {
        match self.get_document(SETTINGS_PROJECTS_DOC).await? {
            Some(data) => {
                let settings = serde_json::from_value(data)
                    .map_err(|e| AppError::InternalError(format!("Corrupt project settings document: {}", e)))?;
                Ok(Some(settings))
            }
            None => Ok(None),
        }
    }

    async fn put_project_settings(&self, settings: &ProjectSettings) -> Result<(), AppError> {
        let data = serde_json::to_value(settings)?;
        self.put_document(SETTINGS_PROJECTS_DOC, data).await
    }
}
