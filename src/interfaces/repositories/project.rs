use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    entities::project::{Project, ProjectRow, ProjectStatus},
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, newest first.
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;

    /// Projects in the given status, newest first. Publish uses this to
    /// snapshot the active set.
    async fn list_projects_by_status(
        &self,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, AppError>;

    async fn get_project(&self, id: &Uuid) -> Result<Project, AppError>;

    async fn insert_project(&self, project: &Project) -> Result<(), AppError>;

    /// Full-document overwrite; last writer wins.
    async fn update_project(&self, project: &Project) -> Result<(), AppError>;

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;

    /// Every storage path referenced by any project image. Input for the
    /// orphaned-upload sweep.
    async fn referenced_storage_paths(&self) -> Result<Vec<String>, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn list_projects_by_status(
        &self,
        status: ProjectStatus,
    ) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_project(&self, id: &Uuid) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        Ok(Project::from(row))
    }

    async fn insert_project(&self, project: &Project) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO projects (
                id, title, description, location, category, tags, images,
                cover_image, status, featured, testimonial, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.location)
        .bind(&project.category)
        .bind(&project.tags)
        .bind(Json(&project.images))
        .bind(&project.cover_image)
        .bind(project.status.as_str())
        .bind(project.featured)
        .bind(project.testimonial.as_ref().map(Json))
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_project(&self, project: &Project) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET title = $2, description = $3, location = $4, category = $5,
                tags = $6, images = $7, cover_image = $8, status = $9,
                featured = $10, testimonial = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(project.id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.location)
        .bind(&project.category)
        .bind(&project.tags)
        .bind(Json(&project.images))
        .bind(&project.cover_image)
        .bind(project.status.as_str())
        .bind(project.featured)
        .bind(project.testimonial.as_ref().map(Json))
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Ok(())
    }

    async fn delete_project(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".into()));
        }
        Ok(())
    }

    async fn referenced_storage_paths(&self) -> Result<Vec<String>, AppError> {
        let paths: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT img->>'storagePath'
            FROM projects, jsonb_array_elements(images) AS img
            WHERE COALESCE(img->>'storagePath', '') <> ''
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(paths)
    }
}
