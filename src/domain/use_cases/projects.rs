use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::dirty::DraftDiff;
use crate::domain::publish_state::Stamp;
use crate::entities::project::{Project, ProjectDraft, ProjectImage};
use crate::errors::AppError;
use crate::repositories::project::ProjectRepository;
use crate::repositories::settings::SettingsRepository;
use crate::repositories::storage::ObjectStore;
use crate::use_cases::Written;

/// Project CRUD plus the bookkeeping the publish workflow depends on:
/// every effective write bumps `projectUpdatedAt` on the website settings
/// document, and dropped images are cleaned out of the object store.
pub struct ProjectService<P, R, S>
where
    P: ProjectRepository,
    R: SettingsRepository,
    S: ObjectStore + Clone + 'static,
{
    pub project_repo: P,
    pub settings_repo: R,
    pub store: S,
}

impl<P, R, S> ProjectService<P, R, S>
where
    P: ProjectRepository,
    R: SettingsRepository,
    S: ObjectStore + Clone + 'static,
{
    pub fn new(project_repo: P, settings_repo: R, store: S) -> Self {
        ProjectService {
            project_repo,
            settings_repo,
            store,
        }
    }

    pub async fn list(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects().await
    }

    pub async fn get(&self, id: &Uuid) -> Result<Project, AppError> {
        self.project_repo.get_project(id).await
    }

    pub async fn create(&self, draft: ProjectDraft) -> Result<Project, AppError> {
        draft.validate()?;

        let project = draft.into_project(Uuid::new_v4(), Utc::now());
        self.project_repo.insert_project(&project).await?;
        self.mark_projects_updated().await;

        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    pub async fn update(
        &self,
        id: Uuid,
        draft: ProjectDraft,
    ) -> Result<Written<Project>, AppError> {
        draft.validate()?;

        let existing = self.project_repo.get_project(&id).await?;
        let candidate = draft.applied_to(&existing);

        if !candidate.differs_from(&existing) {
            return Ok(Written::Unchanged(existing));
        }

        let removed = orphaned_images(&existing.images, &candidate.images);

        let mut updated = candidate;
        updated.updated_at = Utc::now();
        self.project_repo.update_project(&updated).await?;

        self.delete_detached(removed);
        self.mark_projects_updated().await;

        tracing::info!(project_id = %id, "Project updated");
        Ok(Written::Saved(updated))
    }

    pub async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let existing = self.project_repo.get_project(id).await?;
        self.project_repo.delete_project(id).await?;

        self.delete_detached(existing.images);
        self.mark_projects_updated().await;

        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    /// Deletes dropped images without holding up the response; a failed
    /// delete is only logged, the sweep task picks strays up later.
    fn delete_detached(&self, images: Vec<ProjectImage>) {
        for image in images {
            let Some(path) = image.deletion_path() else {
                tracing::warn!(url = %image.url, "Could not determine storage path for removed image");
                continue;
            };
            let store = self.store.clone();
            tokio::spawn(async move {
                match store.delete(&path).await {
                    Ok(()) => tracing::info!(path = %path, "Deleted orphaned image"),
                    Err(e) => tracing::warn!(path = %path, "Failed to delete image: {}", e),
                }
            });
        }
    }

    /// Stamps `projectUpdatedAt` on the website settings document. The
    /// stamp is advisory (it only drives the needs-publish signal), so a
    /// failure here is logged rather than failing the project write that
    /// already happened.
    async fn mark_projects_updated(&self) {
        let result = async {
            let mut settings = self
                .settings_repo
                .get_website()
                .await?
                .unwrap_or_default();
            settings.project_updated_at = Stamp::now();
            self.settings_repo.put_website(&settings).await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!("Failed to stamp projectUpdatedAt: {}", e);
        }
    }
}

/// Images present in `before` whose url no longer appears in `after`.
pub fn orphaned_images(before: &[ProjectImage], after: &[ProjectImage]) -> Vec<ProjectImage> {
    let kept: HashSet<&str> = after.iter().map(|img| img.url.as_str()).collect();
    before
        .iter()
        .filter(|img| !kept.contains(img.url.as_str()))
        .cloned()
        .collect()
}
