use std::sync::Arc;

use crate::constants::{
    PUBLISHED_CONFIG_KEY, PUBLISHED_CONFIG_OBJECT, PUBLISHED_PROJECTS_KEY,
    PUBLISHED_PROJECTS_OBJECT,
};
use crate::dirty::DraftDiff;
use crate::domain::publish_state::{self, PublishState, Stamp};
use crate::entities::project::ProjectStatus;
use crate::entities::settings::{
    ProjectSettings, ProjectSettingsUpdate, WebsiteSettings, WebsiteSettingsPatch,
};
use crate::errors::AppError;
use crate::infrastructure::cache::SingleFlightCache;
use crate::repositories::project::ProjectRepository;
use crate::repositories::settings::SettingsRepository;
use crate::repositories::storage::ObjectStore;
use crate::use_cases::Written;
use serde::Serialize;

/// Receipt for a completed publish run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    pub published_at: Stamp,
    pub project_count: usize,
}

/// Owns the two settings singletons and the publish pipeline.
pub struct SettingsService<R, P, S>
where
    R: SettingsRepository,
    P: ProjectRepository,
    S: ObjectStore,
{
    pub settings_repo: R,
    pub project_repo: P,
    pub store: S,
    pub published_cache: Arc<SingleFlightCache>,
}

impl<R, P, S> SettingsService<R, P, S>
where
    R: SettingsRepository,
    P: ProjectRepository,
    S: ObjectStore,
{
    pub fn new(
        settings_repo: R,
        project_repo: P,
        store: S,
        published_cache: Arc<SingleFlightCache>,
    ) -> Self {
        SettingsService {
            settings_repo,
            project_repo,
            store,
            published_cache,
        }
    }

    /// Current website settings; a missing singleton reads as the default
    /// empty document rather than 404.
    pub async fn website(&self) -> Result<WebsiteSettings, AppError> {
        Ok(self.settings_repo.get_website().await?.unwrap_or_default())
    }

    /// Merge-writes the website settings document. A merge that changes
    /// nothing is skipped outright: `updated_at` only moves for a real
    /// edit, so a redundant save can never raise the needs-publish flag.
    pub async fn update_website(
        &self,
        patch: WebsiteSettingsPatch,
    ) -> Result<Written<WebsiteSettings>, AppError> {
        let current = self.website().await?;
        let mut next = current.clone();
        patch.apply(&mut next);

        if !next.differs_from(&current) {
            return Ok(Written::Unchanged(current));
        }

        next.updated_at = Stamp::now();
        self.settings_repo.put_website(&next).await?;
        tracing::info!("Website settings updated");
        Ok(Written::Saved(next))
    }

    pub async fn status(&self) -> Result<PublishState, AppError> {
        let settings = self.website().await?;
        Ok(publish_state::evaluate(
            settings.updated_at,
            settings.project_updated_at,
            settings.published_at,
        ))
    }

    /// Snapshots the active projects and the settings document into the
    /// publicly-readable objects, then stamps `published_at`. Any failure
    /// aborts before the stamp moves, so a partial publish still reads as
    /// "needs publish" and a retry re-uploads everything.
    pub async fn publish(&self) -> Result<PublishReceipt, AppError> {
        let projects = self
            .project_repo
            .list_projects_by_status(ProjectStatus::Active)
            .await?;

        let mut settings = self.website().await?;
        let published_at = Stamp::now();
        settings.published_at = published_at;

        let projects_json = serde_json::to_vec_pretty(&projects)?;
        self.store
            .put(PUBLISHED_PROJECTS_OBJECT, &projects_json, "application/json")
            .await?;

        let config_json = serde_json::to_vec_pretty(&settings)?;
        self.store
            .put(PUBLISHED_CONFIG_OBJECT, &config_json, "application/json")
            .await?;

        self.settings_repo.put_website(&settings).await?;

        self.published_cache.invalidate(PUBLISHED_PROJECTS_KEY);
        self.published_cache.invalidate(PUBLISHED_CONFIG_KEY);

        tracing::info!(
            project_count = projects.len(),
            "Published website data (projects.json and websiteConfig.json)"
        );
        Ok(PublishReceipt {
            published_at,
            project_count: projects.len(),
        })
    }

    pub async fn project_settings(&self) -> Result<ProjectSettings, AppError> {
        Ok(self
            .settings_repo
            .get_project_settings()
            .await?
            .unwrap_or_default())
    }

    /// Replaces the taxonomy, normalized server-side (trim, drop empties,
    /// case-insensitive dedupe). Skipped when membership is unchanged.
    pub async fn update_project_settings(
        &self,
        update: ProjectSettingsUpdate,
    ) -> Result<Written<ProjectSettings>, AppError> {
        let current = self.project_settings().await?;
        let (categories, tags) = update.normalized();
        let next = ProjectSettings {
            categories,
            tags,
            updated_at: current.updated_at,
        };

        if !next.differs_from(&current) {
            return Ok(Written::Unchanged(current));
        }

        let next = ProjectSettings {
            updated_at: Stamp::now(),
            ..next
        };
        self.settings_repo.put_project_settings(&next).await?;
        tracing::info!("Project settings updated");
        Ok(Written::Saved(next))
    }
}
