use std::collections::HashSet;

use tokio::time::{interval, Duration};

use crate::constants::UPLOADS_PREFIX;
use crate::errors::AppError;
use crate::repositories::project::ProjectRepository;
use crate::repositories::storage::ObjectStore;

/// Daily sweep of uploaded images no project references anymore. Inline
/// deletes on project updates already handle the common case; this catches
/// what they miss (crashed requests, abandoned uploads).
pub async fn start_storage_sweep<P, S>(projects: P, store: S)
where
    P: ProjectRepository,
    S: ObjectStore,
{
    let mut interval = interval(Duration::from_secs(60 * 60 * 24));

    loop {
        interval.tick().await;

        match sweep_orphaned_uploads(&projects, &store, chrono::Duration::days(1)).await {
            Ok(count) => tracing::info!("Swept {} orphaned uploads", count),
            Err(e) => tracing::error!("Storage sweep failed: {}", e),
        }
    }
}

/// Deletes stored uploads absent from every project's image list. Objects
/// younger than `min_age` are left alone: an upload whose project save is
/// still in flight is not an orphan yet.
pub async fn sweep_orphaned_uploads<P, S>(
    projects: &P,
    store: &S,
    min_age: chrono::Duration,
) -> Result<usize, AppError>
where
    P: ProjectRepository,
    S: ObjectStore,
{
    let referenced: HashSet<String> = projects
        .referenced_storage_paths()
        .await?
        .into_iter()
        .collect();

    let cutoff = chrono::Utc::now() - min_age;
    let mut removed = 0;

    for entry in store.list(&format!("{}/", UPLOADS_PREFIX)).await? {
        if referenced.contains(&entry.path) {
            continue;
        }
        if matches!(entry.modified, Some(modified) if modified > cutoff) {
            continue;
        }
        match store.delete(&entry.path).await {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(path = %entry.path, "Failed to sweep upload: {}", e),
        }
    }

    Ok(removed)
}
