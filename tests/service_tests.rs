use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use garden_backend::background_task::sweep_orphaned_uploads;
use garden_backend::cache::SingleFlightCache;
use garden_backend::entities::project::{
    Project, ProjectDraft, ProjectImage, ProjectStatus,
};
use garden_backend::entities::settings::{
    ProjectSettings, ProjectSettingsUpdate, WebsiteSettings, WebsiteSettingsPatch,
};
use garden_backend::errors::AppError;
use garden_backend::publish_state::Stamp;
use garden_backend::repositories::project::ProjectRepository;
use garden_backend::repositories::settings::SettingsRepository;
use garden_backend::repositories::storage::{ObjectStore, StoredEntry, StoredObject};
use garden_backend::use_cases::projects::{orphaned_images, ProjectService};
use garden_backend::use_cases::settings::SettingsService;
use parking_lot::Mutex;
use uuid::Uuid;

mockall::mock! {
    pub ProjectRepo {}

    #[async_trait]
    impl ProjectRepository for ProjectRepo {
        async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
        async fn list_projects_by_status(&self, status: ProjectStatus) -> Result<Vec<Project>, AppError>;
        async fn get_project(&self, id: &Uuid) -> Result<Project, AppError>;
        async fn insert_project(&self, project: &Project) -> Result<(), AppError>;
        async fn update_project(&self, project: &Project) -> Result<(), AppError>;
        async fn delete_project(&self, id: &Uuid) -> Result<(), AppError>;
        async fn referenced_storage_paths(&self) -> Result<Vec<String>, AppError>;
    }
}

mockall::mock! {
    pub SettingsRepo {}

    #[async_trait]
    impl SettingsRepository for SettingsRepo {
        async fn get_website(&self) -> Result<Option<WebsiteSettings>, AppError>;
        async fn put_website(&self, settings: &WebsiteSettings) -> Result<(), AppError>;
        async fn get_project_settings(&self) -> Result<Option<ProjectSettings>, AppError>;
        async fn put_project_settings(&self, settings: &ProjectSettings) -> Result<(), AppError>;
    }
}

/// In-memory object store; `modified` is pinned per object so the sweep's
/// age guard is testable.
#[derive(Clone, Default)]
struct MemStore {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, DateTime<Utc>)>>>,
}

impl MemStore {
    fn insert_aged(&self, path: &str, bytes: &[u8], modified: DateTime<Utc>) {
        self.objects
            .lock()
            .insert(path.to_string(), (bytes.to_vec(), modified));
    }

    fn contains(&self, path: &str) -> bool {
        self.objects.lock().contains_key(path)
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<StoredObject, AppError> {
        self.insert_aged(path, bytes, Utc::now());
        Ok(StoredObject {
            url: self.public_url(path),
            path: path.to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, AppError> {
        self.objects
            .lock()
            .get(path)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| AppError::NotFound(format!("Object not found: {}", path)))
    }

    async fn delete(&self, path: &str) -> Result<(), AppError> {
        self.objects
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Object not found: {}", path)))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredEntry>, AppError> {
        Ok(self
            .objects
            .lock()
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, (_, modified))| StoredEntry {
                path: path.clone(),
                modified: Some(*modified),
            })
            .collect())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://cdn.test/{path}")
    }
}

fn settings_service(
    settings_repo: MockSettingsRepo,
    project_repo: MockProjectRepo,
    store: MemStore,
) -> SettingsService<MockSettingsRepo, MockProjectRepo, MemStore> {
    SettingsService::new(
        settings_repo,
        project_repo,
        store,
        Arc::new(SingleFlightCache::new()),
    )
}

fn stored_settings() -> WebsiteSettings {
    let mut settings = WebsiteSettings::default();
    settings.title = "Mallorca Gardens".into();
    settings.updated_at = Stamp::from_unix(1_700_000_000, 0);
    settings
}

fn image(id: &str) -> ProjectImage {
    ProjectImage {
        id: id.into(),
        url: format!("https://cdn.test/project-images/x/{id}.webp"),
        storage_path: format!("project-images/x/{id}.webp"),
        caption: String::new(),
        alt: String::new(),
    }
}

fn stored_project(id: Uuid) -> Project {
    ProjectDraft {
        title: "Terrace garden".into(),
        category: "residential".into(),
        images: vec![image("a"), image("b")],
        status: ProjectStatus::Active,
        ..Default::default()
    }
    .into_project(id, Utc::now())
}

fn draft_of(project: &Project) -> ProjectDraft {
    ProjectDraft {
        title: project.title.clone(),
        description: project.description.clone(),
        location: project.location.clone(),
        category: project.category.clone(),
        tags: project.tags.clone(),
        images: project.images.clone(),
        cover_image: project.cover_image.clone(),
        status: project.status,
        featured: project.featured,
        testimonial: project.testimonial.clone(),
    }
}

// --- website settings ---

#[actix_rt::test]
async fn unchanged_settings_save_is_skipped() {
    let mut settings_repo = MockSettingsRepo::new();
    settings_repo
        .expect_get_website()
        .returning(|| Ok(Some(stored_settings())));
    // No put_website expectation: a write would fail the test.

    let service = settings_service(settings_repo, MockProjectRepo::new(), MemStore::default());

    let patch: WebsiteSettingsPatch =
        serde_json::from_value(serde_json::json!({"title": "Mallorca Gardens"})).unwrap();
    let written = service.update_website(patch).await.unwrap();

    assert!(!written.was_saved());
    // The stored stamp survives untouched.
    assert_eq!(
        written.into_inner().updated_at,
        Stamp::from_unix(1_700_000_000, 0)
    );
}

#[actix_rt::test]
async fn real_settings_edit_moves_the_stamp() {
    let mut settings_repo = MockSettingsRepo::new();
    settings_repo
        .expect_get_website()
        .returning(|| Ok(Some(stored_settings())));
    settings_repo
        .expect_put_website()
        .withf(|saved| {
            saved.tagline == "New tagline"
                && saved.updated_at.is_after(&Stamp::from_unix(1_700_000_000, 0))
        })
        .times(1)
        .returning(|_| Ok(()));

    let service = settings_service(settings_repo, MockProjectRepo::new(), MemStore::default());

    let patch: WebsiteSettingsPatch =
        serde_json::from_value(serde_json::json!({"tagline": "New tagline"})).unwrap();
    let written = service.update_website(patch).await.unwrap();
    assert!(written.was_saved());
}

#[actix_rt::test]
async fn publish_snapshots_active_projects_and_stamps() {
    let store = MemStore::default();

    let active = stored_project(Uuid::new_v4());
    let mut project_repo = MockProjectRepo::new();
    let snapshot = active.clone();
    project_repo
        .expect_list_projects_by_status()
        .withf(|status| *status == ProjectStatus::Active)
        .returning(move |_| Ok(vec![snapshot.clone()]));

    let mut settings_repo = MockSettingsRepo::new();
    settings_repo
        .expect_get_website()
        .returning(|| Ok(Some(stored_settings())));
    settings_repo
        .expect_put_website()
        .withf(|saved| saved.published_at.is_set())
        .times(1)
        .returning(|_| Ok(()));

    let service = settings_service(settings_repo, project_repo, store.clone());
    let receipt = service.publish().await.unwrap();

    assert_eq!(receipt.project_count, 1);
    assert!(receipt.published_at.is_set());

    let projects_json = store.get("website/projects.json").await.unwrap();
    let published: Vec<Project> = serde_json::from_slice(&projects_json).unwrap();
    assert_eq!(published[0].id, active.id);

    let config_json = store.get("website/websiteConfig.json").await.unwrap();
    let published: WebsiteSettings = serde_json::from_slice(&config_json).unwrap();
    assert_eq!(published.title, "Mallorca Gardens");
    assert_eq!(published.published_at, receipt.published_at);
}

#[actix_rt::test]
async fn taxonomy_update_normalizes_and_skips_no_ops() {
    let mut settings_repo = MockSettingsRepo::new();
    settings_repo.expect_get_project_settings().returning(|| {
        Ok(Some(ProjectSettings {
            categories: vec!["Residential".into()],
            tags: vec!["palms".into()],
            updated_at: Stamp::from_unix(1_700_000_000, 0),
        }))
    });

    let service = settings_service(settings_repo, MockProjectRepo::new(), MemStore::default());

    // Same membership in different case and order: skipped.
    let written = service
        .update_project_settings(ProjectSettingsUpdate {
            categories: vec!["RESIDENTIAL ".into()],
            tags: vec!["Palms".into(), "palms".into()],
        })
        .await
        .unwrap();
    assert!(!written.was_saved());

    // A new category is a real write with normalized values.
    let mut settings_repo = MockSettingsRepo::new();
    settings_repo.expect_get_project_settings().returning(|| {
        Ok(Some(ProjectSettings {
            categories: vec!["Residential".into()],
            tags: vec![],
            updated_at: Stamp::Unset,
        }))
    });
    settings_repo
        .expect_put_project_settings()
        .withf(|saved| {
            saved.categories == vec!["Residential".to_string(), "Landscape".to_string()]
                && saved.updated_at.is_set()
        })
        .times(1)
        .returning(|_| Ok(()));

    let service = settings_service(settings_repo, MockProjectRepo::new(), MemStore::default());
    let written = service
        .update_project_settings(ProjectSettingsUpdate {
            categories: vec!["Residential".into(), " Landscape".into(), "landscape".into()],
            tags: vec![],
        })
        .await
        .unwrap();
    assert!(written.was_saved());
}

// --- projects ---

#[actix_rt::test]
async fn create_project_stamps_project_updated_at() {
    let mut project_repo = MockProjectRepo::new();
    project_repo
        .expect_insert_project()
        .times(1)
        .returning(|_| Ok(()));

    let mut settings_repo = MockSettingsRepo::new();
    settings_repo
        .expect_get_website()
        .returning(|| Ok(Some(stored_settings())));
    settings_repo
        .expect_put_website()
        .withf(|saved| saved.project_updated_at.is_set())
        .times(1)
        .returning(|_| Ok(()));

    let service = ProjectService::new(project_repo, settings_repo, MemStore::default());

    let project = service
        .create(ProjectDraft {
            title: "New project".into(),
            images: vec![image("a")],
            ..Default::default()
        })
        .await
        .unwrap();

    // Cover defaults to the first image.
    assert_eq!(project.cover_image, image("a").url);
}

#[actix_rt::test]
async fn unchanged_project_save_is_skipped_entirely() {
    let id = Uuid::new_v4();
    let existing = stored_project(id);

    let mut project_repo = MockProjectRepo::new();
    let found = existing.clone();
    project_repo
        .expect_get_project()
        .returning(move |_| Ok(found.clone()));
    // Neither update_project nor any settings write may happen.

    let service = ProjectService::new(project_repo, MockSettingsRepo::new(), MemStore::default());

    let written = service.update(id, draft_of(&existing)).await.unwrap();
    assert!(!written.was_saved());
}

#[actix_rt::test]
async fn project_edit_saves_and_stamps() {
    let id = Uuid::new_v4();
    let existing = stored_project(id);

    let mut project_repo = MockProjectRepo::new();
    let found = existing.clone();
    project_repo
        .expect_get_project()
        .returning(move |_| Ok(found.clone()));
    project_repo
        .expect_update_project()
        .withf(|saved| saved.title == "Renamed")
        .times(1)
        .returning(|_| Ok(()));

    let mut settings_repo = MockSettingsRepo::new();
    settings_repo
        .expect_get_website()
        .returning(|| Ok(Some(stored_settings())));
    settings_repo
        .expect_put_website()
        .withf(|saved| saved.project_updated_at.is_set())
        .times(1)
        .returning(|_| Ok(()));

    let service = ProjectService::new(project_repo, settings_repo, MemStore::default());

    let mut draft = draft_of(&existing);
    draft.title = "Renamed".into();
    let written = service.update(id, draft).await.unwrap();
    assert!(written.was_saved());
}

#[test]
fn orphaned_images_are_the_dropped_urls() {
    let before = vec![image("a"), image("b"), image("c")];
    let after = vec![image("b")];

    let orphans = orphaned_images(&before, &after);
    let ids: Vec<&str> = orphans.iter().map(|img| img.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);

    assert!(orphaned_images(&before, &before).is_empty());
}

#[test]
fn deletion_path_prefers_storage_path_then_url() {
    let with_path = image("a");
    assert_eq!(
        with_path.deletion_path().as_deref(),
        Some("project-images/x/a.webp")
    );

    // Legacy record: only a download url with an encoded object path.
    let legacy = ProjectImage {
        id: "old".into(),
        url: "https://firebasestorage.googleapis.com/v0/b/app/o/project-images%2Fx%2Fold.webp?alt=media".into(),
        storage_path: String::new(),
        caption: String::new(),
        alt: String::new(),
    };
    assert_eq!(
        legacy.deletion_path().as_deref(),
        Some("project-images/x/old.webp")
    );

    let hopeless = ProjectImage {
        id: "none".into(),
        url: "https://example.com/plain.webp".into(),
        ..Default::default()
    };
    assert_eq!(hopeless.deletion_path(), None);
}

// --- orphan sweep ---

#[actix_rt::test]
async fn sweep_removes_only_old_unreferenced_uploads() {
    let store = MemStore::default();
    let old = Utc::now() - chrono::Duration::days(3);
    store.insert_aged("project-images/x/kept.webp", b"img", old);
    store.insert_aged("project-images/x/orphan.webp", b"img", old);
    store.insert_aged("project-images/x/fresh.webp", b"img", Utc::now());
    store.insert_aged("website/projects.json", b"[]", old);

    let mut project_repo = MockProjectRepo::new();
    project_repo
        .expect_referenced_storage_paths()
        .returning(|| Ok(vec!["project-images/x/kept.webp".into()]));

    let removed = sweep_orphaned_uploads(&project_repo, &store, chrono::Duration::days(1))
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(store.contains("project-images/x/kept.webp"));
    assert!(store.contains("project-images/x/fresh.webp"));
    assert!(!store.contains("project-images/x/orphan.webp"));
    // Published snapshots live outside the uploads prefix and are never
    // swept.
    assert!(store.contains("website/projects.json"));
}
