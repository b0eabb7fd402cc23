use std::path::PathBuf;
use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{dirty, entities, publish_state, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, cache, db, storage};

use auth::jwt::JwtService;
use cache::SingleFlightCache;
use repositories::sqlx_repo::{SqlxPlantRepo, SqlxProjectRepo, SqlxSettingsRepo, SqlxUserRepo};
use storage::fs::FsStore;
use use_cases::auth::AuthHandler;
use use_cases::projects::ProjectService;
use use_cases::settings::SettingsService;

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService>;
pub type AppProjectService = ProjectService<SqlxProjectRepo, SqlxSettingsRepo, FsStore>;
pub type AppSettingsService = SettingsService<SqlxSettingsRepo, SqlxProjectRepo, FsStore>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub project_service: AppProjectService,
    pub settings_service: AppSettingsService,
    pub plant_repo: SqlxPlantRepo,
    pub storage: FsStore,
    pub storage_root: PathBuf,
    pub published_cache: Arc<SingleFlightCache>,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let jwt_service = JwtService::new(config);
        let user_repo = SqlxUserRepo::new(pool.clone());
        let auth_handler = AuthHandler::new(user_repo, jwt_service);

        let storage = FsStore::new(&config.storage_root, &config.public_base_url);
        let published_cache = Arc::new(SingleFlightCache::new());

        let project_service = ProjectService::new(
            SqlxProjectRepo::new(pool.clone()),
            SqlxSettingsRepo::new(pool.clone()),
            storage.clone(),
        );
        let settings_service = SettingsService::new(
            SqlxSettingsRepo::new(pool.clone()),
            SqlxProjectRepo::new(pool.clone()),
            storage.clone(),
            published_cache.clone(),
        );

        AppState {
            auth_handler,
            project_service,
            settings_service,
            plant_repo: SqlxPlantRepo::new(pool),
            storage,
            storage_root: config.storage_root.clone(),
            published_cache,
        }
    }
}
