use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Singleton document names in the `settings` table.
pub const SETTINGS_WEBSITE_DOC: &str = "website";
pub const SETTINGS_PROJECTS_DOC: &str = "projects";

/// Object-store paths the publish pipeline writes; the public site reads
/// these (directly or through `/published/*`).
pub const PUBLISHED_PROJECTS_OBJECT: &str = "website/projects.json";
pub const PUBLISHED_CONFIG_OBJECT: &str = "website/websiteConfig.json";

/// Single-flight cache keys for the published snapshots.
pub const PUBLISHED_PROJECTS_KEY: &str = "projects";
pub const PUBLISHED_CONFIG_KEY: &str = "websiteConfig";

/// Folder uploaded project images land under.
pub const UPLOADS_PREFIX: &str = "project-images";
