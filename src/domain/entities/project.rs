use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

/// A portfolio project as served to the admin and, once published, to the
/// public site. Wire format is camelCase to match the shared types package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<ProjectImage>,
    pub cover_image: String,
    pub status: ProjectStatus,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<Testimonial>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    #[default]
    Inactive,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Inactive => "inactive",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw {
            "active" => ProjectStatus::Active,
            _ => ProjectStatus::Inactive,
        }
    }
}

/// `url` and `storage_path` travel together: the url is what browsers load,
/// the storage path is the only reliable handle for deleting the object
/// later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectImage {
    pub id: String,
    pub url: String,
    pub storage_path: String,
    pub caption: String,
    pub alt: String,
}

impl ProjectImage {
    /// Object-store path to delete when this image is dropped. Prefers the
    /// recorded storage path; legacy records that only carry a download url
    /// get the path decoded out of its `/o/<encoded>` segment.
    pub fn deletion_path(&self) -> Option<String> {
        if !self.storage_path.is_empty() {
            return Some(self.storage_path.clone());
        }
        let parsed = url::Url::parse(&self.url).ok()?;
        let (_, encoded) = parsed.path().split_once("/o/")?;
        urlencoding::decode(encoded).ok().map(|p| p.into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Testimonial {
    pub name: String,
    pub occupation: String,
    pub text: String,
}

/// Full-document payload for both `POST /admin/projects` and
/// `PUT /admin/projects/{id}` — the admin always submits the whole form.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub description: String,
    #[validate(length(max = 200, message = "Location is too long"))]
    pub location: String,
    #[validate(length(max = 100, message = "Category is too long"))]
    pub category: String,
    pub tags: Vec<String>,
    pub images: Vec<ProjectImage>,
    pub cover_image: String,
    pub status: ProjectStatus,
    pub featured: bool,
    pub testimonial: Option<Testimonial>,
}

impl ProjectDraft {
    /// Cover must reference one of the project's images. A stale or absent
    /// choice falls back to the first image, or empty when there are none.
    fn resolved_cover(&self) -> String {
        if !self.cover_image.is_empty()
            && self.images.iter().any(|img| img.url == self.cover_image)
        {
            return self.cover_image.clone();
        }
        self.images
            .first()
            .map(|img| img.url.clone())
            .unwrap_or_default()
    }

    pub fn into_project(self, id: Uuid, now: DateTime<Utc>) -> Project {
        let cover_image = self.resolved_cover();
        Project {
            id,
            title: self.title,
            description: self.description,
            location: self.location,
            category: self.category,
            tags: self.tags,
            images: self.images,
            cover_image,
            status: self.status,
            featured: self.featured,
            testimonial: self.testimonial,
            created_at: now,
            updated_at: now,
        }
    }

    /// The project as it would look after this draft is saved over
    /// `existing`. Keeps identity and `created_at`; `updated_at` is left to
    /// the caller so a no-op save can be detected before any stamp moves.
    pub fn applied_to(&self, existing: &Project) -> Project {
        let mut next = self.clone().into_project(existing.id, existing.created_at);
        next.updated_at = existing.updated_at;
        next
    }
}

/// Row shape for the `projects` table; JSONB columns come back wrapped.
#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub tags: Vec<String>,
    pub images: Json<Vec<ProjectImage>>,
    pub cover_image: String,
    pub status: String,
    pub featured: bool,
    pub testimonial: Option<Json<Testimonial>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            category: row.category,
            tags: row.tags,
            images: row.images.0,
            cover_image: row.cover_image,
            status: ProjectStatus::parse(&row.status),
            featured: row.featured,
            testimonial: row.testimonial.map(|t| t.0),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
