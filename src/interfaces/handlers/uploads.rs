use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{post, web, HttpResponse, Responder};
use rand::{distributions::Alphanumeric, Rng};
use tracing::instrument;

use crate::{
    constants::UPLOADS_PREFIX, errors::AppError, repositories::storage::ObjectStore,
    use_cases::extractors::AdminClaims, AppState,
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, MultipartForm)]
pub struct ImageUploadForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,

    /// Optional project id; uploads land under its folder so a later
    /// project delete can sweep them together.
    pub project: Option<Text<String>>,
}

/// Accepts one image, stores it, and answers with the `{url, path}` pair
/// the admin records on the project image.
#[instrument(skip(_claims, state, form))]
#[post("/uploads")]
pub async fn upload_image(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    form: MultipartForm<ImageUploadForm>,
) -> Result<impl Responder, AppError> {
    let form = form.into_inner();

    let bytes = tokio::fs::read(form.file.file.path()).await?;
    if bytes.is_empty() {
        return Err(AppError::InvalidInput("Uploaded file is empty".into()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::InvalidInput("Uploaded file is too large".into()));
    }

    // Sniff the real content; the client-declared type is not trusted.
    let kind = infer::get(&bytes)
        .ok_or_else(|| AppError::InvalidInput("Unrecognized file type".into()))?;
    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(AppError::InvalidInput(format!(
            "Only image uploads are accepted, got {}",
            kind.mime_type()
        )));
    }

    let folder = match &form.project {
        Some(project) if !project.trim().is_empty() => {
            format!("{}/{}", UPLOADS_PREFIX, project.trim())
        }
        _ => "uploads".to_string(),
    };
    let path = format!("{}/{}", folder, object_name(kind.extension()));

    let stored = state.storage.put(&path, &bytes, kind.mime_type()).await?;

    tracing::info!(path = %stored.path, size = bytes.len(), "Image uploaded");
    Ok(HttpResponse::Created().json(stored))
}

/// `{millis}-{random7}.{ext}`, the naming the admin's upload helper used.
fn object_name(extension: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();
    format!(
        "{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        suffix.to_lowercase(),
        extension
    )
}
