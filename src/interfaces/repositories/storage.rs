use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;

/// What an upload resolves to: the public url browsers load, and the
/// storage path kept alongside it for later deletion.
#[derive(Debug, Clone, Serialize)]
pub struct StoredObject {
    pub url: String,
    pub path: String,
}

/// A stored object as seen by `list`; `modified` feeds the orphan sweep's
/// minimum-age guard.
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub path: String,
    pub modified: Option<DateTime<Utc>>,
}

/// Object storage, Firebase-Storage shaped: blobs addressed by
/// slash-separated paths, publicly readable by url.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<StoredObject, AppError>;

    async fn get(&self, path: &str) -> Result<Vec<u8>, AppError>;

    async fn delete(&self, path: &str) -> Result<(), AppError>;

    async fn list(&self, prefix: &str) -> Result<Vec<StoredEntry>, AppError>;

    fn public_url(&self, path: &str) -> String;
}
