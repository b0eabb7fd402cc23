use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde_json::Value;

/// Why a cached load produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The backing object does not exist (nothing published yet).
    Missing,
    Failed(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Missing => write!(f, "object missing"),
            LoadError::Failed(msg) => write!(f, "load failed: {}", msg),
        }
    }
}

type CachedLoad = Shared<BoxFuture<'static, Result<Arc<Value>, LoadError>>>;

/// Single-flight cache keyed by resource name.
///
/// What is cached is the load *future*, not just its value: concurrent
/// readers of a cold key share one in-flight load instead of racing
/// duplicate fetches. `invalidate` drops the entry so the next read
/// refetches. Failed loads are not retained — a transient error never
/// pins the key.
#[derive(Default)]
pub struct SingleFlightCache {
    inner: DashMap<String, CachedLoad>,
}

impl SingleFlightCache {
    pub fn new() -> Self {
        SingleFlightCache {
            inner: DashMap::new(),
        }
    }

    pub async fn get_or_fetch<F>(&self, key: &str, load: F) -> Result<Arc<Value>, LoadError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Arc<Value>, LoadError>>,
    {
        let fut = match self.inner.entry(key.to_string()) {
            Entry::Occupied(occupied) => occupied.get().clone(),
            Entry::Vacant(vacant) => {
                let fut = load().shared();
                vacant.insert(fut.clone());
                fut
            }
        };

        let result = fut.clone().await;
        if result.is_err() {
            // Drop only our own failed load; a concurrent invalidate may
            // already have replaced the slot with a fresh one.
            self.inner
                .remove_if(key, |_, cached| Shared::ptr_eq(cached, &fut));
        }
        result
    }

    pub fn invalidate(&self, key: &str) {
        self.inner.remove(key);
    }
}
