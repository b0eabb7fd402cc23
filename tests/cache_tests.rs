use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use garden_backend::cache::{LoadError, SingleFlightCache};
use serde_json::{json, Value};

fn loader(
    counter: Arc<AtomicUsize>,
    result: Result<Value, LoadError>,
) -> impl FnOnce() -> futures::future::BoxFuture<'static, Result<Arc<Value>, LoadError>> {
    move || {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            result.map(Arc::new)
        }
        .boxed()
    }
}

#[actix_rt::test]
async fn second_read_hits_the_cache() {
    let cache = SingleFlightCache::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let first = cache
        .get_or_fetch("config", loader(loads.clone(), Ok(json!({"title": "Gardens"}))))
        .await
        .unwrap();
    let second = cache
        .get_or_fetch("config", loader(loads.clone(), Ok(json!({"title": "other"}))))
        .await
        .unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(*first, *second);
}

#[actix_rt::test]
async fn concurrent_cold_reads_share_one_load() {
    let cache = Arc::new(SingleFlightCache::new());
    let loads = Arc::new(AtomicUsize::new(0));

    let loads_inner = loads.clone();
    let slow_loader = move || {
        async move {
            loads_inner.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            Ok(Arc::new(json!({"ok": true})))
        }
        .boxed()
    };
    let loads_inner = loads.clone();
    let other_loader = move || {
        async move {
            loads_inner.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(json!({"ok": true})))
        }
        .boxed()
    };

    let a = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.get_or_fetch("config", slow_loader).await })
    };
    // Give the first read time to install its in-flight load.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let b = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.get_or_fetch("config", other_loader).await })
    };

    assert!(a.await.unwrap().is_ok());
    assert!(b.await.unwrap().is_ok());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[actix_rt::test]
async fn invalidate_forces_a_refetch() {
    let cache = SingleFlightCache::new();
    let loads = Arc::new(AtomicUsize::new(0));

    cache
        .get_or_fetch("config", loader(loads.clone(), Ok(json!(1))))
        .await
        .unwrap();
    cache.invalidate("config");
    let value = cache
        .get_or_fetch("config", loader(loads.clone(), Ok(json!(2))))
        .await
        .unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 2);
    assert_eq!(*value, json!(2));
}

#[actix_rt::test]
async fn failed_loads_are_not_retained() {
    let cache = SingleFlightCache::new();
    let loads = Arc::new(AtomicUsize::new(0));

    let err = cache
        .get_or_fetch("config", loader(loads.clone(), Err(LoadError::Missing)))
        .await
        .unwrap_err();
    assert_eq!(err, LoadError::Missing);

    // The failure is gone; the next read loads again and succeeds.
    let value = cache
        .get_or_fetch("config", loader(loads.clone(), Ok(json!("fresh"))))
        .await
        .unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
    assert_eq!(*value, json!("fresh"));
}

#[actix_rt::test]
async fn keys_are_independent() {
    let cache = SingleFlightCache::new();
    let loads = Arc::new(AtomicUsize::new(0));

    cache
        .get_or_fetch("projects", loader(loads.clone(), Ok(json!([]))))
        .await
        .unwrap();
    cache
        .get_or_fetch("websiteConfig", loader(loads.clone(), Ok(json!({}))))
        .await
        .unwrap();

    cache.invalidate("projects");
    cache
        .get_or_fetch("websiteConfig", loader(loads.clone(), Ok(json!({}))))
        .await
        .unwrap();

    // Two cold loads plus none for the cached websiteConfig re-read.
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}
