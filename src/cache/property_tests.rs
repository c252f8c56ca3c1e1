//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check expiry, sweeping and invalidation against a simple
//! model of the cache.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(3600);

// == Strategies ==
/// Generates host-like cache keys
fn host_key_strategy() -> impl Strategy<Value = String> {
    "10\\.0\\.0\\.[0-9]{1,2}".prop_map(|s| s)
}

/// Generates serialized snapshot payloads
fn snapshot_strategy() -> impl Strategy<Value = Bytes> {
    "\\[[0-9,]{0,32}\\]".prop_map(Bytes::from)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Bytes },
    Get { key: String },
    DeleteAll,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (host_key_strategy(), snapshot_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        3 => host_key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => Just(CacheOp::DeleteAll),
    ]
}

/// Builds a runtime whose clock only moves when the test advances it.
fn paused_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // After any invalidation, no key answers with data written before it.
    #[test]
    fn prop_invalidation_never_serves_older_snapshots(
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let mut store = CacheStore::new();
        let mut model: HashMap<String, Bytes> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone(), TEST_TTL);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key).cloned());
                }
                CacheOp::DeleteAll => {
                    store.delete_all();
                    model.clear();
                    prop_assert!(store.is_empty());
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
    }

    // A snapshot computed before an invalidation is never installed after it.
    #[test]
    fn prop_stale_generation_is_rejected(
        key in host_key_strategy(),
        value in snapshot_strategy(),
        invalidations in 1usize..5
    ) {
        let mut store = CacheStore::new();
        let observed = store.generation();

        for _ in 0..invalidations {
            store.delete_all();
        }

        prop_assert!(!store.set_if_current(key.clone(), value, TEST_TTL, observed));
        prop_assert!(store.get(&key).is_none());
    }

    #[test]
    fn prop_roundtrip_before_expiry(key in host_key_strategy(), value in snapshot_strategy()) {
        let mut store = CacheStore::new();
        store.set(key.clone(), value.clone(), TEST_TTL);
        prop_assert_eq!(store.get(&key), Some(value));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // An entry past its deadline reads as absent even though no sweep ran.
    #[test]
    fn prop_lazy_expiry(
        key in host_key_strategy(),
        value in snapshot_strategy(),
        ttl_secs in 1u64..120
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let mut store = CacheStore::new();
            store.set(key.clone(), value.clone(), Duration::from_secs(ttl_secs));

            tokio::time::advance(Duration::from_secs(ttl_secs)).await;
            prop_assert_eq!(store.get(&key), Some(value));

            tokio::time::advance(Duration::from_millis(1)).await;
            prop_assert!(store.get(&key).is_none());
            prop_assert_eq!(store.len(), 1);
            Ok(())
        })?;
    }

    // Sweeping twice in a row evicts nothing the second time, and only
    // expired entries are ever evicted.
    #[test]
    fn prop_sweep_idempotent(
        entries in prop::collection::vec((host_key_strategy(), 1u64..100), 1..30),
        elapsed in 0u64..150
    ) {
        let rt = paused_runtime();
        rt.block_on(async {
            let mut store = CacheStore::new();
            let mut deadlines: HashMap<String, u64> = HashMap::new();
            for (key, ttl) in &entries {
                store.set(key.clone(), Bytes::from_static(b"[]"), Duration::from_secs(*ttl));
                deadlines.insert(key.clone(), *ttl);
            }

            tokio::time::advance(Duration::from_secs(elapsed)).await;

            let expected = deadlines.values().filter(|ttl| **ttl < elapsed).count();
            prop_assert_eq!(store.delete_expired(), expected);
            prop_assert_eq!(store.delete_expired(), 0);
            prop_assert_eq!(store.len(), deadlines.len() - expected);
            Ok(())
        })?;
    }
}

// == Property Test for Error Response Format ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // Every error renders the {"status": "error", "message": ...} envelope.
    #[test]
    fn prop_error_response_format(detail in "[a-zA-Z0-9 _-]{1,100}", id in 1i64..10_000) {
        use crate::error::AppError;
        use axum::body::to_bytes;
        use axum::response::IntoResponse;

        let variants = vec![
            AppError::Validation(detail.clone()),
            AppError::NotFound(id),
            AppError::Conflict(detail.clone()),
            AppError::RateLimited { retry_after: 60 },
            AppError::Store(detail.clone()),
            AppError::Internal(detail.clone()),
        ];

        let rt = tokio::runtime::Runtime::new().unwrap();
        for error in variants {
            let response = error.into_response();

            let content_type = response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok());
            prop_assert!(
                content_type.map(|ct| ct.contains("application/json")).unwrap_or(false),
                "Response should have JSON content-type"
            );

            let bytes = rt.block_on(async { to_bytes(response.into_body(), usize::MAX).await.unwrap() });
            let json: serde_json::Value = serde_json::from_slice(&bytes)
                .expect("Response body should be valid JSON");

            prop_assert_eq!(&json["status"], "error");
            prop_assert!(json["message"].is_string());
        }
    }
}

// == Property Test for Concurrent Operation Correctness ==
proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    // Concurrent readers, writers and invalidators never observe a snapshot
    // that was not written whole.
    #[test]
    fn prop_concurrent_operation_correctness(
        operations in prop::collection::vec(cache_op_strategy(), 10..50)
    ) {
        use std::sync::Arc;
        use tokio::sync::RwLock;

        let rt = tokio::runtime::Runtime::new().unwrap();

        rt.block_on(async {
            let store = Arc::new(RwLock::new(CacheStore::new()));
            let written: Vec<Bytes> = operations
                .iter()
                .filter_map(|op| match op {
                    CacheOp::Set { value, .. } => Some(value.clone()),
                    _ => None,
                })
                .collect();
            let written = Arc::new(written);

            let mut handles = vec![];
            for op in operations {
                let store = Arc::clone(&store);
                let written = Arc::clone(&written);

                handles.push(tokio::spawn(async move {
                    match op {
                        CacheOp::Set { key, value } => {
                            store.write().await.set(key, value, TEST_TTL);
                        }
                        CacheOp::Get { key } => {
                            if let Some(value) = store.write().await.get(&key) {
                                if !written.contains(&value) {
                                    return Err(format!("unexpected snapshot {:?}", value));
                                }
                            }
                        }
                        CacheOp::DeleteAll => {
                            store.write().await.delete_all();
                        }
                    }
                    Ok::<_, String>(())
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            let cache = store.read().await;
            let stats = cache.stats();
            prop_assert_eq!(stats.total_entries, cache.len());
            let hit_rate = stats.hit_rate();
            prop_assert!((0.0..=1.0).contains(&hit_rate));
            Ok(())
        })?;
    }
}
