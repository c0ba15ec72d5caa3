use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tillcache_core::Cache;

/// Walks one key through its whole lifetime: written with a short deadline,
/// visible before it, gone from both `get` and `keys` after it.
#[test]
fn entry_lifecycle_with_deadline() {
    let cache = Cache::new();
    cache.put_till("a", "1", Instant::now() + Duration::from_millis(10));

    assert_eq!(cache.get("a").as_deref(), Some("1"));

    thread::sleep(Duration::from_millis(20));

    assert_eq!(cache.get("a"), None);
    assert!(!cache.keys().iter().any(|k| k == "a"));
}

#[test]
fn past_deadline_is_invisible_immediately() {
    let cache = Cache::new();
    cache.put_till("k", "v", Instant::now() - Duration::from_millis(5));

    assert!(cache.keys().is_empty());
    assert_eq!(cache.get("k"), None);
    assert!(cache.is_empty());
}

#[test]
fn keys_omission_agrees_with_get() {
    let cache = Cache::new();
    let past = Instant::now() - Duration::from_secs(1);
    for i in 0..20 {
        if i % 2 == 0 {
            cache.put(format!("live{}", i), "v");
        } else {
            cache.put_till(format!("dead{}", i), "v", past);
        }
    }

    let keys: HashSet<String> = cache.keys().into_iter().collect();
    assert_eq!(keys.len(), 10);
    for i in 0..20 {
        let key = if i % 2 == 0 {
            format!("live{}", i)
        } else {
            format!("dead{}", i)
        };
        assert_eq!(keys.contains(&key), cache.get(&key).is_some(), "{}", key);
    }
}

#[test]
fn keys_returns_an_independent_snapshot() {
    let cache = Cache::new();
    cache.put("a", "1");

    let snapshot = cache.keys();
    cache.put("b", "2");
    assert!(cache.delete("a"));

    assert_eq!(snapshot, vec!["a".to_string()]);
}

/// Hammers overlapping and disjoint keys from many threads and checks that no
/// write is lost and nothing panics.
#[test]
fn concurrent_mixed_workload_loses_no_updates() {
    const THREADS: usize = 16;
    const ROUNDS: usize = 500;

    let cache = Cache::new();
    let hits = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = cache.clone();
            let hits = Arc::clone(&hits);
            thread::spawn(move || {
                for i in 0..ROUNDS {
                    let own = format!("own:{}:{}", t, i);
                    cache.put(own.clone(), i.to_string());
                    assert_eq!(cache.get(&own), Some(i.to_string()));

                    let shared = format!("shared:{}", i % 10);
                    cache.put_for(shared.clone(), t.to_string(), Duration::from_secs(60));
                    if cache.get(&shared).is_some() {
                        hits.fetch_add(1, Ordering::Relaxed);
                    }

                    if i % 50 == 0 {
                        cache.put_till(format!("gone:{}:{}", t, i), "x", Instant::now());
                        let _ = cache.keys();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(hits.load(Ordering::Relaxed), THREADS * ROUNDS);
    for t in 0..THREADS {
        for i in 0..ROUNDS {
            assert_eq!(cache.get(&format!("own:{}:{}", t, i)), Some(i.to_string()));
        }
    }

    thread::sleep(Duration::from_millis(5));
    let keys = cache.keys();
    assert_eq!(keys.len(), THREADS * ROUNDS + 10);
    assert!(keys.iter().all(|k| !k.starts_with("gone:")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn usable_from_async_tasks() {
    let cache = Cache::new();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache.put_for(format!("task{}", i), "done", Duration::from_secs(2));
                cache.get(&format!("task{}", i))
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().as_deref(), Some("done"));
    }
    assert_eq!(cache.keys().len(), 32);

    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert!(cache.keys().is_empty());
    assert!(cache.is_empty());
}
