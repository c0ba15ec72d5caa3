use anyhow::{ensure, Result};
use futures::future::join_all;
use std::time::{Duration, Instant};
use tillcache_core::Cache;

use crate::options::StressOptions;

/// Number of keys every task contends on
const SHARED_KEYS: usize = 16;

/// How often (in rounds) each task lists the whole cache
const KEYS_EVERY: usize = 100;

/// Totals gathered by [`run_concurrent`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadReport {
    pub writes: usize,
    pub hits: usize,
    pub misses: usize,
    pub listings: usize,
}

impl WorkloadReport {
    fn merge(mut self, other: WorkloadReport) -> Self {
        self.writes += other.writes;
        self.hits += other.hits;
        self.misses += other.misses;
        self.listings += other.listings;
        self
    }
}

fn own_key(task: usize, round: usize) -> String {
    format!("task:{}:{}", task, round)
}

fn own_value(task: usize, round: usize) -> String {
    format!("{}-{}", task, round)
}

/// Runs `options.tasks` tasks against one shared cache, then checks that
/// every task-owned write is still readable.
pub async fn run_concurrent(cache: &Cache, options: &StressOptions) -> Result<WorkloadReport> {
    tracing::info!(
        "Concurrent workload: {} tasks x {} rounds",
        options.tasks,
        options.ops_per_task
    );
    let start = Instant::now();

    let handles: Vec<_> = (0..options.tasks)
        .map(|task| {
            let cache = cache.clone();
            let rounds = options.ops_per_task;
            tokio::spawn(async move { run_task(&cache, task, rounds).await })
        })
        .collect();

    let mut report = WorkloadReport::default();
    for joined in join_all(handles).await {
        report = report.merge(joined??);
    }

    let mut lost = 0;
    for task in 0..options.tasks {
        for round in 0..options.ops_per_task {
            if cache.get(&own_key(task, round)) != Some(own_value(task, round)) {
                lost += 1;
            }
        }
    }
    ensure!(lost == 0, "{} task-owned writes were lost", lost);

    let expected = options
        .total_ops()
        .saturating_add(SHARED_KEYS.min(options.ops_per_task));
    let live = cache.keys().len();
    ensure!(
        live == expected,
        "expected {} live keys after the workload, found {}",
        expected,
        live
    );

    tracing::info!(
        "   ✓ {} writes, {} hits, {} misses, {} listings in {:?}",
        report.writes,
        report.hits,
        report.misses,
        report.listings,
        start.elapsed()
    );
    Ok(report)
}

async fn run_task(cache: &Cache, task: usize, rounds: usize) -> Result<WorkloadReport> {
    let mut report = WorkloadReport::default();

    for round in 0..rounds {
        let key = own_key(task, round);
        cache.put(key.clone(), own_value(task, round));
        report.writes += 1;
        ensure!(
            cache.get(&key).as_deref() == Some(own_value(task, round).as_str()),
            "task {} could not read back {}",
            task,
            key
        );

        let shared = format!("shared:{}", round % SHARED_KEYS);
        match cache.get(&shared) {
            Some(_) => report.hits += 1,
            None => report.misses += 1,
        }
        cache.put_for(shared, task.to_string(), Duration::from_secs(300));
        report.writes += 1;

        // Expired by the next listing at the latest.
        let now = Instant::now();
        let past = now.checked_sub(Duration::from_millis(1)).unwrap_or(now);
        cache.put_till(format!("stale:{}:{}", task, round), "x", past);
        report.writes += 1;

        if round % KEYS_EVERY == 0 {
            let keys = cache.keys();
            ensure!(
                !keys.iter().any(|k| k.starts_with("stale:")),
                "keys() returned an expired entry"
            );
            report.listings += 1;
            tokio::task::yield_now().await;
        }
    }

    Ok(report)
}

/// Writes one entry with `ttl` and watches it disappear once the deadline
/// has passed.
pub async fn run_expiry(cache: &Cache, ttl: Duration) -> Result<()> {
    tracing::info!("Expiry walkthrough: ttl {:?}", ttl);

    let key = "walkthrough:expiring";
    cache.put_till(key, "1", Instant::now() + ttl);

    ensure!(
        cache.get(key).as_deref() == Some("1"),
        "entry missing before its deadline"
    );
    ensure!(
        cache.keys().iter().any(|k| k == key),
        "keys() missed a live entry"
    );

    tokio::time::sleep(ttl * 2).await;

    ensure!(cache.get(key).is_none(), "entry still visible after its deadline");
    ensure!(
        !cache.keys().iter().any(|k| k == key),
        "keys() listed an expired entry"
    );

    tracing::info!("   ✓ entry expired and was removed on access");
    Ok(())
}
