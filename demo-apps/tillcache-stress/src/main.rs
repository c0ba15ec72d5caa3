mod error;
mod options;
mod workload;

use anyhow::Result;
use options::StressOptions;
use tillcache_core::{Cache, CacheConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tillcache_stress=info,tillcache_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = StressOptions::from_env()?;

    tracing::info!("🧪 Tillcache stress run");
    tracing::info!("   Tasks: {}", options.tasks);
    tracing::info!("   Rounds per task: {}", options.ops_per_task);
    tracing::info!("   Expiry ttl: {:?}", options.ttl);

    let config = CacheConfig::default().with_initial_capacity(options.total_ops());
    let cache = Cache::with_config(config);

    workload::run_concurrent(&cache, &options).await?;
    workload::run_expiry(&cache, options.ttl).await?;

    let purged = cache.purge_expired();
    tracing::info!("Final state: {} entries ({} purged)", cache.len(), purged);
    tracing::info!("✅ All checks passed!");

    Ok(())
}
