use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info};
use simple_logger::SimpleLogger;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use poolstats::{
    cron::jobs, CachedBlockResolver, CronScheduler, CronSettings, PoolDataFetcher, PoolTable,
    Settings, SubgraphClient,
};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Arc::new(
        Settings::new()
            .context("Failed to load config.yaml. Please ensure it exists and is valid")?,
    );

    SimpleLogger::new()
        .with_level(settings.level_filter())
        .init()
        .context("Failed to initialize logger")?;

    let network = settings.active_network()?;
    let timeout = Duration::from_secs(settings.refresh.request_timeout_secs);

    let pools_client = SubgraphClient::new(settings.subgraph_url()?, timeout)?;
    let blocks_client = SubgraphClient::new(settings.blocks_url()?, timeout)?;
    let blocks = CachedBlockResolver::new(
        blocks_client,
        Duration::from_secs(settings.refresh.block_cache_ttl_secs),
    );

    info!(
        "Tracking {} (chain {}) via {}",
        network.name,
        network.chain_id,
        pools_client.url()
    );

    let fetcher = Arc::new(PoolDataFetcher::new(pools_client, blocks, network));
    let table = Arc::new(Mutex::new(PoolTable::new(
        settings.view.page_size,
        settings.view.sort_field,
    )));
    let allow_list = Arc::new(settings.allow_list());

    let cancellation_token = CancellationToken::new();

    // First load right away, the scheduler only fires after one interval
    let initial_handle = {
        let fetcher = fetcher.clone();
        let table = table.clone();
        let allow_list = allow_list.clone();
        let token = cancellation_token.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {},
                result = jobs::refresh_pools::run(&fetcher, &table, &allow_list) => {
                    if let Err(e) = result {
                        error!("Initial pool load failed: {:#}", e);
                    }
                }
            }
        })
    };

    let cron_scheduler = CronScheduler::new(
        fetcher,
        table,
        allow_list,
        CronSettings::from(&settings.refresh),
    );

    let cron_token = cancellation_token.child_token();
    let cron_handle = tokio::spawn(async move {
        if let Err(e) = cron_scheduler.run(cron_token).await {
            error!("Cron scheduler failed: {:#}", e);
        }
    });

    #[cfg(unix)]
    let mut sigterm_stream = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?
    };

    info!("Pool stats running. Press Ctrl+C to stop.");

    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
        };
    }

    cancellation_token.cancel();

    info!("Waiting for cron scheduler to stop...");
    let _ = initial_handle.await;
    let _ = cron_handle.await;

    info!("Stopped");
    Ok(())
}
