//! Cron scheduler for periodic background tasks.
//!
//! Runs jobs like:
//! - Refreshing the allow-listed pools of the active network

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{error, info};
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::config::RefreshSettings;
use crate::fetch::SubgraphPoolFetcher;
use crate::models::AllowList;
use crate::view::PoolTable;

use super::jobs;

/// Cron scheduler that manages periodic background jobs.
pub struct CronScheduler {
    fetcher: Arc<SubgraphPoolFetcher>,
    table: Arc<Mutex<PoolTable>>,
    allow_list: Arc<AllowList>,
    settings: Arc<CronSettings>,
}

/// Configuration for cron job intervals
#[derive(Debug, Clone)]
pub struct CronSettings {
    /// Interval for refreshing pool data - default 1 minute
    pub refresh_pools_interval_secs: u64,
}

impl Default for CronSettings {
    fn default() -> Self {
        Self {
            refresh_pools_interval_secs: 60,
        }
    }
}

impl From<&RefreshSettings> for CronSettings {
    fn from(refresh: &RefreshSettings) -> Self {
        Self {
            refresh_pools_interval_secs: refresh.interval_secs.max(1),
        }
    }
}

impl CronScheduler {
    pub fn new(
        fetcher: Arc<SubgraphPoolFetcher>,
        table: Arc<Mutex<PoolTable>>,
        allow_list: Arc<AllowList>,
        settings: CronSettings,
    ) -> Self {
        Self {
            fetcher,
            table,
            allow_list,
            settings: Arc::new(settings),
        }
    }

    /// Starts the cron scheduler and runs until cancellation.
    pub async fn run(&self, cancellation_token: CancellationToken) -> Result<()> {
        let mut scheduler = JobScheduler::new().await?;

        self.register_refresh_pools_job(&scheduler).await?;

        scheduler.start().await?;
        info!("Cron scheduler started with {} jobs", 1);

        cancellation_token.cancelled().await;
        info!("Cron scheduler shutting down...");

        scheduler.shutdown().await?;
        Ok(())
    }

    async fn register_refresh_pools_job(&self, scheduler: &JobScheduler) -> Result<()> {
        let fetcher = self.fetcher.clone();
        let table = self.table.clone();
        let allow_list = self.allow_list.clone();
        let interval = self.settings.refresh_pools_interval_secs;

        let job = Job::new_repeated_async(Duration::from_secs(interval), move |_uuid, _lock| {
            let fetcher = fetcher.clone();
            let table = table.clone();
            let allow_list = allow_list.clone();
            Box::pin(async move {
                if let Err(e) = jobs::refresh_pools::run(&fetcher, &table, &allow_list).await {
                    error!("Failed to refresh pools: {:#}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
        info!("Registered refresh_pools job (every {}s)", interval);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_refresh_config() {
        let refresh = RefreshSettings {
            interval_secs: 0,
            ..Default::default()
        };

        assert_eq!(CronSettings::from(&refresh).refresh_pools_interval_secs, 1);
        assert_eq!(CronSettings::default().refresh_pools_interval_secs, 60);
    }
}
