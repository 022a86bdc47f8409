//! Job to refresh the allow-listed pools of the active network.
//!
//! Runs a full four-horizon load and logs the current page of the table.

use std::sync::Arc;

use anyhow::{bail, Result};
use log::{debug, info};
use tokio::sync::Mutex;

use crate::fetch::{BlockResolver, PoolDataFetcher, SnapshotSource};
use crate::models::{AllowList, FetchStatus};
use crate::utils::{format_dollar_amount, format_fee_tier, format_percentage};
use crate::view::{PoolTable, SortField, TableView};

/// Reloads pool data and logs the visible page.
///
/// Returns the number of pools loaded. A load superseded by a newer one is
/// not an error and reports 0.
pub async fn run<S: SnapshotSource, B: BlockResolver>(
    fetcher: &PoolDataFetcher<S, B>,
    table: &Mutex<PoolTable>,
    allow_list: &Arc<AllowList>,
) -> Result<usize> {
    info!("Starting refresh_pools job...");

    let start = std::time::Instant::now();
    let network = fetcher.network();
    let addresses = allow_list.addresses(network);

    let status = fetcher.load(&addresses).await;
    let loaded = match &status {
        FetchStatus::Ready(pools) => pools.len(),
        FetchStatus::Failed => bail!(
            "Pool refresh for {} failed after {:?}",
            network.name,
            start.elapsed()
        ),
        FetchStatus::Loading => {
            info!("refresh_pools superseded by a newer load");
            return Ok(0);
        }
    };

    let mut table = table.lock().await;
    let view = table.view(&status, allow_list, network);
    log_page(&view, &table);

    info!(
        "Completed refresh_pools job in {:?} ({} of {} pools on {})",
        start.elapsed(),
        loaded,
        addresses.len(),
        network.name
    );
    Ok(loaded)
}

fn log_page(view: &TableView<'_>, table: &PoolTable) {
    let TableView::Page(page) = view else {
        return;
    };

    let header: Vec<String> = SortField::ALL
        .iter()
        .map(|field| format!("{}{}", field.label(), table.arrow(*field)))
        .collect();
    debug!("# | {}", header.join(" | "));

    for row in &page.rows {
        let pool = row.pool;
        debug!(
            "{} | {}/{} {} | {} | {} | {} | {}",
            row.index,
            pool.token0.symbol,
            pool.token1.symbol,
            format_fee_tier(pool.fee_tier),
            format_dollar_amount(pool.volume_usd_24h),
            format_dollar_amount(pool.tvl_usd),
            format_percentage(row.apy),
            format_dollar_amount(row.fees_24h),
        );
    }

    info!(
        "Page {} of {} ({} pools)",
        page.page,
        page.max_page.max(1),
        page.total
    );
}
