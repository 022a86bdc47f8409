//! Four-horizon pool fetch and reconciliation.
//!
//! A load resolves the three historical blocks, fetches all four snapshots
//! concurrently and reconciles them only once every outcome is known. Each
//! load gets a generation number; a result is published only if no newer
//! generation has published since, so a slow stale request can never
//! overwrite a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use super::source::{BlockResolver, SnapshotSource};
use super::timestamps::delta_timestamps;
use crate::models::{index_by_address, FetchStatus, Network, PoolDatas, RawSnapshotRecord};
use crate::reconcile::{reconcile, HorizonSnapshots};

struct Published {
    generation: u64,
    status: FetchStatus<Arc<PoolDatas>>,
}

pub struct PoolDataFetcher<S, B> {
    source: S,
    blocks: B,
    network: Network,
    issued: AtomicU64,
    published: RwLock<Published>,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl<S: SnapshotSource, B: BlockResolver> PoolDataFetcher<S, B> {
    pub fn new(source: S, blocks: B, network: Network) -> Self {
        Self {
            source,
            blocks,
            network,
            issued: AtomicU64::new(0),
            published: RwLock::new(Published {
                generation: 0,
                status: FetchStatus::Loading,
            }),
            in_flight: Mutex::new(None),
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The most recently published outcome.
    pub async fn status(&self) -> FetchStatus<Arc<PoolDatas>> {
        self.published.read().await.status.clone()
    }

    /// Load the given pools as of now.
    pub async fn load(&self, addresses: &[String]) -> FetchStatus<Arc<PoolDatas>> {
        self.load_at(addresses, Utc::now()).await
    }

    /// Load the given pools with horizons relative to `now`.
    ///
    /// Starting a load cancels any load still in flight.
    pub async fn load_at(
        &self,
        addresses: &[String],
        now: DateTime<Utc>,
    ) -> FetchStatus<Arc<PoolDatas>> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = in_flight.replace(token.clone()) {
                previous.cancel();
            }
        }

        self.publish(generation, FetchStatus::Loading).await;

        let status = tokio::select! {
            _ = token.cancelled() => {
                debug!("Pool load #{} superseded by a newer request", generation);
                return self.status().await;
            }
            status = self.fetch(addresses, now) => status,
        };

        self.publish(generation, status.clone()).await;
        status
    }

    async fn publish(&self, generation: u64, status: FetchStatus<Arc<PoolDatas>>) -> bool {
        let mut published = self.published.write().await;
        if generation < published.generation {
            debug!(
                "Discarding result of pool load #{} (#{} already published)",
                generation, published.generation
            );
            return false;
        }
        published.generation = generation;
        published.status = status;
        true
    }

    async fn historical(
        &self,
        label: &str,
        timestamp: i64,
        addresses: &[String],
    ) -> FetchStatus<Vec<RawSnapshotRecord>> {
        let block = match self.blocks.block_for_timestamp(timestamp).await {
            Ok(Some(block)) => block,
            Ok(None) => {
                debug!("No block for {} horizon ({}), treating as no history", label, timestamp);
                return FetchStatus::Ready(Vec::new());
            }
            Err(e) => {
                warn!("Failed to resolve {} block: {:#}", label, e);
                return FetchStatus::Failed;
            }
        };

        match self.source.fetch_pools(Some(block), addresses).await {
            Ok(records) => FetchStatus::Ready(records),
            Err(e) => {
                warn!("Failed to fetch {} snapshot at block {}: {:#}", label, block, e);
                FetchStatus::Failed
            }
        }
    }

    async fn current(&self, addresses: &[String]) -> FetchStatus<Vec<RawSnapshotRecord>> {
        match self.source.fetch_pools(None, addresses).await {
            Ok(records) => FetchStatus::Ready(records),
            Err(e) => {
                warn!("Failed to fetch current snapshot: {:#}", e);
                FetchStatus::Failed
            }
        }
    }

    async fn fetch(&self, addresses: &[String], now: DateTime<Utc>) -> FetchStatus<Arc<PoolDatas>> {
        let start = std::time::Instant::now();
        let horizons = delta_timestamps(now);

        let (current, day1_ago, day2_ago, week_ago) = futures::join!(
            self.current(addresses),
            self.historical("24h", horizons.t24, addresses),
            self.historical("48h", horizons.t48, addresses),
            self.historical("1w", horizons.t_week, addresses),
        );

        let FetchStatus::Ready(snapshots) =
            FetchStatus::combine([current, day1_ago, day2_ago, week_ago])
        else {
            return FetchStatus::Failed;
        };

        let mut snapshots = snapshots.into_iter().map(index_by_address);
        let horizons = HorizonSnapshots {
            current: snapshots.next().unwrap_or_default(),
            day1_ago: snapshots.next().unwrap_or_default(),
            day2_ago: snapshots.next().unwrap_or_default(),
            week_ago: snapshots.next().unwrap_or_default(),
        };

        let pools = reconcile(addresses, &horizons, &self.network);

        info!(
            "Loaded {} of {} pools on {} in {:?}",
            pools.len(),
            addresses.len(),
            self.network.name,
            start.elapsed()
        );
        FetchStatus::Ready(Arc::new(pools))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    use anyhow::{anyhow, Result};

    use crate::fetch::timestamps::DeltaTimestamps;

    const NOW: i64 = 1_700_000_040;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW, 0).unwrap()
    }

    fn horizons() -> DeltaTimestamps {
        delta_timestamps(now())
    }

    fn network() -> Network {
        Network::new("ethereum".into(), "Ethereum".into(), 1)
    }

    fn record(address: &str, volume_usd: &str, tvl_usd: &str) -> RawSnapshotRecord {
        RawSnapshotRecord {
            address: address.to_string(),
            fee_tier: "3000".into(),
            cumulative_volume_usd: volume_usd.to_string(),
            total_value_locked_usd: tvl_usd.to_string(),
            ..Default::default()
        }
    }

    /// Snapshots keyed by block (`None` = latest)
    #[derive(Default)]
    struct MockSource {
        snapshots: HashMap<Option<u64>, Vec<RawSnapshotRecord>>,
        failing_block: Option<Option<u64>>,
        delay: Option<Duration>,
    }

    impl SnapshotSource for MockSource {
        async fn fetch_pools(
            &self,
            block: Option<u64>,
            addresses: &[String],
        ) -> Result<Vec<RawSnapshotRecord>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing_block == Some(block) {
                return Err(anyhow!("subgraph unavailable"));
            }
            Ok(self
                .snapshots
                .get(&block)
                .map(|records| {
                    records
                        .iter()
                        .filter(|r| addresses.contains(&r.address))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    /// Block = timestamp, except for timestamps listed as unknown
    #[derive(Default)]
    struct MockBlocks {
        unknown: Vec<i64>,
        fail: bool,
    }

    impl BlockResolver for MockBlocks {
        async fn block_for_timestamp(&self, timestamp: i64) -> Result<Option<u64>> {
            if self.fail {
                return Err(anyhow!("blocks subgraph unavailable"));
            }
            if self.unknown.contains(&timestamp) {
                return Ok(None);
            }
            Ok(Some(timestamp as u64))
        }
    }

    fn full_source() -> MockSource {
        let h = horizons();
        let mut snapshots = HashMap::new();
        snapshots.insert(None, vec![record("0xa", "300", "1000")]);
        snapshots.insert(Some(h.t24 as u64), vec![record("0xa", "200", "900")]);
        snapshots.insert(Some(h.t48 as u64), vec![record("0xa", "100", "800")]);
        snapshots.insert(Some(h.t_week as u64), vec![record("0xa", "50", "700")]);
        MockSource {
            snapshots,
            ..Default::default()
        }
    }

    fn addresses() -> Vec<String> {
        vec!["0xa".to_string(), "0xmissing".to_string()]
    }

    #[tokio::test]
    async fn test_load_reconciles_all_horizons() {
        let fetcher = PoolDataFetcher::new(full_source(), MockBlocks::default(), network());

        let status = fetcher.load_at(&addresses(), now()).await;

        let pools = status.data().cloned().unwrap();
        assert_eq!(pools.len(), 1);
        let pool = pools.get("0xa").unwrap();
        assert_eq!(pool.volume_usd_24h, 100.0);
        assert_eq!(pool.volume_usd_change, 0.0);
        assert_eq!(pool.volume_usd_week, 250.0);
        assert_eq!(fetcher.status().await, status);
    }

    #[tokio::test]
    async fn test_any_fetch_error_fails_whole_load() {
        let mut source = full_source();
        source.failing_block = Some(Some(horizons().t48 as u64));
        let fetcher = PoolDataFetcher::new(source, MockBlocks::default(), network());

        let status = fetcher.load_at(&addresses(), now()).await;

        assert!(status.is_error());
        assert!(status.data().is_none());
        assert!(fetcher.status().await.is_error());
    }

    #[tokio::test]
    async fn test_block_resolution_error_fails_load() {
        let fetcher = PoolDataFetcher::new(
            full_source(),
            MockBlocks {
                fail: true,
                ..Default::default()
            },
            network(),
        );

        let status = fetcher.load_at(&addresses(), now()).await;

        assert!(status.is_error());
    }

    #[tokio::test]
    async fn test_unresolved_block_is_missing_history() {
        let fetcher = PoolDataFetcher::new(
            full_source(),
            MockBlocks {
                unknown: vec![horizons().t48],
                ..Default::default()
            },
            network(),
        );

        let status = fetcher.load_at(&addresses(), now()).await;

        let pools = status.data().cloned().unwrap();
        let pool = pools.get("0xa").unwrap();
        // no 48h reading: cumulative volume, no change
        assert_eq!(pool.volume_usd_24h, 300.0);
        assert_eq!(pool.volume_usd_change, 0.0);
        // 24h reading still drives TVL change
        assert!((pool.tvl_usd_change - 100.0 / 900.0 * 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_status_starts_loading() {
        let fetcher = PoolDataFetcher::new(full_source(), MockBlocks::default(), network());

        assert!(fetcher.status().await.is_loading());
    }

    #[tokio::test]
    async fn test_stale_generation_is_not_published() {
        let fetcher = PoolDataFetcher::new(full_source(), MockBlocks::default(), network());

        assert!(fetcher.publish(2, FetchStatus::Failed).await);
        let stale = FetchStatus::Ready(Arc::new(PoolDatas::default()));
        assert!(!fetcher.publish(1, stale).await);

        assert!(fetcher.status().await.is_error());
    }

    #[tokio::test]
    async fn test_newer_load_supersedes_slow_one() {
        let mut source = full_source();
        source.delay = Some(Duration::from_millis(50));
        let fetcher = Arc::new(PoolDataFetcher::new(source, MockBlocks::default(), network()));

        let slow = {
            let fetcher = Arc::clone(&fetcher);
            tokio::spawn(async move { fetcher.load_at(&addresses(), now()).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let fresh = fetcher.load_at(&["0xa".to_string()], now()).await;
        let _ = slow.await;

        assert!(fresh.data().is_some());
        let published = fetcher.status().await;
        assert_eq!(published, fresh);
        assert_eq!(fetcher.published.read().await.generation, 2);
    }
}
