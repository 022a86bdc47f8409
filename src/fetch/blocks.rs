use std::time::Duration;

use anyhow::Result;
use log::debug;
use moka::future::Cache;

use super::source::BlockResolver;

/// Block resolver that remembers resolved timestamps.
///
/// Unresolved timestamps (`None`) are not cached so that a block indexed
/// later is picked up on the next refresh.
pub struct CachedBlockResolver<R> {
    inner: R,
    cache: Cache<i64, u64>,
}

impl<R: BlockResolver> CachedBlockResolver<R> {
    pub fn new(inner: R, ttl: Duration) -> Self {
        // Horizons are minute-aligned, so a day of refreshes is ~4k keys
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: BlockResolver> BlockResolver for CachedBlockResolver<R> {
    async fn block_for_timestamp(&self, timestamp: i64) -> Result<Option<u64>> {
        if let Some(block) = self.cache.get(&timestamp).await {
            return Ok(Some(block));
        }

        let resolved = self.inner.block_for_timestamp(timestamp).await?;
        match resolved {
            Some(block) => self.cache.insert(timestamp, block).await,
            None => debug!("No block found yet for timestamp {}", timestamp),
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingResolver {
        calls: AtomicUsize,
        known: bool,
    }

    impl BlockResolver for CountingResolver {
        async fn block_for_timestamp(&self, timestamp: i64) -> Result<Option<u64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.known.then_some(timestamp as u64 / 12))
        }
    }

    #[tokio::test]
    async fn test_resolved_blocks_are_cached() {
        let resolver = CachedBlockResolver::new(
            CountingResolver {
                calls: AtomicUsize::new(0),
                known: true,
            },
            Duration::from_secs(60),
        );

        assert_eq!(resolver.block_for_timestamp(1200).await.unwrap(), Some(100));
        assert_eq!(resolver.block_for_timestamp(1200).await.unwrap(), Some(100));
        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unresolved_blocks_are_retried() {
        let resolver = CachedBlockResolver::new(
            CountingResolver {
                calls: AtomicUsize::new(0),
                known: false,
            },
            Duration::from_secs(60),
        );

        assert_eq!(resolver.block_for_timestamp(1200).await.unwrap(), None);
        assert_eq!(resolver.block_for_timestamp(1200).await.unwrap(), None);
        assert_eq!(resolver.inner().calls.load(Ordering::SeqCst), 2);
    }
}
