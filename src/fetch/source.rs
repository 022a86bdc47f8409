use std::future::Future;

use anyhow::Result;

use crate::models::RawSnapshotRecord;

/// Source of pool snapshots.
pub trait SnapshotSource: Send + Sync {
    /// Pool records for `addresses` as of `block`, or the latest indexed state when `None`.
    ///
    /// Pools unknown at that block are simply absent from the result.
    fn fetch_pools(
        &self,
        block: Option<u64>,
        addresses: &[String],
    ) -> impl Future<Output = Result<Vec<RawSnapshotRecord>>> + Send;
}

/// Maps a unix timestamp to the block produced at that time.
pub trait BlockResolver: Send + Sync {
    /// `Ok(None)` when no block is known for the timestamp yet.
    fn block_for_timestamp(&self, timestamp: i64)
        -> impl Future<Output = Result<Option<u64>>> + Send;
}
