//! Subgraph access.
//!
//! - `source`: the `SnapshotSource` and `BlockResolver` seams
//! - `client`: GraphQL client implementing both against a subgraph endpoint
//! - `blocks`: caching wrapper for block resolution
//! - `pool_datas`: four-horizon fetch with last-request-wins publishing

mod blocks;
mod client;
mod pool_datas;
pub mod queries;
mod source;
mod timestamps;

pub use blocks::CachedBlockResolver;
pub use client::SubgraphClient;
pub use pool_datas::PoolDataFetcher;
pub use source::{BlockResolver, SnapshotSource};
pub use timestamps::{delta_timestamps, DeltaTimestamps};

/// Fetcher wired to live subgraphs.
pub type SubgraphPoolFetcher = PoolDataFetcher<SubgraphClient, CachedBlockResolver<SubgraphClient>>;
