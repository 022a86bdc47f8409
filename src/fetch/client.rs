use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use super::queries::{block_for_timestamp_query, pools_bulk_query};
use super::source::{BlockResolver, SnapshotSource};
use crate::models::RawSnapshotRecord;

/// Subgraphs cap unpaginated list queries at 100 entities.
const POOLS_BATCH_SIZE: usize = 100;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct PoolsResponse {
    pools: Option<Vec<RawSnapshotRecord>>,
}

#[derive(Deserialize)]
struct BlocksResponse {
    blocks: Option<Vec<BlockNumber>>,
}

#[derive(Deserialize)]
struct BlockNumber {
    number: String,
}

/// GraphQL client for a single subgraph endpoint.
#[derive(Clone)]
pub struct SubgraphClient {
    client: Client,
    url: Url,
}

impl SubgraphClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Execute a query and decode its `data`.
    ///
    /// Partial errors alongside data are logged and the data is kept; errors
    /// without data fail the query.
    pub async fn query<T: DeserializeOwned>(&self, query: &str) -> Result<T> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&GraphQlRequest { query })
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))?
            .error_for_status()
            .with_context(|| format!("Subgraph {} returned an error status", self.url))?;

        let body: GraphQlResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Invalid GraphQL response from {}", self.url))?;

        let messages: Vec<String> = body
            .errors
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.message)
            .collect();

        match body.data {
            Some(data) => {
                if !messages.is_empty() {
                    warn!("Subgraph {} returned partial errors: {}", self.url, messages.join("; "));
                }
                Ok(data)
            }
            None if !messages.is_empty() => {
                bail!("Subgraph {} query failed: {}", self.url, messages.join("; "))
            }
            None => Err(anyhow!("Subgraph {} returned no data", self.url)),
        }
    }
}

impl SnapshotSource for SubgraphClient {
    async fn fetch_pools(
        &self,
        block: Option<u64>,
        addresses: &[String],
    ) -> Result<Vec<RawSnapshotRecord>> {
        let mut records = Vec::with_capacity(addresses.len());

        for chunk in addresses.chunks(POOLS_BATCH_SIZE) {
            let response: PoolsResponse = self
                .query(&pools_bulk_query(block, chunk))
                .await
                .with_context(|| format!("Failed to fetch pools at block {block:?}"))?;
            records.extend(response.pools.unwrap_or_default());
        }

        debug!(
            "Fetched {} of {} pools at block {:?}",
            records.len(),
            addresses.len(),
            block
        );
        Ok(records)
    }
}

impl BlockResolver for SubgraphClient {
    async fn block_for_timestamp(&self, timestamp: i64) -> Result<Option<u64>> {
        let response: BlocksResponse = self
            .query(&block_for_timestamp_query(timestamp))
            .await
            .with_context(|| format!("Failed to resolve block for timestamp {timestamp}"))?;

        let Some(block) = response.blocks.unwrap_or_default().into_iter().next() else {
            return Ok(None);
        };

        let number = block
            .number
            .parse::<u64>()
            .with_context(|| format!("Invalid block number '{}'", block.number))?;
        Ok(Some(number))
    }
}
