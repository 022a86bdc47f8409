//! GraphQL documents for the pools and blocks subgraphs.

/// Width of the window searched for a block after a timestamp, in seconds.
pub const BLOCK_SEARCH_WINDOW_SECS: i64 = 600;

fn quoted_list(addresses: &[String]) -> String {
    addresses
        .iter()
        .map(|address| serde_json::Value::String(address.clone()).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Bulk pool query, optionally pinned to a historical block.
pub fn pools_bulk_query(block: Option<u64>, addresses: &[String]) -> String {
    let pool_list = quoted_list(addresses);
    let block_filter = block
        .map(|number| format!("block: {{number: {number}}}, "))
        .unwrap_or_default();

    format!(
        r#"query pools {{
  pools(where: {{id_in: [{pool_list}]}}, {block_filter}orderBy: totalValueLockedUSD, orderDirection: desc, subgraphError: allow) {{
    id
    feeTier
    liquidity
    sqrtPrice
    tick
    token0 {{
      id
      symbol
      name
      decimals
      derivedETH
    }}
    token1 {{
      id
      symbol
      name
      decimals
      derivedETH
    }}
    token0Price
    token1Price
    volumeUSD
    volumeToken0
    volumeToken1
    txCount
    totalValueLockedToken0
    totalValueLockedToken1
    totalValueLockedUSD
  }}
}}"#
    )
}

/// Latest block within `BLOCK_SEARCH_WINDOW_SECS` after `timestamp`.
pub fn block_for_timestamp_query(timestamp: i64) -> String {
    let upper = timestamp + BLOCK_SEARCH_WINDOW_SECS;
    format!(
        r#"query blocks {{
  blocks(first: 1, orderBy: timestamp, orderDirection: desc, where: {{timestamp_gt: {timestamp}, timestamp_lt: {upper}}}) {{
    number
  }}
}}"#
    )
}
