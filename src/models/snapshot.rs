use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Token descriptor as reported by the pools subgraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenFields {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub decimals: String,
    #[serde(rename = "derivedETH")]
    pub derived_eth: String,
}

/// One pool as of one horizon, numeric fields still in their decimal-string form.
///
/// `cumulative_volume_usd` and `cumulative_tx_count` are all-time counters.
/// A period value is the difference of two readings, never a single reading.
/// The `total_value_locked_*` fields are point-in-time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSnapshotRecord {
    #[serde(rename = "id")]
    pub address: String,
    /// Hundredths of a basis point (3000 = 0.3%)
    pub fee_tier: String,
    pub liquidity: String,
    pub sqrt_price: String,
    /// Null for pools that were never initialized
    pub tick: Option<String>,
    pub token0: TokenFields,
    pub token1: TokenFields,
    pub token0_price: String,
    pub token1_price: String,
    #[serde(rename = "volumeUSD")]
    pub cumulative_volume_usd: String,
    pub volume_token0: String,
    pub volume_token1: String,
    #[serde(rename = "txCount")]
    pub cumulative_tx_count: String,
    pub total_value_locked_token0: String,
    pub total_value_locked_token1: String,
    #[serde(rename = "totalValueLockedUSD")]
    pub total_value_locked_usd: String,
}

/// A whole snapshot keyed by pool address.
pub type SnapshotIndex = FxHashMap<String, RawSnapshotRecord>;

/// Key a snapshot by pool address. A repeated address keeps the last record.
pub fn index_by_address(records: Vec<RawSnapshotRecord>) -> SnapshotIndex {
    let mut index = SnapshotIndex::default();
    index.reserve(records.len());
    for record in records {
        index.insert(record.address.clone(), record);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_subgraph_pool() {
        let json = r#"{
            "id": "0xpool",
            "feeTier": "3000",
            "liquidity": "123456789",
            "sqrtPrice": "79228162514264337593543950336",
            "tick": null,
            "token0": {"id": "0xa", "symbol": "AAA", "name": "Token A", "decimals": "18", "derivedETH": "0.5"},
            "token1": {"id": "0xb", "symbol": "BBB", "name": "Token B", "decimals": "6", "derivedETH": "0.0004"},
            "token0Price": "2",
            "token1Price": "0.5",
            "volumeUSD": "1000.5",
            "volumeToken0": "10",
            "volumeToken1": "20",
            "txCount": "42",
            "totalValueLockedToken0": "500",
            "totalValueLockedToken1": "250",
            "totalValueLockedUSD": "900"
        }"#;

        let record: RawSnapshotRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.address, "0xpool");
        assert_eq!(record.fee_tier, "3000");
        assert_eq!(record.tick, None);
        assert_eq!(record.token0.derived_eth, "0.5");
        assert_eq!(record.cumulative_volume_usd, "1000.5");
        assert_eq!(record.cumulative_tx_count, "42");
        assert_eq!(record.total_value_locked_usd, "900");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record: RawSnapshotRecord =
            serde_json::from_str(r#"{"id": "0xpool", "volumeUSD": "5"}"#).unwrap();

        assert_eq!(record.cumulative_volume_usd, "5");
        assert!(record.total_value_locked_usd.is_empty());
        assert!(record.token0.id.is_empty());
    }

    #[test]
    fn test_index_by_address() {
        let records = vec![
            RawSnapshotRecord {
                address: "0x1".into(),
                cumulative_volume_usd: "1".into(),
                ..Default::default()
            },
            RawSnapshotRecord {
                address: "0x2".into(),
                ..Default::default()
            },
            RawSnapshotRecord {
                address: "0x1".into(),
                cumulative_volume_usd: "3".into(),
                ..Default::default()
            },
        ];

        let index = index_by_address(records);

        assert_eq!(index.len(), 2);
        assert_eq!(index["0x1"].cumulative_volume_usd, "3");
    }
}
