use serde::{Deserialize, Serialize};

use crate::models::PoolData;
use crate::utils::{apy, daily_fees};

/// Column the pool table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    FeeTier,
    #[serde(rename = "volume_24h", alias = "volume_usd")]
    Volume24h,
    #[default]
    TvlUsd,
    Apy,
    #[serde(rename = "fees_24h")]
    Fees24h,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::FeeTier,
        SortField::Apy,
        SortField::Fees24h,
        SortField::Volume24h,
        SortField::TvlUsd,
    ];

    /// Sort key for a pool.
    ///
    /// Derived columns are recomputed from volume, fee tier and TVL with the
    /// same functions used for display, never read from cached fields.
    pub fn key(self, pool: &PoolData) -> f64 {
        match self {
            SortField::FeeTier => pool.fee_tier as f64,
            SortField::Volume24h => pool.volume_usd_24h,
            SortField::TvlUsd => pool.tvl_usd,
            SortField::Apy => apy(pool.volume_usd_24h, pool.fee_tier, pool.tvl_usd),
            SortField::Fees24h => daily_fees(pool.volume_usd_24h, pool.fee_tier),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortField::FeeTier => "Pool",
            SortField::Volume24h => "Volume 24H",
            SortField::TvlUsd => "TVL",
            SortField::Apy => "APY",
            SortField::Fees24h => "Fees 24H",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> PoolData {
        PoolData {
            fee_tier: 3000,
            volume_usd_24h: 100.0,
            tvl_usd: 1000.0,
            // stale cached values must not leak into sort keys
            apy: -1.0,
            fees_24h: -1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_keys() {
        let pool = pool();
        assert_eq!(SortField::FeeTier.key(&pool), 3000.0);
        assert_eq!(SortField::Volume24h.key(&pool), 100.0);
        assert_eq!(SortField::TvlUsd.key(&pool), 1000.0);
    }

    #[test]
    fn test_derived_keys_are_recomputed() {
        let pool = pool();
        assert!((SortField::Apy.key(&pool) - 10.95).abs() < 1e-9);
        assert!((SortField::Fees24h.key(&pool) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_names() {
        let field: SortField = serde_json::from_str("\"fees_24h\"").unwrap();
        assert_eq!(field, SortField::Fees24h);
        let field: SortField = serde_json::from_str("\"volume_usd\"").unwrap();
        assert_eq!(field, SortField::Volume24h);
        assert_eq!(SortField::default(), SortField::TvlUsd);
    }
}
