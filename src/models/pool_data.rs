use rustc_hash::FxHashMap;
use serde::Serialize;

/// Token side of a pool, current horizon only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenData {
    pub address: String,
    /// Display name (wrapped native tokens render as the native asset)
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub derived_eth: f64,
}

/// Pool enriched with period deltas computed across the four horizons.
///
/// `volume_usd_24h` is a period delta, unlike the cumulative counter it is
/// derived from. `fees_24h` and `apy` are for display only; sorting always
/// recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PoolData {
    pub address: String,
    pub fee_tier: u32,

    // Current state passthrough
    pub liquidity: f64,
    pub sqrt_price: f64,
    pub tick: f64,
    pub token0: TokenData,
    pub token1: TokenData,
    pub token0_price: f64,
    pub token1_price: f64,

    // Volume (period deltas)
    pub volume_usd_24h: f64,
    pub volume_usd_change: f64,
    pub volume_usd_week: f64,

    // Liquidity
    pub tvl_usd: f64,
    pub tvl_usd_change: f64,
    pub tvl_token0: f64,
    pub tvl_token1: f64,

    // Derived analytics
    pub fees_24h: f64,
    pub apy: f64,
}

/// Reconciled pools keyed by address, iterated in the order addresses were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolDatas {
    pools: Vec<PoolData>,
    positions: FxHashMap<String, usize>,
}

impl PoolDatas {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut positions = FxHashMap::default();
        positions.reserve(capacity);
        Self {
            pools: Vec::with_capacity(capacity),
            positions,
        }
    }

    /// Insert a pool. Re-inserting an address replaces it in its original position.
    pub fn insert(&mut self, pool: PoolData) {
        match self.positions.get(&pool.address) {
            Some(&position) => self.pools[position] = pool,
            None => {
                self.positions.insert(pool.address.clone(), self.pools.len());
                self.pools.push(pool);
            }
        }
    }

    pub fn get(&self, address: &str) -> Option<&PoolData> {
        self.positions.get(address).map(|&i| &self.pools[i])
    }

    pub fn contains(&self, address: &str) -> bool {
        self.positions.contains_key(address)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PoolData> {
        self.pools.iter()
    }

    pub fn as_slice(&self) -> &[PoolData] {
        &self.pools
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl<'a> IntoIterator for &'a PoolDatas {
    type Item = &'a PoolData;
    type IntoIter = std::slice::Iter<'a, PoolData>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<PoolData> for PoolDatas {
    fn from_iter<I: IntoIterator<Item = PoolData>>(iter: I) -> Self {
        let mut datas = PoolDatas::default();
        for pool in iter {
            datas.insert(pool);
        }
        datas
    }
}
