//! Snapshot reconciliation.
//!
//! Aligns four snapshots of the same pools (now, 24h, 48h and one week ago)
//! by address and derives period volumes, TVL change and fee-adjusted token
//! balances. Missing history is normal (new pools, indexing lag) and falls
//! back to the rules below instead of failing.

use log::debug;

use crate::models::{
    Network, PoolData, PoolDatas, RawSnapshotRecord, SnapshotIndex, TokenData, TokenFields,
};
use crate::utils::{
    apy, daily_fees, finite_or_zero, format_token_name, format_token_symbol, parse_decimal,
    parse_decimal_opt, parse_u32, parse_u8,
};

/// The four horizons of one fetch cycle, each keyed by pool address.
///
/// Only `current` is mandatory for a pool to appear in the output.
#[derive(Debug, Clone, Default)]
pub struct HorizonSnapshots {
    pub current: SnapshotIndex,
    pub day1_ago: SnapshotIndex,
    pub day2_ago: SnapshotIndex,
    pub week_ago: SnapshotIndex,
}

/// Period delta of a cumulative counter and its percent change vs the period before.
///
/// Returns `(now - day1, change%)` where the change compares against
/// `day1 - day2`. A zero or non-finite comparison yields a change of 0.
pub fn two_day_change(now: f64, day1_ago: f64, day2_ago: f64) -> (f64, f64) {
    let current_change = now - day1_ago;
    let previous_change = day1_ago - day2_ago;
    if previous_change == 0.0 {
        return (finite_or_zero(current_change), 0.0);
    }
    let adjusted = (current_change - previous_change) / previous_change * 100.0;
    (finite_or_zero(current_change), finite_or_zero(adjusted))
}

/// 24h volume and its change.
///
/// Without both earlier readings the cumulative counter itself is reported as
/// the period volume with no change. This overstates volume for older pools
/// whose history is missing.
pub fn volume_24h(
    current: &RawSnapshotRecord,
    day1_ago: Option<&RawSnapshotRecord>,
    day2_ago: Option<&RawSnapshotRecord>,
) -> (f64, f64) {
    let now = parse_decimal(&current.cumulative_volume_usd);
    match (day1_ago, day2_ago) {
        (Some(day1), Some(day2)) => two_day_change(
            now,
            parse_decimal(&day1.cumulative_volume_usd),
            parse_decimal(&day2.cumulative_volume_usd),
        ),
        _ => (now, 0.0),
    }
}

/// 7 day volume, or the cumulative counter when there is no week-old reading.
pub fn volume_week(current: &RawSnapshotRecord, week_ago: Option<&RawSnapshotRecord>) -> f64 {
    let now = parse_decimal(&current.cumulative_volume_usd);
    match week_ago {
        Some(week) => finite_or_zero(now - parse_decimal(&week.cumulative_volume_usd)),
        None => now,
    }
}

/// TVL percent change vs 24h ago.
///
/// A 24h-ago TVL of exactly zero is divided as 1, so the result is the raw
/// USD difference times 100 rather than a true percentage.
pub fn tvl_usd_change(current: &RawSnapshotRecord, day1_ago: Option<&RawSnapshotRecord>) -> f64 {
    let Some(day1) = day1_ago else {
        return 0.0;
    };
    let now = parse_decimal(&current.total_value_locked_usd);
    let before = parse_decimal(&day1.total_value_locked_usd);
    let denominator = if before == 0.0 { 1.0 } else { before };
    finite_or_zero((now - before) / denominator * 100.0)
}

/// Locked token amounts minus an estimate of fees not yet removed upstream.
///
/// Half of the fee on each side's cumulative token volume is subtracted from
/// that side's locked amount. This is an approximation of an upstream
/// accounting lag, not an exact balance.
pub fn fee_adjusted_tvl_tokens(current: &RawSnapshotRecord) -> (f64, f64) {
    let fee_percent = parse_u32(&current.fee_tier) as f64 / 10_000.0 / 100.0;
    let adjust0 = parse_decimal(&current.volume_token0) * fee_percent / 2.0;
    let adjust1 = parse_decimal(&current.volume_token1) * fee_percent / 2.0;
    (
        finite_or_zero(parse_decimal(&current.total_value_locked_token0) - adjust0),
        finite_or_zero(parse_decimal(&current.total_value_locked_token1) - adjust1),
    )
}

fn token_data(token: &TokenFields, network: &Network) -> TokenData {
    TokenData {
        address: token.id.clone(),
        name: format_token_name(&token.id, &token.name, network),
        symbol: format_token_symbol(&token.id, &token.symbol, network),
        decimals: parse_u8(&token.decimals),
        derived_eth: parse_decimal(&token.derived_eth),
    }
}

fn enrich(
    address: &str,
    current: &RawSnapshotRecord,
    day1_ago: Option<&RawSnapshotRecord>,
    day2_ago: Option<&RawSnapshotRecord>,
    week_ago: Option<&RawSnapshotRecord>,
    network: &Network,
) -> PoolData {
    let fee_tier = parse_u32(&current.fee_tier);
    let (volume_usd_24h, volume_usd_change) = volume_24h(current, day1_ago, day2_ago);
    let (tvl_token0, tvl_token1) = fee_adjusted_tvl_tokens(current);
    let tvl_usd = parse_decimal(&current.total_value_locked_usd);

    PoolData {
        address: address.to_string(),
        fee_tier,
        liquidity: parse_decimal(&current.liquidity),
        sqrt_price: parse_decimal(&current.sqrt_price),
        tick: parse_decimal_opt(current.tick.as_deref()),
        token0: token_data(&current.token0, network),
        token1: token_data(&current.token1, network),
        token0_price: parse_decimal(&current.token0_price),
        token1_price: parse_decimal(&current.token1_price),
        volume_usd_24h,
        volume_usd_change,
        volume_usd_week: volume_week(current, week_ago),
        tvl_usd,
        tvl_usd_change: tvl_usd_change(current, day1_ago),
        tvl_token0,
        tvl_token1,
        fees_24h: daily_fees(volume_usd_24h, fee_tier),
        apy: apy(volume_usd_24h, fee_tier, tvl_usd),
    }
}

/// Reconcile the four horizons into one enriched pool per requested address.
///
/// Output follows the order of `addresses`. Addresses with no current record
/// are omitted entirely.
pub fn reconcile(
    addresses: &[String],
    snapshots: &HorizonSnapshots,
    network: &Network,
) -> PoolDatas {
    let mut pools = PoolDatas::with_capacity(addresses.len());
    let mut missing = 0usize;
    let mut without_history = 0usize;

    for address in addresses {
        let Some(current) = snapshots.current.get(address) else {
            missing += 1;
            continue;
        };
        let day1_ago = snapshots.day1_ago.get(address);
        let day2_ago = snapshots.day2_ago.get(address);
        let week_ago = snapshots.week_ago.get(address);

        if day1_ago.is_none() || day2_ago.is_none() {
            without_history += 1;
        }

        pools.insert(enrich(address, current, day1_ago, day2_ago, week_ago, network));
    }

    debug!(
        "Reconciled {} pools ({} requested, {} without current data, {} using cumulative volume fallback)",
        pools.len(),
        addresses.len(),
        missing,
        without_history
    );

    pools
}
