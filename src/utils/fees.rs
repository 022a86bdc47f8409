//! Fee revenue and yield calculations.
//!
//! These are the only definitions of "24h fees" and "APY" in the crate. The
//! reconciler uses them to fill the display columns and the pool table uses
//! them again as sort keys, so both always agree.

/// Fee tier units per whole (fee tier is in hundredths of a basis point).
pub const FEE_TIER_DENOMINATOR: f64 = 1_000_000.0;

/// Days used to annualize a single day of fees.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Fee tier as a fraction of swap volume (3000 -> 0.003).
#[inline]
pub fn fee_fraction(fee_tier: u32) -> f64 {
    fee_tier as f64 / FEE_TIER_DENOMINATOR
}

/// Fees earned by LPs over a period with the given volume.
#[inline]
pub fn daily_fees(period_volume_usd: f64, fee_tier: u32) -> f64 {
    period_volume_usd * fee_fraction(fee_tier)
}

/// Annualized fee yield in percent.
///
/// Simple interest: the last 24h of fees repeated 365 times over current TVL,
/// no compounding. A pool with zero TVL yields 0.
#[inline]
pub fn apy(period_volume_usd: f64, fee_tier: u32, tvl_usd: f64) -> f64 {
    if tvl_usd == 0.0 {
        return 0.0;
    }
    let value = daily_fees(period_volume_usd, fee_tier) * DAYS_PER_YEAR / tvl_usd * 100.0;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
