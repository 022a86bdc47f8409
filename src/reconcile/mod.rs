mod reconciler;

pub use reconciler::{
    fee_adjusted_tvl_tokens, reconcile, tvl_usd_change, two_day_change, volume_24h, volume_week,
    HorizonSnapshots,
};
