pub mod config;
pub mod cron;
pub mod fetch;
pub mod models;
pub mod reconcile;
pub mod utils;
pub mod view;

pub use config::Settings;
pub use cron::{CronScheduler, CronSettings};
pub use fetch::{CachedBlockResolver, PoolDataFetcher, SubgraphClient, SubgraphPoolFetcher};
pub use models::{AllowList, FetchStatus, Network, PoolData, PoolDatas};
pub use view::{PoolTable, SortField, TableView};
