pub mod fetch_status;
pub mod network;
pub mod pool_data;
pub mod snapshot;

pub use fetch_status::FetchStatus;
pub use network::{AllowList, Network};
pub use pool_data::{PoolData, PoolDatas, TokenData};
pub use snapshot::{index_by_address, RawSnapshotRecord, SnapshotIndex, TokenFields};
