pub mod refresh_pools;
