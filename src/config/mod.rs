mod config;

pub use self::config::{NetworkSettings, RefreshSettings, Settings, ViewSettings};
