use std::collections::HashMap;

use anyhow::{anyhow, Context};
use config::{Config, ConfigError, File};
use log::LevelFilter;
use serde::Deserialize;
use url::Url;

use crate::models::{AllowList, Network};
use crate::view::SortField;

/// One deployment of the exchange and the two subgraphs that index it.
#[derive(Debug, Deserialize, Clone)]
pub struct NetworkSettings {
    pub id: String,
    pub name: String,
    pub chain_id: u64,
    /// Pools subgraph (current and historical pool state)
    pub subgraph_url: String,
    /// Blocks subgraph (timestamp -> block number)
    pub blocks_url: String,
}

/// Pool table presentation defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct ViewSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub sort_field: SortField,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sort_field: SortField::default(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

/// Refresh cadence and transport timeouts.
#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// How long a resolved timestamp -> block mapping stays cached
    #[serde(default = "default_block_cache_ttl")]
    pub block_cache_ttl_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
            block_cache_ttl_secs: default_block_cache_ttl(),
        }
    }
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    30
}

fn default_block_cache_ttl() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub active_network: String,
    pub networks: Vec<NetworkSettings>,
    /// Pool addresses eligible for display, per network id
    #[serde(default)]
    pub allow_list: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("config")
    }

    pub fn from_file(name: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(name))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }

    /// Settings for the network selected by `active_network`.
    pub fn active_network_settings(&self) -> anyhow::Result<&NetworkSettings> {
        self.networks
            .iter()
            .find(|n| n.id == self.active_network)
            .ok_or_else(|| anyhow!("Active network '{}' is not configured", self.active_network))
    }

    pub fn active_network(&self) -> anyhow::Result<Network> {
        let settings = self.active_network_settings()?;
        Ok(Network::new(
            settings.id.clone(),
            settings.name.clone(),
            settings.chain_id,
        ))
    }

    pub fn subgraph_url(&self) -> anyhow::Result<Url> {
        let settings = self.active_network_settings()?;
        Url::parse(&settings.subgraph_url)
            .with_context(|| format!("Invalid subgraph_url for network '{}'", settings.id))
    }

    pub fn blocks_url(&self) -> anyhow::Result<Url> {
        let settings = self.active_network_settings()?;
        Url::parse(&settings.blocks_url)
            .with_context(|| format!("Invalid blocks_url for network '{}'", settings.id))
    }

    pub fn allow_list(&self) -> AllowList {
        AllowList::from_config(&self.allow_list)
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}
