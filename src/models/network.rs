use std::collections::HashMap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::utils::normalize_address;

/// The deployment currently being viewed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub chain_id: u64,
}

impl Network {
    pub fn new(id: String, name: String, chain_id: u64) -> Self {
        Self { id, name, chain_id }
    }
}

/// Pool addresses eligible for display, per network id.
///
/// Addresses are stored lowercased. A network with no entry has no eligible pools.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowList {
    networks: FxHashMap<String, FxHashSet<String>>,
}

impl AllowList {
    pub fn from_config(entries: &HashMap<String, Vec<String>>) -> Self {
        let mut allow = Self::default();
        for (network_id, addresses) in entries {
            for address in addresses {
                allow.insert(network_id, address);
            }
        }
        allow
    }

    pub fn insert(&mut self, network_id: &str, address: &str) {
        self.networks
            .entry(network_id.to_string())
            .or_default()
            .insert(normalize_address(address));
    }

    pub fn contains(&self, network: &Network, address: &str) -> bool {
        self.networks
            .get(&network.id)
            .is_some_and(|set| set.contains(address) || set.contains(&address.to_lowercase()))
    }

    /// Allow-listed addresses for a network, sorted for a deterministic request order.
    pub fn addresses(&self, network: &Network) -> Vec<String> {
        let mut addresses: Vec<String> = self
            .networks
            .get(&network.id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        addresses.sort();
        addresses
    }
}
