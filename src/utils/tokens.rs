//! Display names for tokens.
//!
//! Wrapped native tokens are shown as the native asset of the network they
//! live on (WETH on mainnet renders as Ether / ETH).

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::models::Network;

struct TokenOverride {
    name: &'static str,
    symbol: &'static str,
}

/// network id -> lowercase token address -> display override
static TOKEN_OVERRIDES: Lazy<FxHashMap<&'static str, FxHashMap<&'static str, TokenOverride>>> =
    Lazy::new(|| {
        let ether = || TokenOverride {
            name: "Ether",
            symbol: "ETH",
        };
        let entries = [
            ("ethereum", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", ether()),
            ("arbitrum", "0x82af49447d8a07e3bd95bd0d56f35241523fbab1", ether()),
            ("optimism", "0x4200000000000000000000000000000000000006", ether()),
            ("base", "0x4200000000000000000000000000000000000006", ether()),
            (
                "polygon",
                "0x0d500b1d8e8ef31e21c99d1db9a6444d3adf1270",
                TokenOverride {
                    name: "Matic",
                    symbol: "MATIC",
                },
            ),
            (
                "celo",
                "0x471ece3750da237f93b8e339c536989b8978a438",
                TokenOverride {
                    name: "Celo",
                    symbol: "CELO",
                },
            ),
        ];

        let mut overrides: FxHashMap<&'static str, FxHashMap<&'static str, TokenOverride>> =
            FxHashMap::default();
        for (network_id, address, token) in entries {
            overrides.entry(network_id).or_default().insert(address, token);
        }
        overrides
    });

fn lookup(address: &str, network: &Network) -> Option<&'static TokenOverride> {
    let address = address.to_lowercase();
    TOKEN_OVERRIDES
        .get(network.id.as_str())
        .and_then(|tokens| tokens.get(address.as_str()))
}

pub fn format_token_name(address: &str, name: &str, network: &Network) -> String {
    match lookup(address, network) {
        Some(token) => token.name.to_string(),
        None => name.to_string(),
    }
}

pub fn format_token_symbol(address: &str, symbol: &str, network: &Network) -> String {
    match lookup(address, network) {
        Some(token) => token.symbol.to_string(),
        None => symbol.to_string(),
    }
}
