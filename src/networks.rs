// src/networks.rs

//! Supported-network table and resolution.
//!
//! The directory is built once at startup from [`Config`] and injected into
//! whatever needs it; nothing in this module is process-global. Entries are
//! immutable after construction and indexed both by lowercase name and by
//! chain id.

use std::collections::HashMap;

use ethers_core::types::{Address, H160};
use ethers_core::utils::to_checksum;
use serde::Serialize;

use crate::config::Config;
use crate::error::RegistryError;

/// Delegate Registry v2 deployment on ordinary EVM chains,
/// `0x00000000000000447e69651d841bD8D104Bed493`.
pub const DELEGATE_REGISTRY_EVM: Address = H160([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x44, 0x7e, 0x69, 0x65, 0x1d, 0x84, 0x1b, 0xd8,
    0xd1, 0x04, 0xbe, 0xd4, 0x93,
]);

/// Delegate Registry v2 deployment on zksync-era-derived chains,
/// `0x0000000059A24EB229eED07Ac44229DB56C5d797`.
pub const DELEGATE_REGISTRY_ZKSYNC: Address = H160([
    0x00, 0x00, 0x00, 0x00, 0x59, 0xa2, 0x4e, 0xb2, 0x29, 0xee, 0xd0, 0x7a, 0xc4, 0x42, 0x29,
    0xdb, 0x56, 0xc5, 0xd7, 0x97,
]);

/// The two live registry deployments. Every network maps to exactly one,
/// decided by its execution-layer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryDeployment {
    Evm,
    ZkSync,
}

impl RegistryDeployment {
    pub fn address(self) -> Address {
        match self {
            RegistryDeployment::Evm => DELEGATE_REGISTRY_EVM,
            RegistryDeployment::ZkSync => DELEGATE_REGISTRY_ZKSYNC,
        }
    }
}

/// One supported network. `rpc_url` is `None` when no endpoint is
/// configured; read calls against such a network fail fast.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    pub name: String,
    pub display_name: String,
    pub chain_id: u64,
    pub deployment: RegistryDeployment,
    pub rpc_url: Option<String>,
}

impl NetworkConfig {
    pub fn registry_address(&self) -> Address {
        self.deployment.address()
    }
}

/// The discovery view handed back by `getSupportedNetworks` /
/// `getNetworkInfo`. RPC endpoints (which embed the API key) are never
/// serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub display_name: String,
    pub chain_id: u64,
    pub registry_address: String,
}

impl From<&NetworkConfig> for NetworkInfo {
    fn from(network: &NetworkConfig) -> Self {
        Self {
            display_name: network.display_name.clone(),
            chain_id: network.chain_id,
            registry_address: to_checksum(&network.registry_address(), None),
        }
    }
}

#[derive(Debug)]
pub struct NetworkDirectory {
    entries: Vec<NetworkConfig>,
    by_name: HashMap<String, usize>,
    by_chain_id: HashMap<u64, usize>,
}

impl NetworkDirectory {
    /// Builds the built-in table, substituting the Alchemy key into hosted
    /// endpoints and applying any per-network overrides from the config.
    pub fn new(config: &Config) -> Self {
        Self::from_entries(builtin_entries(config))
    }

    /// Builds a directory from an arbitrary entry list. Tests use this to
    /// substitute alternate tables; entries keep their given order.
    pub fn from_entries(entries: Vec<NetworkConfig>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        let mut by_chain_id = HashMap::with_capacity(entries.len());
        for (idx, network) in entries.iter().enumerate() {
            by_name.insert(network.name.clone(), idx);
            by_chain_id.insert(network.chain_id, idx);
        }
        Self {
            entries,
            by_name,
            by_chain_id,
        }
    }

    /// Resolves a network identifier to its config.
    ///
    /// An identifier that parses as an unsigned integer is matched by chain
    /// id and nothing else; any other identifier is lowercased and matched
    /// by name key. The two match modes never mix, so a numeric-looking
    /// network name would be shadowed by chain-id matching. No such name
    /// exists in the built-in table.
    pub fn resolve(&self, identifier: &str) -> Result<&NetworkConfig, RegistryError> {
        if identifier.is_empty() {
            return Err(RegistryError::validation(
                "network",
                "must be a non-empty network name or chain id",
            ));
        }
        let found = match identifier.parse::<u64>() {
            Ok(chain_id) => self.by_chain_id.get(&chain_id),
            Err(_) => self.by_name.get(&identifier.to_lowercase()),
        };
        found
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| RegistryError::NetworkNotFound {
                identifier: identifier.to_string(),
            })
    }

    pub fn by_chain_id(&self, chain_id: u64) -> Option<&NetworkConfig> {
        self.by_chain_id.get(&chain_id).map(|&idx| &self.entries[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkConfig> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All networks in table order, as discovery summaries.
    pub fn list(&self) -> Vec<NetworkInfo> {
        self.entries.iter().map(NetworkInfo::from).collect()
    }
}

fn builtin_entries(config: &Config) -> Vec<NetworkConfig> {
    use RegistryDeployment::{Evm, ZkSync};

    let alchemy = |slug: &str| -> String {
        format!(
            "https://{slug}.g.alchemy.com/v2/{}",
            config.alchemy_api_key
        )
    };
    let fixed = |url: &str| -> String { url.to_string() };

    let mut entries = vec![
        net("ethereum", "Ethereum", 1, Evm, alchemy("eth-mainnet")),
        net("apechain", "Apechain", 33139, Evm, alchemy("apechain-mainnet")),
        net("arbitrum", "Arbitrum One", 42161, Evm, alchemy("arb-mainnet")),
        net("arbitrum_nova", "Arbitrum Nova", 42170, Evm, alchemy("arbnova-mainnet")),
        net("avalanche", "Avalanche", 43114, Evm, alchemy("avax-mainnet")),
        net("base", "Base", 8453, Evm, alchemy("base-mainnet")),
        net("blast", "Blast", 238, Evm, alchemy("blast-mainnet")),
        net("bnb", "BNB Chain", 56, Evm, alchemy("bnb-mainnet")),
        net("canto", "Canto", 7700, Evm, fixed("https://canto-rpc.ansybl.io")),
        net("celo", "Celo", 42220, Evm, alchemy("celo-mainnet")),
        net("fantom", "Fantom", 250, Evm, alchemy("fantom-mainnet")),
        net("gnosis", "Gnosis", 100, Evm, alchemy("gnosis-mainnet")),
        net("hychain", "Hychain", 2911, Evm, fixed("https://rpc.hychain.com/http")),
        net("linea", "Linea", 59144, Evm, alchemy("linea-mainnet")),
        net("mantle", "Mantle", 5000, Evm, alchemy("mantle-mainnet")),
        net("moonbeam", "Moonbeam", 1284, Evm, fixed("https://rpc.api.moonbeam.network")),
        net("moonriver", "Moonriver", 1285, Evm, fixed("https://rpc.api.moonriver.moonbeam.network")),
        net("optimism", "Optimism", 10, Evm, alchemy("opt-mainnet")),
        net("polygon", "Polygon", 137, Evm, alchemy("polygon-mainnet")),
        net("polygon_zkevm", "Polygon zkEVM", 1101, Evm, alchemy("polygonzkevm-mainnet")),
        net("plume", "Plume", 98866, Evm, fixed("https://rpc.plume.org")),
        net("ronin", "Ronin", 2020, Evm, alchemy("ronin-mainnet")),
        net("sanko", "Sanko", 1996, Evm, fixed("https://mainnet.sanko.xyz")),
        net("scroll", "Scroll", 534352, Evm, alchemy("scroll-mainnet")),
        net("sei", "Sei", 1329, Evm, alchemy("sei-mainnet")),
        net("shape", "Shape", 360, Evm, alchemy("shape-mainnet")),
        net("taiko", "Taiko", 167000, Evm, fixed("https://rpc.taiko.xyz")),
        net("xai", "XAI", 660279, Evm, fixed("https://xai-chain.net/rpc")),
        net("zetachain", "ZetaChain", 7000, Evm, alchemy("zetachain-mainnet")),
        net("zora", "Zora", 7777777, Evm, alchemy("zora-mainnet")),
        net("abstract", "Abstract", 2741, ZkSync, alchemy("abstract-mainnet")),
        net("zksync_era", "zkSync Mainnet", 324, ZkSync, alchemy("zksync-mainnet")),
        net("treasure", "Treasure", 61166, ZkSync, fixed("https://rpc.treasure.lol")),
        net("ethereum_sepolia", "Ethereum Sepolia", 11155111, Evm, alchemy("eth-sepolia")),
        net("ethereum_holesky", "Ethereum Holesky", 17000, Evm, alchemy("eth-holesky")),
        net("abstract_sepolia", "Abstract Sepolia", 11124, Evm, alchemy("abstract-testnet")),
        net("base_sepolia", "Base Sepolia", 84532, Evm, alchemy("base-sepolia")),
        net("berachain_artio", "Berachain Bepolia", 80069, Evm, alchemy("berachain-bepolia")),
        net("ronin_testnet", "Ronin Testnet", 2021, Evm, alchemy("ronin-saigon")),
    ];

    for network in &mut entries {
        if let Some(url) = config.rpc_url_overrides.get(&network.name) {
            network.rpc_url = Some(url.clone());
        }
    }

    entries
}

fn net(
    name: &str,
    display_name: &str,
    chain_id: u64,
    deployment: RegistryDeployment,
    rpc_url: String,
) -> NetworkConfig {
    NetworkConfig {
        name: name.to_string(),
        display_name: display_name.to_string(),
        chain_id,
        deployment,
        rpc_url: Some(rpc_url),
    }
}
