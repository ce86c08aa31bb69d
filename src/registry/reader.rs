// src/registry/reader.rs

//! Read-side registry access.
//!
//! One `Provider<Http>` per configured network, all sharing a single
//! reqwest client so the configured timeout applies everywhere. Each
//! operation is a single eth_call round trip against the network's registry
//! deployment followed by an ABI decode; results are never cached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ethers::providers::{Http, Middleware, Provider};
use ethers_core::abi::Token;
use ethers_core::types::transaction::eip2718::TypedTransaction;
use ethers_core::types::{Address, Bytes, TransactionRequest, H256, U256};

use crate::config::Config;
use crate::error::RegistryError;
use crate::networks::{NetworkConfig, NetworkDirectory};
use crate::registry::abi::{self, sig};
use crate::registry::models::Delegation;

/// Client for the registry's read functions across all configured networks.
#[derive(Clone)]
pub struct RegistryClient {
    providers: HashMap<u64, Arc<Provider<Http>>>,
}

impl RegistryClient {
    /// Creates one provider per network with an RPC endpoint. Endpoints
    /// that fail to parse are skipped with a warning; calls against those
    /// networks later fail the same way as unconfigured ones.
    pub fn new(config: &Config, directory: &NetworkDirectory) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()?;

        let mut providers = HashMap::new();
        for network in directory.iter() {
            let rpc_url = match network.rpc_url.as_deref() {
                Some(url) => url,
                None => continue,
            };
            match url::Url::parse(rpc_url) {
                Ok(url) => {
                    let provider = Provider::new(Http::new_with_client(url, http_client.clone()));
                    providers.insert(network.chain_id, Arc::new(provider));
                }
                Err(e) => {
                    tracing::warn!(
                        "Skipping invalid RPC URL for network {}: {}",
                        network.name,
                        e
                    );
                }
            }
        }

        Ok(Self { providers })
    }

    fn provider(&self, network: &NetworkConfig) -> Result<Arc<Provider<Http>>, RegistryError> {
        self.providers
            .get(&network.chain_id)
            .cloned()
            .ok_or_else(|| RegistryError::Configuration {
                network: network.display_name.clone(),
            })
    }

    /// eth_call against the network's registry deployment.
    async fn call(
        &self,
        network: &NetworkConfig,
        function: &'static str,
        data: Bytes,
    ) -> Result<Bytes, RegistryError> {
        // provider lookup happens before any I/O so unconfigured networks
        // fail without touching the wire
        let provider = self.provider(network)?;
        let tx: TypedTransaction = TransactionRequest::new()
            .to(network.registry_address())
            .data(data)
            .into();
        provider
            .call(&tx, None)
            .await
            .map_err(|e| RegistryError::NetworkCall {
                function,
                message: e.to_string(),
            })
    }

    pub async fn check_delegate_for_all(
        &self,
        delegatee: Address,
        delegator: Address,
        rights: H256,
        network: &NetworkConfig,
    ) -> Result<bool, RegistryError> {
        let data = abi::encode_call(
            sig::CHECK_ALL,
            vec![
                Token::Address(delegatee),
                Token::Address(delegator),
                abi::fixed_bytes(rights),
            ],
        );
        let raw = self.call(network, "checkDelegateForAll", data).await?;
        abi::decode_bool("checkDelegateForAll", &raw)
    }

    pub async fn check_delegate_for_contract(
        &self,
        delegatee: Address,
        delegator: Address,
        contract: Address,
        rights: H256,
        network: &NetworkConfig,
    ) -> Result<bool, RegistryError> {
        let data = abi::encode_call(
            sig::CHECK_CONTRACT,
            vec![
                Token::Address(delegatee),
                Token::Address(delegator),
                Token::Address(contract),
                abi::fixed_bytes(rights),
            ],
        );
        let raw = self.call(network, "checkDelegateForContract", data).await?;
        abi::decode_bool("checkDelegateForContract", &raw)
    }

    pub async fn check_delegate_for_erc721(
        &self,
        delegatee: Address,
        delegator: Address,
        contract: Address,
        token_id: U256,
        rights: H256,
        network: &NetworkConfig,
    ) -> Result<bool, RegistryError> {
        let data = abi::encode_call(
            sig::CHECK_ERC721,
            vec![
                Token::Address(delegatee),
                Token::Address(delegator),
                Token::Address(contract),
                Token::Uint(token_id),
                abi::fixed_bytes(rights),
            ],
        );
        let raw = self.call(network, "checkDelegateForERC721", data).await?;
        abi::decode_bool("checkDelegateForERC721", &raw)
    }

    /// Returns the delegated allowance; zero means no delegation.
    pub async fn check_delegate_for_erc20(
        &self,
        delegatee: Address,
        delegator: Address,
        contract: Address,
        rights: H256,
        network: &NetworkConfig,
    ) -> Result<U256, RegistryError> {
        let data = abi::encode_call(
            sig::CHECK_ERC20,
            vec![
                Token::Address(delegatee),
                Token::Address(delegator),
                Token::Address(contract),
                abi::fixed_bytes(rights),
            ],
        );
        let raw = self.call(network, "checkDelegateForERC20", data).await?;
        abi::decode_uint("checkDelegateForERC20", &raw)
    }

    /// Returns the delegated token amount; zero means no delegation.
    pub async fn check_delegate_for_erc1155(
        &self,
        delegatee: Address,
        delegator: Address,
        contract: Address,
        token_id: U256,
        rights: H256,
        network: &NetworkConfig,
    ) -> Result<U256, RegistryError> {
        let data = abi::encode_call(
            sig::CHECK_ERC1155,
            vec![
                Token::Address(delegatee),
                Token::Address(delegator),
                Token::Address(contract),
                Token::Uint(token_id),
                abi::fixed_bytes(rights),
            ],
        );
        let raw = self.call(network, "checkDelegateForERC1155", data).await?;
        abi::decode_uint("checkDelegateForERC1155", &raw)
    }

    /// Delegations where `address` is the delegatee.
    pub async fn incoming_delegations(
        &self,
        address: Address,
        network: &NetworkConfig,
    ) -> Result<Vec<Delegation>, RegistryError> {
        let data = abi::encode_call(sig::INCOMING_DELEGATIONS, vec![Token::Address(address)]);
        let raw = self.call(network, "getIncomingDelegations", data).await?;
        abi::decode_delegations("getIncomingDelegations", &raw)
    }

    /// Delegations where `address` is the delegator.
    pub async fn outgoing_delegations(
        &self,
        address: Address,
        network: &NetworkConfig,
    ) -> Result<Vec<Delegation>, RegistryError> {
        let data = abi::encode_call(sig::OUTGOING_DELEGATIONS, vec![Token::Address(address)]);
        let raw = self.call(network, "getOutgoingDelegations", data).await?;
        abi::decode_delegations("getOutgoingDelegations", &raw)
    }

    pub async fn incoming_delegation_hashes(
        &self,
        address: Address,
        network: &NetworkConfig,
    ) -> Result<Vec<H256>, RegistryError> {
        let data = abi::encode_call(sig::INCOMING_DELEGATION_HASHES, vec![Token::Address(address)]);
        let raw = self.call(network, "getIncomingDelegationHashes", data).await?;
        abi::decode_hashes("getIncomingDelegationHashes", &raw)
    }

    pub async fn outgoing_delegation_hashes(
        &self,
        address: Address,
        network: &NetworkConfig,
    ) -> Result<Vec<H256>, RegistryError> {
        let data = abi::encode_call(sig::OUTGOING_DELEGATION_HASHES, vec![Token::Address(address)]);
        let raw = self.call(network, "getOutgoingDelegationHashes", data).await?;
        abi::decode_hashes("getOutgoingDelegationHashes", &raw)
    }

    pub async fn delegations_from_hashes(
        &self,
        hashes: Vec<H256>,
        network: &NetworkConfig,
    ) -> Result<Vec<Delegation>, RegistryError> {
        let elements = hashes.into_iter().map(abi::fixed_bytes).collect();
        let data = abi::encode_call(sig::DELEGATIONS_FROM_HASHES, vec![Token::Array(elements)]);
        let raw = self.call(network, "getDelegationsFromHashes", data).await?;
        abi::decode_delegations("getDelegationsFromHashes", &raw)
    }
}
