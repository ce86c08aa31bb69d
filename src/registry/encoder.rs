// src/registry/encoder.rs

//! Write-payload builders.
//!
//! Each registry write operation gets one parameter struct, built only from
//! already-validated typed values, and one builder returning the
//! [`UnsignedTransaction`] a caller signs elsewhere. Builders are pure:
//! identical inputs produce byte-identical calldata.

use ethers_core::abi::Token;
use ethers_core::types::{Address, Bytes, H256, U256};

use crate::networks::NetworkConfig;
use crate::registry::abi::{self, sig};
use crate::registry::models::UnsignedTransaction;

/// Batch of pre-encoded registry calls, forwarded verbatim. Sub-calls are
/// bytes32-shaped by the time they get here; their inner semantics are the
/// caller's problem.
#[derive(Debug, Clone)]
pub struct MulticallParams {
    pub encoded_calls: Vec<H256>,
}

#[derive(Debug, Clone)]
pub struct DelegateAllParams {
    pub delegatee: Address,
    pub rights: H256,
    pub enable: bool,
}

#[derive(Debug, Clone)]
pub struct DelegateContractParams {
    pub delegatee: Address,
    pub contract: Address,
    pub rights: H256,
    pub enable: bool,
}

#[derive(Debug, Clone)]
pub struct DelegateErc721Params {
    pub delegatee: Address,
    pub contract: Address,
    pub token_id: U256,
    pub rights: H256,
    pub enable: bool,
}

#[derive(Debug, Clone)]
pub struct DelegateErc20Params {
    pub delegatee: Address,
    pub contract: Address,
    pub rights: H256,
    pub amount: U256,
}

#[derive(Debug, Clone)]
pub struct DelegateErc1155Params {
    pub delegatee: Address,
    pub contract: Address,
    pub token_id: U256,
    pub rights: H256,
    pub amount: U256,
}

pub fn multicall(params: &MulticallParams, network: &NetworkConfig) -> UnsignedTransaction {
    let calls = params
        .encoded_calls
        .iter()
        .map(|call| Token::Bytes(call.as_bytes().to_vec()))
        .collect();
    unsigned(abi::encode_call(sig::MULTICALL, vec![Token::Array(calls)]), network)
}

pub fn delegate_all(params: &DelegateAllParams, network: &NetworkConfig) -> UnsignedTransaction {
    let data = abi::encode_call(
        sig::DELEGATE_ALL,
        vec![
            Token::Address(params.delegatee),
            abi::fixed_bytes(params.rights),
            Token::Bool(params.enable),
        ],
    );
    unsigned(data, network)
}

pub fn delegate_contract(
    params: &DelegateContractParams,
    network: &NetworkConfig,
) -> UnsignedTransaction {
    let data = abi::encode_call(
        sig::DELEGATE_CONTRACT,
        vec![
            Token::Address(params.delegatee),
            Token::Address(params.contract),
            abi::fixed_bytes(params.rights),
            Token::Bool(params.enable),
        ],
    );
    unsigned(data, network)
}

pub fn delegate_erc721(
    params: &DelegateErc721Params,
    network: &NetworkConfig,
) -> UnsignedTransaction {
    let data = abi::encode_call(
        sig::DELEGATE_ERC721,
        vec![
            Token::Address(params.delegatee),
            Token::Address(params.contract),
            Token::Uint(params.token_id),
            abi::fixed_bytes(params.rights),
            Token::Bool(params.enable),
        ],
    );
    unsigned(data, network)
}

pub fn delegate_erc20(
    params: &DelegateErc20Params,
    network: &NetworkConfig,
) -> UnsignedTransaction {
    let data = abi::encode_call(
        sig::DELEGATE_ERC20,
        vec![
            Token::Address(params.delegatee),
            Token::Address(params.contract),
            abi::fixed_bytes(params.rights),
            Token::Uint(params.amount),
        ],
    );
    unsigned(data, network)
}

pub fn delegate_erc1155(
    params: &DelegateErc1155Params,
    network: &NetworkConfig,
) -> UnsignedTransaction {
    let data = abi::encode_call(
        sig::DELEGATE_ERC1155,
        vec![
            Token::Address(params.delegatee),
            Token::Address(params.contract),
            Token::Uint(params.token_id),
            abi::fixed_bytes(params.rights),
            Token::Uint(params.amount),
        ],
    );
    unsigned(data, network)
}

fn unsigned(data: Bytes, network: &NetworkConfig) -> UnsignedTransaction {
    UnsignedTransaction {
        to: network.registry_address(),
        data,
        value: U256::zero(),
        chain_id: network.chain_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks::{NetworkConfig, RegistryDeployment, DELEGATE_REGISTRY_ZKSYNC};
    use ethers_core::abi::{decode, ParamType};

    fn ethereum() -> NetworkConfig {
        NetworkConfig {
            name: "ethereum".to_string(),
            display_name: "Ethereum".to_string(),
            chain_id: 1,
            deployment: RegistryDeployment::Evm,
            rpc_url: None,
        }
    }

    fn abstract_chain() -> NetworkConfig {
        NetworkConfig {
            name: "abstract".to_string(),
            display_name: "Abstract".to_string(),
            chain_id: 2741,
            deployment: RegistryDeployment::ZkSync,
            rpc_url: None,
        }
    }

    #[test]
    fn test_delegate_all_roundtrip() {
        let params = DelegateAllParams {
            delegatee: Address::repeat_byte(0xaa),
            rights: H256::repeat_byte(0x0b),
            enable: true,
        };
        let tx = delegate_all(&params, &ethereum());

        assert_eq!(tx.chain_id, 1);
        assert_eq!(tx.value, U256::zero());
        assert_eq!(&tx.data[0..4], &abi::selector(sig::DELEGATE_ALL));
        // independent decode of the argument section
        let tokens = decode(
            &[ParamType::Address, ParamType::FixedBytes(32), ParamType::Bool],
            &tx.data[4..],
        )
        .unwrap();
        assert_eq!(tokens[0], Token::Address(params.delegatee));
        assert_eq!(tokens[1], Token::FixedBytes(params.rights.as_bytes().to_vec()));
        assert_eq!(tokens[2], Token::Bool(true));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let params = DelegateContractParams {
            delegatee: Address::repeat_byte(0x01),
            contract: Address::repeat_byte(0x02),
            rights: H256::zero(),
            enable: false,
        };
        let a = delegate_contract(&params, &ethereum());
        let b = delegate_contract(&params, &ethereum());
        assert_eq!(a, b);
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn test_erc721_huge_token_id_survives() {
        let token_id = U256::from_dec_str("123456789012345678901234567890").unwrap();
        let params = DelegateErc721Params {
            delegatee: Address::repeat_byte(0xab),
            contract: Address::repeat_byte(0xcd),
            token_id,
            rights: H256::zero(),
            enable: false,
        };
        let tx = delegate_erc721(&params, &ethereum());

        // 4-byte selector plus five words
        assert_eq!(tx.data.len(), 4 + 5 * 32);
        let tokens = decode(
            &[
                ParamType::Address,
                ParamType::Address,
                ParamType::Uint(256),
                ParamType::FixedBytes(32),
                ParamType::Bool,
            ],
            &tx.data[4..],
        )
        .unwrap();
        assert_eq!(tokens[2], Token::Uint(token_id));
        assert_eq!(tokens[4], Token::Bool(false));
    }

    #[test]
    fn test_erc20_argument_order() {
        let params = DelegateErc20Params {
            delegatee: Address::repeat_byte(0x01),
            contract: Address::repeat_byte(0x02),
            rights: H256::repeat_byte(0x03),
            amount: U256::from(500u64),
        };
        let tx = delegate_erc20(&params, &ethereum());
        let tokens = decode(
            &[
                ParamType::Address,
                ParamType::Address,
                ParamType::FixedBytes(32),
                ParamType::Uint(256),
            ],
            &tx.data[4..],
        )
        .unwrap();
        // rights comes before amount in this signature
        assert_eq!(tokens[2], Token::FixedBytes(params.rights.as_bytes().to_vec()));
        assert_eq!(tokens[3], Token::Uint(U256::from(500u64)));
    }

    #[test]
    fn test_multicall_exact_layout() {
        let params = MulticallParams {
            encoded_calls: vec![H256::zero()],
        };
        let tx = multicall(&params, &ethereum());

        // selector, arg offset, array length, element offset, element
        // length, element bytes
        let expected = format!(
            "ac9650d8{:064x}{:064x}{:064x}{:064x}{}",
            0x20,
            1,
            0x20,
            0x20,
            "00".repeat(32)
        );
        assert_eq!(hex::encode(&tx.data), expected);
    }

    #[test]
    fn test_target_follows_network_deployment() {
        let params = DelegateAllParams {
            delegatee: Address::repeat_byte(0x01),
            rights: H256::zero(),
            enable: true,
        };
        let tx = delegate_all(&params, &abstract_chain());
        assert_eq!(tx.to, DELEGATE_REGISTRY_ZKSYNC);
        assert_eq!(tx.chain_id, 2741);
        // same args, different network: identical calldata
        assert_eq!(tx.data, delegate_all(&params, &ethereum()).data);
    }
}
