// src/registry/models.rs

use ethers_core::types::{Address, Bytes, H256, U256};
use ethers_core::utils::to_checksum;
use serde::{Serialize, Serializer};

/// Delegation scope discriminant as stored on chain. `None` only shows up in
/// rows whose delegation has been revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DelegationType {
    None,
    All,
    Contract,
    Erc721,
    Erc20,
    Erc1155,
}

impl DelegationType {
    /// Maps the on-chain uint8 enum slot. Values past the last variant are
    /// rejected rather than clamped.
    pub fn from_wire(value: U256) -> Option<Self> {
        if value > U256::from(5u64) {
            return None;
        }
        Some(match value.low_u64() {
            0 => Self::None,
            1 => Self::All,
            2 => Self::Contract,
            3 => Self::Erc721,
            4 => Self::Erc20,
            _ => Self::Erc1155,
        })
    }
}

/// One delegation row from the registry's enumeration calls.
///
/// `to` is the delegatee, `from` the delegator. `contract` is the zero
/// address for ALL-scoped rows; `tokenId`/`amount` are zero where the scope
/// has no use for them, and cross the JSON boundary as decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegation {
    pub delegation_type: DelegationType,
    #[serde(serialize_with = "address_checksum")]
    pub from: Address,
    #[serde(serialize_with = "address_checksum")]
    pub to: Address,
    #[serde(serialize_with = "h256_hex")]
    pub rights: H256,
    #[serde(serialize_with = "address_checksum")]
    pub contract: Address,
    #[serde(serialize_with = "u256_decimal")]
    pub token_id: U256,
    #[serde(serialize_with = "u256_decimal")]
    pub amount: U256,
}

/// A fully-encoded registry call, ready for external signing. The registry's
/// write functions are all non-payable, so `value` is always zero; it still
/// crosses the boundary as the decimal string "0" like every other big
/// integer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedTransaction {
    #[serde(serialize_with = "address_checksum")]
    pub to: Address,
    pub data: Bytes,
    #[serde(serialize_with = "u256_decimal")]
    pub value: U256,
    pub chain_id: u64,
}

pub(crate) fn address_checksum<S: Serializer>(addr: &Address, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&to_checksum(addr, None))
}

pub(crate) fn h256_hex<S: Serializer>(hash: &H256, s: S) -> Result<S::Ok, S::Error> {
    // Debug renders the full 0x-prefixed hex; Display would truncate
    s.serialize_str(&format!("{hash:?}"))
}

pub(crate) fn u256_decimal<S: Serializer>(value: &U256, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&value.to_string())
}
