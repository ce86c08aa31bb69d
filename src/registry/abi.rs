// src/registry/abi.rs

//! Hard-coded Delegate Registry v2 interface.
//!
//! Selector derivation, calldata assembly, and return-data decoding for the
//! registry's fixed function set. Nothing in this module touches the
//! network; everything is deterministic byte manipulation.

use ethers_core::abi::{decode, encode, ParamType, Token};
use ethers_core::types::{Bytes, H256};
use ethers_core::utils::keccak256;

use crate::error::RegistryError;
use crate::registry::models::{Delegation, DelegationType};

/// Canonical function signatures. Selectors are derived from these strings,
/// so they must match the deployed interface character for character.
pub mod sig {
    pub const MULTICALL: &str = "multicall(bytes[])";
    pub const DELEGATE_ALL: &str = "delegateAll(address,bytes32,bool)";
    pub const DELEGATE_CONTRACT: &str = "delegateContract(address,address,bytes32,bool)";
    pub const DELEGATE_ERC721: &str = "delegateERC721(address,address,uint256,bytes32,bool)";
    pub const DELEGATE_ERC20: &str = "delegateERC20(address,address,bytes32,uint256)";
    pub const DELEGATE_ERC1155: &str =
        "delegateERC1155(address,address,uint256,bytes32,uint256)";

    pub const CHECK_ALL: &str = "checkDelegateForAll(address,address,bytes32)";
    pub const CHECK_CONTRACT: &str = "checkDelegateForContract(address,address,address,bytes32)";
    pub const CHECK_ERC721: &str =
        "checkDelegateForERC721(address,address,address,uint256,bytes32)";
    pub const CHECK_ERC20: &str = "checkDelegateForERC20(address,address,address,bytes32)";
    pub const CHECK_ERC1155: &str =
        "checkDelegateForERC1155(address,address,address,uint256,bytes32)";

    pub const INCOMING_DELEGATIONS: &str = "getIncomingDelegations(address)";
    pub const OUTGOING_DELEGATIONS: &str = "getOutgoingDelegations(address)";
    pub const INCOMING_DELEGATION_HASHES: &str = "getIncomingDelegationHashes(address)";
    pub const OUTGOING_DELEGATION_HASHES: &str = "getOutgoingDelegationHashes(address)";
    pub const DELEGATIONS_FROM_HASHES: &str = "getDelegationsFromHashes(bytes32[])";
}

pub fn selector(signature: &str) -> [u8; 4] {
    let mut sel = [0u8; 4];
    sel.copy_from_slice(&keccak256(signature.as_bytes())[0..4]);
    sel
}

/// selector ++ ABI-encoded argument tuple.
pub fn encode_call(signature: &str, tokens: Vec<Token>) -> Bytes {
    let mut out = selector(signature).to_vec();
    let mut tail = encode(&tokens);
    out.append(&mut tail);
    Bytes::from(out)
}

/// A bytes32 argument in token form.
pub fn fixed_bytes(value: H256) -> Token {
    Token::FixedBytes(value.as_bytes().to_vec())
}

fn decode_error(function: &'static str, reason: impl Into<String>) -> RegistryError {
    RegistryError::Encoding {
        function,
        reason: reason.into(),
    }
}

pub fn decode_bool(function: &'static str, data: &[u8]) -> Result<bool, RegistryError> {
    let tokens =
        decode(&[ParamType::Bool], data).map_err(|e| decode_error(function, e.to_string()))?;
    match tokens.into_iter().next() {
        Some(Token::Bool(flag)) => Ok(flag),
        _ => Err(decode_error(function, "expected a bool word")),
    }
}

pub fn decode_uint(function: &'static str, data: &[u8]) -> Result<ethers_core::types::U256, RegistryError> {
    let tokens = decode(&[ParamType::Uint(256)], data)
        .map_err(|e| decode_error(function, e.to_string()))?;
    match tokens.into_iter().next() {
        Some(Token::Uint(value)) => Ok(value),
        _ => Err(decode_error(function, "expected a uint256 word")),
    }
}

pub fn decode_hashes(function: &'static str, data: &[u8]) -> Result<Vec<H256>, RegistryError> {
    let tokens = decode(&[ParamType::Array(Box::new(ParamType::FixedBytes(32)))], data)
        .map_err(|e| decode_error(function, e.to_string()))?;
    let items = match tokens.into_iter().next() {
        Some(Token::Array(items)) => items,
        _ => return Err(decode_error(function, "expected a bytes32 array")),
    };
    items
        .into_iter()
        .map(|item| match item {
            Token::FixedBytes(bytes) if bytes.len() == 32 => Ok(H256::from_slice(&bytes)),
            _ => Err(decode_error(function, "expected a bytes32 element")),
        })
        .collect()
}

/// The registry's Delegation struct layout:
/// (uint8 type, address to, address from, bytes32 rights, address contract,
/// uint256 tokenId, uint256 amount).
fn delegation_param() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::Uint(8),
        ParamType::Address,
        ParamType::Address,
        ParamType::FixedBytes(32),
        ParamType::Address,
        ParamType::Uint(256),
        ParamType::Uint(256),
    ])
}

pub fn decode_delegations(
    function: &'static str,
    data: &[u8],
) -> Result<Vec<Delegation>, RegistryError> {
    let tokens = decode(&[ParamType::Array(Box::new(delegation_param()))], data)
        .map_err(|e| decode_error(function, e.to_string()))?;
    let items = match tokens.into_iter().next() {
        Some(Token::Array(items)) => items,
        _ => return Err(decode_error(function, "expected a delegation array")),
    };
    items
        .into_iter()
        .map(|item| delegation_from_token(function, item))
        .collect()
}

fn delegation_from_token(
    function: &'static str,
    token: Token,
) -> Result<Delegation, RegistryError> {
    let fields = match token {
        Token::Tuple(fields) => fields,
        _ => return Err(decode_error(function, "expected a delegation tuple")),
    };
    match fields.as_slice() {
        [Token::Uint(kind), Token::Address(to), Token::Address(from), Token::FixedBytes(rights), Token::Address(contract), Token::Uint(token_id), Token::Uint(amount)]
            if rights.len() == 32 =>
        {
            let delegation_type = DelegationType::from_wire(*kind).ok_or_else(|| {
                decode_error(function, format!("unknown delegation type {kind}"))
            })?;
            Ok(Delegation {
                delegation_type,
                from: *from,
                to: *to,
                rights: H256::from_slice(rights),
                contract: *contract,
                token_id: *token_id,
                amount: *amount,
            })
        }
        _ => Err(decode_error(function, "malformed delegation tuple")),
    }
}
