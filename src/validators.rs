// src/validators.rs

//! Shape checks for the raw string inputs arriving through tool calls.
//!
//! Each validator takes the raw value plus the parameter name it arrived
//! under and either returns the parsed typed value or fails with a
//! `Validation` error naming that parameter. Values are rejected, never
//! coerced: no trimming, no sign handling, no hex/decimal guessing.

use std::str::FromStr;

use ethers_core::types::{Address, H256, U256};

use crate::error::RegistryError;

fn all_hex(body: &str) -> bool {
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Parses a 20-byte hex address (`0x` + 40 hex chars, any case).
/// Checksum case is deliberately not enforced.
pub fn address(value: &str, name: &str) -> Result<Address, RegistryError> {
    let expected = "must be a 0x-prefixed hex address of 40 characters";
    let body = value.strip_prefix("0x").unwrap_or("");
    if body.len() != 40 || !all_hex(body) {
        return Err(RegistryError::validation(name, expected));
    }
    Address::from_str(value).map_err(|_| RegistryError::validation(name, expected))
}

/// Parses a 32-byte hex value (`0x` + exactly 64 hex chars).
pub fn bytes32(value: &str, name: &str) -> Result<H256, RegistryError> {
    let expected = "must be a 0x-prefixed hex string of 64 characters";
    let body = value.strip_prefix("0x").unwrap_or("");
    if body.len() != 64 || !all_hex(body) {
        return Err(RegistryError::validation(name, expected));
    }
    H256::from_str(value).map_err(|_| RegistryError::validation(name, expected))
}

/// Parses a non-negative base-10 integer string into a `U256`.
/// Signs, whitespace, `0x` prefixes, and values past 2^256-1 all fail;
/// nothing is truncated.
pub fn decimal(value: &str, name: &str) -> Result<U256, RegistryError> {
    let expected = "must be a non-negative decimal string";
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RegistryError::validation(name, expected));
    }
    U256::from_dec_str(value).map_err(|_| RegistryError::validation(name, expected))
}
