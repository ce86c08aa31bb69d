// src/error.rs

use thiserror::Error;

/// Failure kinds surfaced by the registry tool pipeline. Everything here is
/// converted into a `{success: false, error}` envelope at the MCP boundary;
/// only the display text crosses the wire.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A raw string parameter did not match its expected shape.
    #[error("Invalid {name}: {expected}")]
    Validation { name: String, expected: String },

    /// The network identifier matched neither a chain id nor a name key.
    #[error("Network \"{identifier}\" not supported")]
    NetworkNotFound { identifier: String },

    /// The network is known but has no usable RPC endpoint.
    #[error("No RPC URL configured for network: {network}")]
    Configuration { network: String },

    /// Return data from the registry did not decode as the declared ABI type.
    #[error("Could not decode {function} return data: {reason}")]
    Encoding {
        function: &'static str,
        reason: String,
    },

    /// The RPC transport failed or the contract call reverted.
    #[error("Registry call {function} failed: {message}")]
    NetworkCall {
        function: &'static str,
        message: String,
    },
}

impl RegistryError {
    pub fn validation(name: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Validation {
            name: name.into(),
            expected: expected.into(),
        }
    }
}
