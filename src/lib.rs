#![recursion_limit = "256"]
// src/lib.rs

use std::sync::Arc;

// Re-export commonly used types
pub use ethers::types::{Address, H256, U256};

// Re-export modules
pub mod config;
pub mod error;
pub mod mcp;
pub mod networks;
pub mod registry;
pub mod utils;
pub mod validators;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Immutable directory of every supported network
    pub networks: Arc<networks::NetworkDirectory>,
    /// Read-side client for the registry deployments
    pub registry: registry::RegistryClient,
}
