// src/config.rs

use std::collections::HashMap;
use std::env;

use anyhow::{Context, Result};

// All process configuration, loaded once at startup from the environment
// (with .env support). Nothing here changes after `from_env` returns.
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// API key substituted into the Alchemy endpoint template used by most
    /// built-in networks. The server refuses to start without it.
    pub alchemy_api_key: String,

    /// Outbound eth_call timeout, in seconds.
    pub rpc_timeout_secs: u64,

    /// Per-network RPC endpoint replacements, keyed by lowercase network
    /// name. Overrides win over the built-in endpoint for that network.
    pub rpc_url_overrides: HashMap<String, String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();

        let alchemy_api_key = env::var("ALCHEMY_API_KEY")
            .context("ALCHEMY_API_KEY must be set (used to build RPC endpoints)")?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let rpc_timeout_secs = env::var("RPC_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("RPC_TIMEOUT_SECS must be a valid number of seconds")?;

        let rpc_url_overrides = match env::var("RPC_URL_OVERRIDES") {
            Ok(raw) => serde_json::from_str(&raw)
                .context("RPC_URL_OVERRIDES must be a JSON map of network name -> RPC URL")?,
            Err(_) => HashMap::new(),
        };

        Ok(Config {
            port,
            alchemy_api_key,
            rpc_timeout_secs,
            rpc_url_overrides,
        })
    }
}
