//! Tests for the MCP tool facade: dispatch, envelopes, and transaction
//! preparation. Everything here runs without touching any RPC endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use delegate_registry_mcp::{
    config::Config,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
    },
    networks::{NetworkConfig, NetworkDirectory, RegistryDeployment},
    registry::RegistryClient,
    AppState,
};

const REGISTRY_EVM: &str = "0x00000000000000447e69651d841bD8D104Bed493";
const DELEGATEE: &str = "0xaAaAaAaaAaAaAaaAaAAAAAAAAaaaAaAaAaaAaaAa";
const DELEGATOR: &str = "0xBbbbBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB";
const CONTRACT: &str = "0xcCccccccCcCCCcCcccCccccCcCcCCCcCCCCcCcCc";
const ZERO_RIGHTS: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

fn test_config() -> Config {
    Config {
        port: 8080,
        alchemy_api_key: "test-key".to_string(),
        rpc_timeout_secs: 1,
        rpc_url_overrides: HashMap::new(),
    }
}

fn test_state() -> AppState {
    let config = test_config();
    let networks = Arc::new(NetworkDirectory::new(&config));
    let registry = RegistryClient::new(&config, &networks).unwrap();
    AppState {
        config,
        networks,
        registry,
    }
}

/// State whose only network has no RPC endpoint configured.
fn offline_state() -> AppState {
    let config = test_config();
    let networks = Arc::new(NetworkDirectory::from_entries(vec![NetworkConfig {
        name: "island".to_string(),
        display_name: "Island".to_string(),
        chain_id: 4242,
        deployment: RegistryDeployment::Evm,
        rpc_url: None,
    }]));
    let registry = RegistryClient::new(&config, &networks).unwrap();
    AppState {
        config,
        networks,
        registry,
    }
}

async fn call_tool(state: AppState, name: &str, args: Value) -> Response {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: json!(1),
        method: "tools/call".to_string(),
        params: Some(json!({ "name": name, "arguments": args })),
    };
    handle_mcp_request(req, state)
        .await
        .expect("tool calls always produce a response")
}

fn success_body(resp: Response) -> Value {
    assert!(resp.error.is_none(), "expected a JSON-RPC success");
    resp.result.expect("success responses carry a result")
}

#[tokio::test]
async fn test_initialize_reports_protocol_and_server() {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: json!(1),
        method: "initialize".to_string(),
        params: None,
    };
    let resp = handle_mcp_request(req, test_state()).await.unwrap();
    let result = success_body(resp);
    assert_eq!(result["protocolVersion"], json!("2025-06-18"));
    assert_eq!(result["serverInfo"]["name"], json!("delegate_registry_mcp"));
    assert_eq!(result["capabilities"]["tools"]["listChanged"], json!(false));
}

#[tokio::test]
async fn test_tools_list_exposes_all_registry_tools() {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: json!(2),
        method: "tools/list".to_string(),
        params: None,
    };
    let resp = handle_mcp_request(req, test_state()).await.unwrap();
    let result = success_body(resp);
    let tools = result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 18);

    let names: Vec<&str> = tools
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    for expected in [
        "getSupportedNetworks",
        "getNetworkInfo",
        "multicall",
        "delegateAll",
        "delegateContract",
        "delegateERC721",
        "delegateERC20",
        "delegateERC1155",
        "checkDelegateForAll",
        "checkDelegateForContract",
        "checkDelegateForERC721",
        "checkDelegateForERC20",
        "checkDelegateForERC1155",
        "getIncomingDelegations",
        "getOutgoingDelegations",
        "getIncomingDelegationHashes",
        "getOutgoingDelegationHashes",
        "getDelegationsFromHashes",
    ] {
        assert!(names.contains(&expected), "missing tool {expected}");
    }
    for tool in tools {
        assert_eq!(tool["inputSchema"]["type"], json!("object"));
    }
}

#[tokio::test]
async fn test_get_supported_networks() {
    let resp = call_tool(test_state(), "getSupportedNetworks", json!({})).await;
    let result = success_body(resp);
    assert_eq!(result["success"], json!(true));

    let networks = result["networks"].as_array().unwrap();
    assert_eq!(networks.len(), 39);
    assert_eq!(networks[0]["displayName"], json!("Ethereum"));
    assert_eq!(networks[0]["chainId"], json!(1));
    assert_eq!(networks[0]["registryAddress"], json!(REGISTRY_EVM));
}

#[tokio::test]
async fn test_get_network_info_accepts_name_or_chain_id() {
    let by_id = success_body(
        call_tool(
            test_state(),
            "getNetworkInfo",
            json!({"networkIdentifier": "1"}),
        )
        .await,
    );
    let by_name = success_body(
        call_tool(
            test_state(),
            "getNetworkInfo",
            json!({"networkIdentifier": "ethereum"}),
        )
        .await,
    );
    assert_eq!(by_id["networkInfo"], by_name["networkInfo"]);
    assert_eq!(by_id["networkInfo"]["chainId"], json!(1));

    let zksync = success_body(
        call_tool(
            test_state(),
            "getNetworkInfo",
            json!({"networkIdentifier": "zksync_era"}),
        )
        .await,
    );
    assert_eq!(
        zksync["networkInfo"]["registryAddress"],
        json!("0x0000000059A24EB229eED07Ac44229DB56C5d797")
    );
}

#[tokio::test]
async fn test_multicall_produces_exact_calldata_layout() {
    let call = format!("0x{}", "11".repeat(32));
    let resp = call_tool(
        test_state(),
        "multicall",
        json!({"encodedCalls": [call], "network": "1"}),
    )
    .await;
    let result = success_body(resp);
    assert_eq!(result["success"], json!(true));

    let tx = &result["transactionParameters"];
    assert_eq!(tx["to"], json!(REGISTRY_EVM));
    assert_eq!(tx["value"], json!("0"));
    assert_eq!(tx["chainId"], json!(1));

    // selector + array offset + length 1 + element offset + element length
    // + the 32 payload bytes
    let expected = format!(
        "0xac9650d8{:064x}{:064x}{:064x}{:064x}{}",
        0x20,
        1,
        0x20,
        0x20,
        "11".repeat(32)
    );
    assert_eq!(tx["data"], json!(expected));
}

#[tokio::test]
async fn test_delegate_erc721_carries_huge_token_id() {
    let resp = call_tool(
        test_state(),
        "delegateERC721",
        json!({
            "delegatee": DELEGATEE,
            "contractToDelegate": CONTRACT,
            "tokenId": "123456789012345678901234567890",
            "rights": ZERO_RIGHTS,
            "enable": false,
            "network": "ethereum"
        }),
    )
    .await;
    let result = success_body(resp);
    assert_eq!(result["success"], json!(true));

    let tx = &result["transactionParameters"];
    assert_eq!(tx["chainId"], json!(1));
    let data = tx["data"].as_str().unwrap();
    // 4-byte selector plus five ABI words
    assert_eq!(data.len(), 2 + 2 * (4 + 5 * 32));

    let raw = hex::decode(&data[2..]).unwrap();
    let decoded = ethers_core::abi::decode(
        &[
            ethers_core::abi::ParamType::Address,
            ethers_core::abi::ParamType::Address,
            ethers_core::abi::ParamType::Uint(256),
            ethers_core::abi::ParamType::FixedBytes(32),
            ethers_core::abi::ParamType::Bool,
        ],
        &raw[4..],
    )
    .unwrap();
    assert_eq!(
        decoded[2],
        ethers_core::abi::Token::Uint(
            ethers_core::types::U256::from_dec_str("123456789012345678901234567890").unwrap()
        )
    );
    assert_eq!(decoded[4], ethers_core::abi::Token::Bool(false));
}

#[tokio::test]
async fn test_delegate_all_targets_network_registry() {
    let resp = call_tool(
        test_state(),
        "delegateAll",
        json!({
            "delegatee": DELEGATEE,
            "rights": ZERO_RIGHTS,
            "enable": true,
            "network": "zksync_era"
        }),
    )
    .await;
    let result = success_body(resp);
    let tx = &result["transactionParameters"];
    assert_eq!(tx["to"], json!("0x0000000059A24EB229eED07Ac44229DB56C5d797"));
    assert_eq!(tx["chainId"], json!(324));
}

#[tokio::test]
async fn test_invalid_address_becomes_domain_failure() {
    let resp = call_tool(
        test_state(),
        "delegateAll",
        json!({
            "delegatee": "not-an-address",
            "rights": ZERO_RIGHTS,
            "enable": true,
            "network": "ethereum"
        }),
    )
    .await;
    let result = success_body(resp);
    assert_eq!(result["success"], json!(false));
    assert_eq!(
        result["error"],
        json!("Invalid delegatee: must be a 0x-prefixed hex address of 40 characters")
    );
    assert!(result.get("transactionParameters").is_none());
}

#[tokio::test]
async fn test_unknown_network_becomes_domain_failure() {
    let resp = call_tool(
        test_state(),
        "delegateAll",
        json!({
            "delegatee": DELEGATEE,
            "rights": ZERO_RIGHTS,
            "enable": true,
            "network": "neverland"
        }),
    )
    .await;
    let result = success_body(resp);
    assert_eq!(result["success"], json!(false));
    assert_eq!(result["error"], json!("Network \"neverland\" not supported"));
}

#[tokio::test]
async fn test_malformed_encoded_call_is_rejected() {
    let resp = call_tool(
        test_state(),
        "multicall",
        json!({"encodedCalls": ["0x1234"], "network": "ethereum"}),
    )
    .await;
    let result = success_body(resp);
    assert_eq!(result["success"], json!(false));
    assert_eq!(
        result["error"],
        json!("Invalid encodedCalls: must be a 0x-prefixed hex string of 64 characters")
    );
}

#[tokio::test]
async fn test_check_without_rpc_endpoint_fails_fast() {
    let resp = call_tool(
        offline_state(),
        "checkDelegateForAll",
        json!({
            "delegatee": DELEGATEE,
            "delegator": DELEGATOR,
            "rights": ZERO_RIGHTS,
            "network": "island"
        }),
    )
    .await;
    let result = success_body(resp);
    assert_eq!(result["success"], json!(false));
    assert_eq!(
        result["error"],
        json!("No RPC URL configured for network: Island")
    );
}

#[tokio::test]
async fn test_missing_argument_is_invalid_params() {
    let resp = call_tool(
        test_state(),
        "delegateAll",
        json!({
            "delegatee": DELEGATEE,
            "enable": true,
            "network": "ethereum"
        }),
    )
    .await;
    let err = resp.error.expect("missing args are protocol errors");
    assert_eq!(err.code, error_codes::INVALID_PARAMS);
    assert!(err.message.contains("rights"));
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let resp = call_tool(test_state(), "mintMoney", json!({})).await;
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
    assert_eq!(err.message, "Tool not found: mintMoney");
}

#[tokio::test]
async fn test_unknown_method_is_method_not_found() {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: json!(9),
        method: "bogus/method".to_string(),
        params: None,
    };
    let resp = handle_mcp_request(req, test_state()).await.unwrap();
    let err = resp.error.unwrap();
    assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_notification_gets_no_response() {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: Value::Null,
        method: "tools/list".to_string(),
        params: None,
    };
    assert!(handle_mcp_request(req, test_state()).await.is_none());
}

#[tokio::test]
async fn test_direct_method_alias_reaches_tool() {
    let req = Request {
        jsonrpc: "2.0".to_string(),
        id: json!(3),
        method: "getSupportedNetworks".to_string(),
        params: None,
    };
    let resp = handle_mcp_request(req, test_state()).await.unwrap();
    let result = success_body(resp);
    assert_eq!(result["success"], json!(true));
    assert_eq!(result["networks"].as_array().unwrap().len(), 39);
}
