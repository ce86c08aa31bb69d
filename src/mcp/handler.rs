//! # MCP Handler Module
//!
//! This module implements the Model Context Protocol (MCP) for the delegate
//! registry server. It handles incoming MCP requests and dispatches them to
//! the appropriate tools.
//!
//! ## Supported Tools
//!
//! ### Network Directory
//! - `getSupportedNetworks` - List every supported network
//! - `getNetworkInfo` - Resolve one network by name or chain id
//!
//! ### Transaction Preparation
//! - `multicall` - Batch encoded registry calls into one transaction
//! - `delegateAll` - Delegate an entire wallet
//! - `delegateContract` - Delegate one contract
//! - `delegateERC721` - Delegate one ERC-721 token
//! - `delegateERC20` - Delegate an ERC-20 allowance
//! - `delegateERC1155` - Delegate an ERC-1155 token amount
//!
//! ### Delegation Checks
//! - `checkDelegateForAll` - Wallet-wide delegation check
//! - `checkDelegateForContract` - Contract-scoped delegation check
//! - `checkDelegateForERC721` - Token-scoped delegation check
//! - `checkDelegateForERC20` - Delegated ERC-20 allowance
//! - `checkDelegateForERC1155` - Delegated ERC-1155 amount
//!
//! ### Delegation Enumeration
//! - `getIncomingDelegations` / `getOutgoingDelegations` - Full records
//! - `getIncomingDelegationHashes` / `getOutgoingDelegationHashes` - Hashes only
//! - `getDelegationsFromHashes` - Resolve hashes back into records

use crate::{
    error::RegistryError,
    mcp::protocol::{error_codes, Request, Response},
    networks::NetworkInfo,
    registry::encoder::{
        self, DelegateAllParams, DelegateContractParams, DelegateErc1155Params,
        DelegateErc20Params, DelegateErc721Params, MulticallParams,
    },
    utils, validators, AppState,
};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

// Helper: produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
fn make_texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            // Do not overwrite if caller already set content
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

// Wraps a tool outcome in the registry envelope. Domain failures stay inside
// a successful JSON-RPC response as {success: false, error}; only protocol
// problems (bad params, unknown tool) become JSON-RPC errors.
fn registry_response(
    req_id: &Value,
    field: &'static str,
    outcome: Result<Value, RegistryError>,
) -> Response {
    let body = match outcome {
        Ok(value) => {
            let mut map = Map::new();
            map.insert("success".to_string(), Value::Bool(true));
            map.insert(field.to_string(), value);
            Value::Object(map)
        }
        Err(e) => {
            warn!("Tool call failed: {}", e);
            json!({ "success": false, "error": e.to_string() })
        }
    };
    let text = body.to_string();
    Response::success(req_id.clone(), make_texty_result(text, body))
}

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req),
        "tools/call" => handle_tool_call(req, state).await,
        // Convenience aliases to support direct method calls from CLI
        // They are rewritten into tools/call internally to reuse the same logic
        "getSupportedNetworks"
        | "getNetworkInfo"
        | "multicall"
        | "delegateAll"
        | "delegateContract"
        | "delegateERC721"
        | "delegateERC20"
        | "delegateERC1155"
        | "checkDelegateForAll"
        | "checkDelegateForContract"
        | "checkDelegateForERC721"
        | "checkDelegateForERC20"
        | "checkDelegateForERC1155"
        | "getIncomingDelegations"
        | "getOutgoingDelegations"
        | "getIncomingDelegationHashes"
        | "getOutgoingDelegationHashes"
        | "getDelegationsFromHashes" => {
            let name = req.method.clone();
            let wrapped = Request {
                jsonrpc: req.jsonrpc.clone(),
                id: req.id.clone(),
                method: "tools/call".to_string(),
                params: Some(json!({
                    "name": name,
                    "arguments": req.params.clone().unwrap_or_else(|| json!({}))
                })),
            };
            handle_tool_call(wrapped, state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Handles a 'tools/call' request by dispatching it to the correct tool logic.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match params.get("name").and_then(|n| n.as_str()) {
        Some(name) => name,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'name' field in params".into(),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);
    let req_id = &req.id;

    match tool_name {
        "getSupportedNetworks" => {
            registry_response(req_id, "networks", Ok(json!(state.networks.list())))
        }
        "getNetworkInfo" => {
            let res: Result<Response, Response> = (async {
                let identifier =
                    utils::get_required_arg::<String>(args, "networkIdentifier", req_id)?;
                let outcome = state
                    .networks
                    .resolve(&identifier)
                    .map(|network| json!(NetworkInfo::from(network)));
                Ok(registry_response(req_id, "networkInfo", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "multicall" => {
            let res: Result<Response, Response> = (async {
                let encoded_calls =
                    utils::get_required_arg::<Vec<String>>(args, "encodedCalls", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = build_multicall(&state, &encoded_calls, &network);
                Ok(registry_response(req_id, "transactionParameters", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "delegateAll" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let enable = utils::get_required_arg::<bool>(args, "enable", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = build_delegate_all(&state, &delegatee, &rights, enable, &network);
                Ok(registry_response(req_id, "transactionParameters", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "delegateContract" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let contract =
                    utils::get_required_arg::<String>(args, "contractToDelegate", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let enable = utils::get_required_arg::<bool>(args, "enable", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome =
                    build_delegate_contract(&state, &delegatee, &contract, &rights, enable, &network);
                Ok(registry_response(req_id, "transactionParameters", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "delegateERC721" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let contract =
                    utils::get_required_arg::<String>(args, "contractToDelegate", req_id)?;
                let token_id = utils::get_required_arg::<String>(args, "tokenId", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let enable = utils::get_required_arg::<bool>(args, "enable", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = build_delegate_erc721(
                    &state, &delegatee, &contract, &token_id, &rights, enable, &network,
                );
                Ok(registry_response(req_id, "transactionParameters", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "delegateERC20" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let contract =
                    utils::get_required_arg::<String>(args, "contractToDelegate", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let amount = utils::get_required_arg::<String>(args, "amount", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = build_delegate_erc20(
                    &state, &delegatee, &contract, &rights, &amount, &network,
                );
                Ok(registry_response(req_id, "transactionParameters", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "delegateERC1155" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let contract =
                    utils::get_required_arg::<String>(args, "contractToDelegate", req_id)?;
                let token_id = utils::get_required_arg::<String>(args, "tokenId", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let amount = utils::get_required_arg::<String>(args, "amount", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = build_delegate_erc1155(
                    &state, &delegatee, &contract, &token_id, &rights, &amount, &network,
                );
                Ok(registry_response(req_id, "transactionParameters", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "checkDelegateForAll" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let delegator = utils::get_required_arg::<String>(args, "delegator", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome =
                    check_delegate_for_all(&state, &delegatee, &delegator, &rights, &network).await;
                Ok(registry_response(req_id, "result", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "checkDelegateForContract" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let delegator = utils::get_required_arg::<String>(args, "delegator", req_id)?;
                let contract =
                    utils::get_required_arg::<String>(args, "contractToDelegate", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = check_delegate_for_contract(
                    &state, &delegatee, &delegator, &contract, &rights, &network,
                )
                .await;
                Ok(registry_response(req_id, "result", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "checkDelegateForERC721" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let delegator = utils::get_required_arg::<String>(args, "delegator", req_id)?;
                let contract =
                    utils::get_required_arg::<String>(args, "contractToDelegate", req_id)?;
                let token_id = utils::get_required_arg::<String>(args, "tokenId", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = check_delegate_for_erc721(
                    &state, &delegatee, &delegator, &contract, &token_id, &rights, &network,
                )
                .await;
                Ok(registry_response(req_id, "result", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "checkDelegateForERC20" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let delegator = utils::get_required_arg::<String>(args, "delegator", req_id)?;
                let contract =
                    utils::get_required_arg::<String>(args, "contractToDelegate", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = check_delegate_for_erc20(
                    &state, &delegatee, &delegator, &contract, &rights, &network,
                )
                .await;
                Ok(registry_response(req_id, "result", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "checkDelegateForERC1155" => {
            let res: Result<Response, Response> = (async {
                let delegatee = utils::get_required_arg::<String>(args, "delegatee", req_id)?;
                let delegator = utils::get_required_arg::<String>(args, "delegator", req_id)?;
                let contract =
                    utils::get_required_arg::<String>(args, "contractToDelegate", req_id)?;
                let token_id = utils::get_required_arg::<String>(args, "tokenId", req_id)?;
                let rights = utils::get_required_arg::<String>(args, "rights", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = check_delegate_for_erc1155(
                    &state, &delegatee, &delegator, &contract, &token_id, &rights, &network,
                )
                .await;
                Ok(registry_response(req_id, "result", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "getIncomingDelegations" => {
            let res: Result<Response, Response> = (async {
                let address = utils::get_required_arg::<String>(args, "address", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = incoming_delegations(&state, &address, &network).await;
                Ok(registry_response(req_id, "delegations", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "getOutgoingDelegations" => {
            let res: Result<Response, Response> = (async {
                let address = utils::get_required_arg::<String>(args, "address", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = outgoing_delegations(&state, &address, &network).await;
                Ok(registry_response(req_id, "delegations", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "getIncomingDelegationHashes" => {
            let res: Result<Response, Response> = (async {
                let address = utils::get_required_arg::<String>(args, "address", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = incoming_delegation_hashes(&state, &address, &network).await;
                Ok(registry_response(req_id, "delegationHashes", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "getOutgoingDelegationHashes" => {
            let res: Result<Response, Response> = (async {
                let address = utils::get_required_arg::<String>(args, "address", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = outgoing_delegation_hashes(&state, &address, &network).await;
                Ok(registry_response(req_id, "delegationHashes", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        "getDelegationsFromHashes" => {
            let res: Result<Response, Response> = (async {
                let hashes =
                    utils::get_required_arg::<Vec<String>>(args, "delegationHashes", req_id)?;
                let network = utils::get_required_arg::<String>(args, "network", req_id)?;
                let outcome = delegations_from_hashes(&state, &hashes, &network).await;
                Ok(registry_response(req_id, "delegations", outcome))
            })
            .await;
            res.unwrap_or_else(|err_resp| err_resp)
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Tool not found: {}", tool_name),
        ),
    }
}

// --- Tool logic: transaction preparation ---

fn build_multicall(
    state: &AppState,
    encoded_calls: &[String],
    network: &str,
) -> Result<Value, RegistryError> {
    let mut calls = Vec::with_capacity(encoded_calls.len());
    for call in encoded_calls {
        calls.push(validators::bytes32(call, "encodedCalls")?);
    }
    let network = state.networks.resolve(network)?;
    let params = MulticallParams {
        encoded_calls: calls,
    };
    Ok(json!(encoder::multicall(&params, network)))
}

fn build_delegate_all(
    state: &AppState,
    delegatee: &str,
    rights: &str,
    enable: bool,
    network: &str,
) -> Result<Value, RegistryError> {
    let params = DelegateAllParams {
        delegatee: validators::address(delegatee, "delegatee")?,
        rights: validators::bytes32(rights, "rights")?,
        enable,
    };
    let network = state.networks.resolve(network)?;
    Ok(json!(encoder::delegate_all(&params, network)))
}

fn build_delegate_contract(
    state: &AppState,
    delegatee: &str,
    contract: &str,
    rights: &str,
    enable: bool,
    network: &str,
) -> Result<Value, RegistryError> {
    let params = DelegateContractParams {
        delegatee: validators::address(delegatee, "delegatee")?,
        contract: validators::address(contract, "contractToDelegate")?,
        rights: validators::bytes32(rights, "rights")?,
        enable,
    };
    let network = state.networks.resolve(network)?;
    Ok(json!(encoder::delegate_contract(&params, network)))
}

fn build_delegate_erc721(
    state: &AppState,
    delegatee: &str,
    contract: &str,
    token_id: &str,
    rights: &str,
    enable: bool,
    network: &str,
) -> Result<Value, RegistryError> {
    let params = DelegateErc721Params {
        delegatee: validators::address(delegatee, "delegatee")?,
        contract: validators::address(contract, "contractToDelegate")?,
        token_id: validators::decimal(token_id, "tokenId")?,
        rights: validators::bytes32(rights, "rights")?,
        enable,
    };
    let network = state.networks.resolve(network)?;
    Ok(json!(encoder::delegate_erc721(&params, network)))
}

fn build_delegate_erc20(
    state: &AppState,
    delegatee: &str,
    contract: &str,
    rights: &str,
    amount: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let params = DelegateErc20Params {
        delegatee: validators::address(delegatee, "delegatee")?,
        contract: validators::address(contract, "contractToDelegate")?,
        rights: validators::bytes32(rights, "rights")?,
        amount: validators::decimal(amount, "amount")?,
    };
    let network = state.networks.resolve(network)?;
    Ok(json!(encoder::delegate_erc20(&params, network)))
}

fn build_delegate_erc1155(
    state: &AppState,
    delegatee: &str,
    contract: &str,
    token_id: &str,
    rights: &str,
    amount: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let params = DelegateErc1155Params {
        delegatee: validators::address(delegatee, "delegatee")?,
        contract: validators::address(contract, "contractToDelegate")?,
        token_id: validators::decimal(token_id, "tokenId")?,
        rights: validators::bytes32(rights, "rights")?,
        amount: validators::decimal(amount, "amount")?,
    };
    let network = state.networks.resolve(network)?;
    Ok(json!(encoder::delegate_erc1155(&params, network)))
}

// --- Tool logic: on-chain reads ---

async fn check_delegate_for_all(
    state: &AppState,
    delegatee: &str,
    delegator: &str,
    rights: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let delegatee = validators::address(delegatee, "delegatee")?;
    let delegator = validators::address(delegator, "delegator")?;
    let rights = validators::bytes32(rights, "rights")?;
    let network = state.networks.resolve(network)?;
    let result = state
        .registry
        .check_delegate_for_all(delegatee, delegator, rights, network)
        .await?;
    Ok(Value::Bool(result))
}

async fn check_delegate_for_contract(
    state: &AppState,
    delegatee: &str,
    delegator: &str,
    contract: &str,
    rights: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let delegatee = validators::address(delegatee, "delegatee")?;
    let delegator = validators::address(delegator, "delegator")?;
    let contract = validators::address(contract, "contractToDelegate")?;
    let rights = validators::bytes32(rights, "rights")?;
    let network = state.networks.resolve(network)?;
    let result = state
        .registry
        .check_delegate_for_contract(delegatee, delegator, contract, rights, network)
        .await?;
    Ok(Value::Bool(result))
}

async fn check_delegate_for_erc721(
    state: &AppState,
    delegatee: &str,
    delegator: &str,
    contract: &str,
    token_id: &str,
    rights: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let delegatee = validators::address(delegatee, "delegatee")?;
    let delegator = validators::address(delegator, "delegator")?;
    let contract = validators::address(contract, "contractToDelegate")?;
    let token_id = validators::decimal(token_id, "tokenId")?;
    let rights = validators::bytes32(rights, "rights")?;
    let network = state.networks.resolve(network)?;
    let result = state
        .registry
        .check_delegate_for_erc721(delegatee, delegator, contract, token_id, rights, network)
        .await?;
    Ok(Value::Bool(result))
}

async fn check_delegate_for_erc20(
    state: &AppState,
    delegatee: &str,
    delegator: &str,
    contract: &str,
    rights: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let delegatee = validators::address(delegatee, "delegatee")?;
    let delegator = validators::address(delegator, "delegator")?;
    let contract = validators::address(contract, "contractToDelegate")?;
    let rights = validators::bytes32(rights, "rights")?;
    let network = state.networks.resolve(network)?;
    let amount = state
        .registry
        .check_delegate_for_erc20(delegatee, delegator, contract, rights, network)
        .await?;
    Ok(Value::String(amount.to_string()))
}

async fn check_delegate_for_erc1155(
    state: &AppState,
    delegatee: &str,
    delegator: &str,
    contract: &str,
    token_id: &str,
    rights: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let delegatee = validators::address(delegatee, "delegatee")?;
    let delegator = validators::address(delegator, "delegator")?;
    let contract = validators::address(contract, "contractToDelegate")?;
    let token_id = validators::decimal(token_id, "tokenId")?;
    let rights = validators::bytes32(rights, "rights")?;
    let network = state.networks.resolve(network)?;
    let amount = state
        .registry
        .check_delegate_for_erc1155(delegatee, delegator, contract, token_id, rights, network)
        .await?;
    Ok(Value::String(amount.to_string()))
}

async fn incoming_delegations(
    state: &AppState,
    address: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let address = validators::address(address, "address")?;
    let network = state.networks.resolve(network)?;
    let delegations = state.registry.incoming_delegations(address, network).await?;
    Ok(json!(delegations))
}

async fn outgoing_delegations(
    state: &AppState,
    address: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let address = validators::address(address, "address")?;
    let network = state.networks.resolve(network)?;
    let delegations = state.registry.outgoing_delegations(address, network).await?;
    Ok(json!(delegations))
}

async fn incoming_delegation_hashes(
    state: &AppState,
    address: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let address = validators::address(address, "address")?;
    let network = state.networks.resolve(network)?;
    let hashes = state
        .registry
        .incoming_delegation_hashes(address, network)
        .await?;
    let hashes: Vec<String> = hashes.into_iter().map(|h| format!("{:?}", h)).collect();
    Ok(json!(hashes))
}

async fn outgoing_delegation_hashes(
    state: &AppState,
    address: &str,
    network: &str,
) -> Result<Value, RegistryError> {
    let address = validators::address(address, "address")?;
    let network = state.networks.resolve(network)?;
    let hashes = state
        .registry
        .outgoing_delegation_hashes(address, network)
        .await?;
    let hashes: Vec<String> = hashes.into_iter().map(|h| format!("{:?}", h)).collect();
    Ok(json!(hashes))
}

async fn delegations_from_hashes(
    state: &AppState,
    hashes: &[String],
    network: &str,
) -> Result<Value, RegistryError> {
    let mut parsed = Vec::with_capacity(hashes.len());
    for hash in hashes {
        parsed.push(validators::bytes32(hash, "delegationHashes")?);
    }
    let network = state.networks.resolve(network)?;
    let delegations = state
        .registry
        .delegations_from_hashes(parsed, network)
        .await?;
    Ok(json!(delegations))
}

/// Handles the 'initialize' request.
fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "delegate_registry_mcp",
        "version": "0.1.0"
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "Delegate Registry v2 MCP server: prepares unsigned delegation transactions and queries on-chain delegations across supported EVM networks.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}

/// Handles the 'tools/list' request by returning a JSON definition of all available tools.
fn handle_tools_list(req: &Request) -> Response {
    let tools = json!([
        {
            "name": "getSupportedNetworks",
            "description": "List all supported networks with chain id and registry address.",
            "inputSchema": { "type": "object", "properties": {}, "additionalProperties": false }
        },
        {
            "name": "getNetworkInfo",
            "description": "Look up one network by name or chain id.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "networkIdentifier": {"type": "string", "description": "Network name (e.g., 'ethereum') or decimal chain id (e.g., '1')."}
                },
                "required": ["networkIdentifier"],
                "additionalProperties": false
            }
        },
        {
            "name": "multicall",
            "description": "Prepare an unsigned registry multicall from pre-encoded 32-byte calls.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "encodedCalls": {"type": "array", "items": {"type": "string"}, "description": "Encoded calls, each a 0x-prefixed 64-hex-character string."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["encodedCalls", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "delegateAll",
            "description": "Prepare an unsigned transaction delegating the caller's entire wallet.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address receiving the delegation."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex). All-zero means all rights."},
                    "enable": {"type": "boolean", "description": "true to grant, false to revoke."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "rights", "enable", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "delegateContract",
            "description": "Prepare an unsigned transaction delegating one contract.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address receiving the delegation."},
                    "contractToDelegate": {"type": "string", "description": "The contract address being delegated."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "enable": {"type": "boolean", "description": "true to grant, false to revoke."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "contractToDelegate", "rights", "enable", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "delegateERC721",
            "description": "Prepare an unsigned transaction delegating one ERC-721 token.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address receiving the delegation."},
                    "contractToDelegate": {"type": "string", "description": "The ERC-721 contract address."},
                    "tokenId": {"type": "string", "description": "Token id as a decimal string."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "enable": {"type": "boolean", "description": "true to grant, false to revoke."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "contractToDelegate", "tokenId", "rights", "enable", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "delegateERC20",
            "description": "Prepare an unsigned transaction delegating an ERC-20 token allowance.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address receiving the delegation."},
                    "contractToDelegate": {"type": "string", "description": "The ERC-20 contract address."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "amount": {"type": "string", "description": "Delegated amount as a decimal string. Zero revokes."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "contractToDelegate", "rights", "amount", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "delegateERC1155",
            "description": "Prepare an unsigned transaction delegating an ERC-1155 token amount.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address receiving the delegation."},
                    "contractToDelegate": {"type": "string", "description": "The ERC-1155 contract address."},
                    "tokenId": {"type": "string", "description": "Token id as a decimal string."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "amount": {"type": "string", "description": "Delegated amount as a decimal string. Zero revokes."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "contractToDelegate", "tokenId", "rights", "amount", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "checkDelegateForAll",
            "description": "Check whether a wallet-wide delegation exists between two addresses.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address acting on behalf of the delegator."},
                    "delegator": {"type": "string", "description": "The 0x... address that granted the delegation."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "delegator", "rights", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "checkDelegateForContract",
            "description": "Check whether a contract-scoped delegation exists between two addresses.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address acting on behalf of the delegator."},
                    "delegator": {"type": "string", "description": "The 0x... address that granted the delegation."},
                    "contractToDelegate": {"type": "string", "description": "The contract the delegation is scoped to."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "delegator", "contractToDelegate", "rights", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "checkDelegateForERC721",
            "description": "Check whether a delegation exists for one ERC-721 token.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address acting on behalf of the delegator."},
                    "delegator": {"type": "string", "description": "The 0x... address that granted the delegation."},
                    "contractToDelegate": {"type": "string", "description": "The ERC-721 contract address."},
                    "tokenId": {"type": "string", "description": "Token id as a decimal string."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "delegator", "contractToDelegate", "tokenId", "rights", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "checkDelegateForERC20",
            "description": "Get the ERC-20 amount delegated between two addresses (decimal string, '0' when none).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address acting on behalf of the delegator."},
                    "delegator": {"type": "string", "description": "The 0x... address that granted the delegation."},
                    "contractToDelegate": {"type": "string", "description": "The ERC-20 contract address."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "delegator", "contractToDelegate", "rights", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "checkDelegateForERC1155",
            "description": "Get the ERC-1155 amount delegated between two addresses (decimal string, '0' when none).",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegatee": {"type": "string", "description": "The 0x... address acting on behalf of the delegator."},
                    "delegator": {"type": "string", "description": "The 0x... address that granted the delegation."},
                    "contractToDelegate": {"type": "string", "description": "The ERC-1155 contract address."},
                    "tokenId": {"type": "string", "description": "Token id as a decimal string."},
                    "rights": {"type": "string", "description": "32-byte rights identifier (0x + 64 hex)."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegatee", "delegator", "contractToDelegate", "tokenId", "rights", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "getIncomingDelegations",
            "description": "List delegations granted to an address.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "The 0x... delegatee address."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["address", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "getOutgoingDelegations",
            "description": "List delegations granted by an address.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "The 0x... delegator address."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["address", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "getIncomingDelegationHashes",
            "description": "List delegation hashes granted to an address.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "The 0x... delegatee address."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["address", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "getOutgoingDelegationHashes",
            "description": "List delegation hashes granted by an address.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "address": {"type": "string", "description": "The 0x... delegator address."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["address", "network"],
                "additionalProperties": false
            }
        },
        {
            "name": "getDelegationsFromHashes",
            "description": "Resolve delegation hashes into full delegation records.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "delegationHashes": {"type": "array", "items": {"type": "string"}, "description": "Delegation hashes, each a 0x-prefixed 64-hex-character string."},
                    "network": {"type": "string", "description": "Network name or chain id."}
                },
                "required": ["delegationHashes", "network"],
                "additionalProperties": false
            }
        },
    ]);
    Response::success(req.id.clone(), json!({ "tools": tools }))
}
