//! Utility functions for the delegate registry MCP server

use crate::mcp::protocol::{error_codes, Response};
use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

/// Extracts a required argument from a tool-call argument object. A missing
/// key and a wrongly typed value produce the same INVALID_PARAMS response.
pub fn get_required_arg<T: DeserializeOwned>(
    args: &Value,
    key: &str,
    req_id: &Value,
) -> Result<T, Response> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        Response::error(
            req_id.clone(),
            error_codes::INVALID_PARAMS,
            format!("Missing or invalid required argument: '{}'", key),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_required_arg_extracts_typed_values() {
        let args = json!({"network": "ethereum", "enable": true});
        let network: String = get_required_arg(&args, "network", &json!(1)).unwrap();
        let enable: bool = get_required_arg(&args, "enable", &json!(1)).unwrap();
        assert_eq!(network, "ethereum");
        assert!(enable);
    }

    #[test]
    fn test_get_required_arg_rejects_missing_and_mistyped() {
        let args = json!({"enable": "yes"});
        let missing = get_required_arg::<String>(&args, "network", &json!(3)).unwrap_err();
        let mistyped = get_required_arg::<bool>(&args, "enable", &json!(3)).unwrap_err();
        for resp in [missing, mistyped] {
            let err = resp.error.unwrap();
            assert_eq!(err.code, error_codes::INVALID_PARAMS);
        }
    }
}
