//! JSON-RPC message types and request dispatch

use convkit_units::ConversionEngine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::session::Session;
use crate::tools;

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "convkit";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

#[derive(Debug, Deserialize)]
pub struct McpRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl McpError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }
}

impl McpResponse {
    fn failure(id: JsonValue, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id),
            result: None,
            error: Some(McpError {
                code,
                message,
                data: None,
            }),
        }
    }

    /// Reply to a line that is not JSON; the id is unknown, so it is null
    pub fn parse_error(details: impl std::fmt::Display) -> Self {
        Self::failure(
            JsonValue::Null,
            PARSE_ERROR,
            format!("Parse error: {}", details),
        )
    }

    /// Reply to JSON that is not a request object
    pub fn invalid_request(id: Option<JsonValue>, details: impl std::fmt::Display) -> Self {
        Self::failure(
            id.unwrap_or(JsonValue::Null),
            INVALID_REQUEST,
            format!("Invalid request: {}", details),
        )
    }
}

/// Server state for one stdio connection
pub struct Server {
    pub(crate) engine: ConversionEngine<'static>,
    pub(crate) session: Session,
    pub(crate) config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            engine: ConversionEngine::builtin(),
            session: Session::new(config.favorites_limit, config.history_limit),
            config,
        }
    }

    /// Handle one line of input
    ///
    /// Blank lines and notifications (requests without an id) produce no
    /// reply. Anything else produces exactly one response.
    pub fn handle_line(&mut self, line: &str) -> Option<McpResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!(bytes = line.len(), "received");

        let message: JsonValue = match serde_json::from_str(line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "malformed request");
                return Some(McpResponse::parse_error(e));
            }
        };

        let id = message.get("id").cloned();
        let request: McpRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "invalid request");
                return Some(McpResponse::invalid_request(id, e));
            }
        };

        let response = self.handle_request(&request);

        if request.id.is_none() {
            debug!(method = %request.method, "notification processed");
            return None;
        }
        Some(response)
    }

    pub fn handle_request(&mut self, request: &McpRequest) -> McpResponse {
        debug!(method = %request.method, "handling request");

        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => handle_initialize(&request.params),
            "initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => Ok(tools::tools_list()),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(McpError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };

        match result {
            Ok(r) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id.clone(),
                result: Some(r),
                error: None,
            },
            Err(e) => McpResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id.clone(),
                result: None,
                error: Some(e),
            },
        }
    }

    fn handle_tool_call(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params
            .as_ref()
            .ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        match name {
            "convert" => self.tool_convert(args),
            "list_categories" => self.tool_list_categories(),
            "list_units" => self.tool_list_units(args),
            "favorites" => self.tool_favorites(),
            "load_favorite" => self.tool_load_favorite(args),
            "history" => self.tool_history(args),
            "clear_history" => self.tool_clear_history(),
            _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
        }
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion between measurement units"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "convkit converts values between units of one category \
            (Length, Temperature, Weight, Time, Speed, Data Storage, Area, Volume, Energy). \
            Use 'list_categories' and 'list_units' to discover valid names, then 'convert'."
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: Option<i64>, method: &str, params: Option<JsonValue>) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id: id.map(|i| json!(i)),
            method: method.to_string(),
            params,
        }
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let mut server = Server::new(ServerConfig::default());
        let response = server.handle_request(&request(
            Some(1),
            "initialize",
            Some(json!({"protocolVersion": "2024-11-05", "clientInfo": {"name": "test"}})),
        ));
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "convkit");
        assert_eq!(response.id, Some(json!(1)));
    }

    #[test]
    fn test_unknown_method() {
        let mut server = Server::new(ServerConfig::default());
        let response = server.handle_request(&request(Some(2), "resources/list", None));
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_tool_call_without_params() {
        let mut server = Server::new(ServerConfig::default());
        let response = server.handle_request(&request(Some(3), "tools/call", None));
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_unknown_tool() {
        let mut server = Server::new(ServerConfig::default());
        let response = server.handle_request(&request(
            Some(4),
            "tools/call",
            Some(json!({"name": "ar_measure"})),
        ));
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.message.contains("ar_measure"));
    }

    #[test]
    fn test_request_deserializes_without_params() {
        let req: McpRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"initialized"}"#).unwrap();
        assert!(req.id.is_none());
        assert!(req.params.is_none());
    }

    #[test]
    fn test_parse_error_response_shape() {
        let response = McpResponse::parse_error("expected value");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], PARSE_ERROR);
        assert!(json.get("id").unwrap().is_null());
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_line_blank_is_skipped() {
        let mut server = Server::new(ServerConfig::default());
        assert!(server.handle_line("").is_none());
        assert!(server.handle_line("   \t\r\n").is_none());
    }

    #[test]
    fn test_line_malformed_json() {
        let mut server = Server::new(ServerConfig::default());
        let response = server.handle_line("{\"jsonrpc\": \"2.0\", \"id\": 1,").unwrap();
        assert_eq!(response.error.as_ref().unwrap().code, PARSE_ERROR);

        let line = serde_json::to_string(&response).unwrap();
        assert!(line.contains("\"id\":null"), "{}", line);
    }

    #[test]
    fn test_line_not_a_request() {
        let mut server = Server::new(ServerConfig::default());
        let response = server.handle_line(r#"{"jsonrpc":"2.0","id":7}"#).unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(response.id, Some(json!(7)));

        let response = server.handle_line("[1, 2]").unwrap();
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
        assert_eq!(response.id, Some(JsonValue::Null));
    }

    #[test]
    fn test_line_notification_gets_no_response() {
        let mut server = Server::new(ServerConfig::default());
        assert!(server
            .handle_line(r#"{"jsonrpc":"2.0","method":"initialized"}"#)
            .is_none());

        // notifications still run
        let call = json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {
                "name": "convert",
                "arguments": {"category": "Length", "from_unit": "m", "to_unit": "ft", "value": 1}
            }
        });
        assert!(server.handle_line(&call.to_string()).is_none());
        assert_eq!(server.session.history_len(), 1);
    }

    #[test]
    fn test_line_request_gets_response() {
        let mut server = Server::new(ServerConfig::default());
        let response = server
            .handle_line(" {\"jsonrpc\":\"2.0\",\"id\":\"a\",\"method\":\"ping\"}\n")
            .unwrap();
        assert_eq!(response.id, Some(json!("a")));
        assert_eq!(response.result, Some(json!({})));
        assert!(response.error.is_none());
    }
}
