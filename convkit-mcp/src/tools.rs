//! Tool metadata and implementations
//!
//! Tool descriptors are static metadata; `tools/list` is generated from them
//! so the advertised schema and the dispatch table cannot drift apart.

use convkit_core::{format_fixed, format_plain, parse_value, ConversionError, MAX_DECIMALS};
use convkit_units::{Category, UnitKind};
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use tracing::{debug, warn};

use crate::protocol::{McpError, Server};
use crate::session::{ConversionRecord, SessionError};

/// Metadata about a tool argument
#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: &'static str,
    pub typ: &'static str,
    pub description: &'static str,
    pub optional: bool,
}

impl ArgMeta {
    pub const fn required(
        name: &'static str,
        typ: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            typ,
            description,
            optional: false,
        }
    }

    pub const fn optional(
        name: &'static str,
        typ: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            typ,
            description,
            optional: true,
        }
    }
}

/// Metadata for a tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub args: &'static [ArgMeta],
}

static CONVERT_ARGS: [ArgMeta; 6] = [
    ArgMeta::required("category", "string", "Measurement category, e.g. \"Length\""),
    ArgMeta::required(
        "from_unit",
        "string",
        "Source unit name or symbol, e.g. \"Meters\" or \"m\"",
    ),
    ArgMeta::required("to_unit", "string", "Target unit name or symbol"),
    ArgMeta::required(
        "value",
        "number|string",
        "Value to convert; text is parsed as a decimal number",
    ),
    ArgMeta::optional("decimals", "integer", "Decimal places in the formatted result"),
    ArgMeta::optional("favorite", "boolean", "Also save this conversion to favorites"),
];

static LIST_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("category", "string", "Measurement category"),
];

static LOAD_FAVORITE_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("index", "integer", "1-based position from the favorites list"),
];

static HISTORY_ARGS: [ArgMeta; 1] = [
    ArgMeta::optional("limit", "integer", "Maximum entries to return (default: all)"),
];

pub static TOOLS: [ToolMeta; 7] = [
    ToolMeta {
        name: "convert",
        description: "Convert a value from one unit to another within a category.",
        args: &CONVERT_ARGS,
    },
    ToolMeta {
        name: "list_categories",
        description: "List the measurement categories in display order.",
        args: &[],
    },
    ToolMeta {
        name: "list_units",
        description: "List the units of a category, reference unit first.",
        args: &LIST_UNITS_ARGS,
    },
    ToolMeta {
        name: "favorites",
        description: "List conversions saved as favorites in this session.",
        args: &[],
    },
    ToolMeta {
        name: "load_favorite",
        description: "Return a saved favorite so its inputs can be reused.",
        args: &LOAD_FAVORITE_ARGS,
    },
    ToolMeta {
        name: "history",
        description: "List recent conversions, newest first.",
        args: &HISTORY_ARGS,
    },
    ToolMeta {
        name: "clear_history",
        description: "Forget the conversion history of this session.",
        args: &[],
    },
];

/// JSON schema for a tool's arguments
fn input_schema(meta: &ToolMeta) -> JsonValue {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for arg in meta.args {
        let typ: JsonValue = match arg.typ {
            "number|string" => json!(["number", "string"]),
            other => json!(other),
        };
        properties.insert(
            arg.name.to_string(),
            json!({ "type": typ, "description": arg.description }),
        );
        if !arg.optional {
            required.push(arg.name);
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn tools_list() -> JsonValue {
    let tools: Vec<JsonValue> = TOOLS
        .iter()
        .map(|meta| {
            json!({
                "name": meta.name,
                "description": meta.description,
                "inputSchema": input_schema(meta)
            })
        })
        .collect();
    json!({ "tools": tools })
}

fn text_result(text: impl Into<String>, extra: JsonValue) -> JsonValue {
    let mut result = json!({ "content": [{ "type": "text", "text": text.into() }] });
    if let (Some(obj), JsonValue::Object(extra)) = (result.as_object_mut(), extra) {
        obj.extend(extra);
    }
    result
}

/// Conversion failures are tool results with `isError`, not protocol errors
fn conversion_error(err: &ConversionError) -> JsonValue {
    let report = err.report();
    text_result(
        report.to_string(),
        json!({ "error": report.to_json(), "isError": true }),
    )
}

fn session_error(err: &SessionError) -> JsonValue {
    text_result(format!("Error: {}", err), json!({ "isError": true }))
}

fn required_str<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

fn optional_usize(args: &JsonValue, name: &str) -> Result<Option<usize>, McpError> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v.as_u64().map(|n| Some(n as usize)).ok_or_else(|| {
            McpError::invalid_params(format!("{} must be a non-negative integer", name))
        }),
    }
}

/// `value` may be a JSON number or user text
fn value_arg(args: &JsonValue) -> Result<Result<f64, ConversionError>, McpError> {
    match args.get("value") {
        Some(JsonValue::Number(n)) => Ok(n
            .as_f64()
            .ok_or_else(|| ConversionError::invalid_value(n.to_string()))),
        Some(JsonValue::String(s)) => Ok(parse_value(s)),
        Some(other) => Ok(Err(ConversionError::invalid_value(other.to_string()))),
        None => Err(McpError::invalid_params("Missing value argument")),
    }
}

impl Server {
    pub(crate) fn tool_convert(&mut self, args: JsonValue) -> Result<JsonValue, McpError> {
        let category = required_str(&args, "category")?;
        let from_unit = required_str(&args, "from_unit")?;
        let to_unit = required_str(&args, "to_unit")?;
        let value = value_arg(&args)?;
        let decimals = optional_usize(&args, "decimals")?
            .unwrap_or(self.config.decimals)
            .min(MAX_DECIMALS);
        let favorite = args.get("favorite").and_then(|v| v.as_bool()).unwrap_or(false);

        let converted = Category::parse(category).and_then(|category| {
            let registry = self.engine.registry();
            let from = registry.resolve(category, from_unit)?;
            let to = registry.resolve(category, to_unit)?;
            let value = value?;
            let result = self.engine.convert_units(from, to, value)?;
            Ok(ConversionRecord {
                category,
                from_unit: from.name.to_string(),
                to_unit: to.name.to_string(),
                value,
                result,
            })
        });

        let record = match converted {
            Ok(record) => record,
            Err(e) => {
                debug!(code = e.code(), "conversion rejected");
                return Ok(conversion_error(&e));
            }
        };

        let formatted = format_fixed(record.result, decimals);
        let mut text = format!(
            "{} {} = {} {}",
            format_plain(record.value),
            record.from_unit,
            formatted,
            record.to_unit
        );

        let mut extra = json!({
            "result": record.result,
            "formatted": formatted,
            "record": record,
            "isError": false
        });

        if favorite {
            match self.session.add_favorite(record.clone()) {
                Ok(index) => {
                    extra["favoriteIndex"] = json!(index);
                    text.push_str(&format!("\nSaved as favorite #{}", index));
                }
                Err(e) => {
                    warn!(error = %e, "favorite not saved");
                    extra["favoriteError"] = json!(e.to_string());
                    text.push_str(&format!("\nFavorite not saved: {}", e));
                }
            }
        }

        self.session.record(record);
        Ok(text_result(text, extra))
    }

    pub(crate) fn tool_list_categories(&self) -> Result<JsonValue, McpError> {
        let categories = self.engine.list_categories();
        let names: Vec<&str> = categories.iter().map(|c| c.name()).collect();
        Ok(text_result(names.join("\n"), json!({ "categories": names })))
    }

    pub(crate) fn tool_list_units(&self, args: JsonValue) -> Result<JsonValue, McpError> {
        let name = required_str(&args, "category")?;
        let category = match Category::parse(name) {
            Ok(c) => c,
            Err(e) => return Ok(conversion_error(&e)),
        };

        let units = self.engine.units_of(category);
        let text = units
            .iter()
            .map(|u| format!("{} ({})", u.name, u.symbol))
            .collect::<Vec<_>>()
            .join("\n");
        let data: Vec<JsonValue> = units
            .iter()
            .map(|u| {
                let kind = match u.kind {
                    UnitKind::Ratio(_) => "ratio",
                    UnitKind::Formula(_) => "formula",
                };
                json!({
                    "name": u.name,
                    "symbol": u.symbol,
                    "reference": u.is_reference(),
                    "kind": kind
                })
            })
            .collect();

        Ok(text_result(text, json!({ "category": category, "units": data })))
    }

    pub(crate) fn tool_favorites(&self) -> Result<JsonValue, McpError> {
        let favorites = self.session.favorites();
        let text = if favorites.is_empty() {
            "No favorites yet".to_string()
        } else {
            favorites
                .iter()
                .enumerate()
                .map(|(i, r)| format!("{}. {}", i + 1, r.describe(self.config.decimals)))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Ok(text_result(text, json!({ "favorites": favorites })))
    }

    pub(crate) fn tool_load_favorite(&self, args: JsonValue) -> Result<JsonValue, McpError> {
        let index = optional_usize(&args, "index")?
            .ok_or_else(|| McpError::invalid_params("Missing index argument"))?;

        match self.session.favorite(index) {
            Ok(record) => Ok(text_result(
                record.describe(self.config.decimals),
                json!({ "favorite": record }),
            )),
            Err(e) => Ok(session_error(&e)),
        }
    }

    pub(crate) fn tool_history(&self, args: JsonValue) -> Result<JsonValue, McpError> {
        let limit = optional_usize(&args, "limit")?.unwrap_or(usize::MAX);
        let entries: Vec<&ConversionRecord> = self.session.recent(limit).collect();
        let text = if entries.is_empty() {
            "No conversions yet".to_string()
        } else {
            entries
                .iter()
                .map(|r| r.describe(self.config.decimals))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Ok(text_result(text, json!({ "history": entries })))
    }

    pub(crate) fn tool_clear_history(&mut self) -> Result<JsonValue, McpError> {
        let cleared = self.session.clear_history();
        Ok(text_result(
            format!("Cleared {} entries", cleared),
            json!({ "cleared": cleared }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    fn server() -> Server {
        Server::new(ServerConfig::default())
    }

    fn convert(server: &mut Server, args: JsonValue) -> JsonValue {
        server.tool_convert(args).unwrap()
    }

    #[test]
    fn test_tools_list_matches_metadata() {
        let list = tools_list();
        let tools = list["tools"].as_array().unwrap();
        assert_eq!(tools.len(), TOOLS.len());

        let convert = &tools[0];
        assert_eq!(convert["name"], "convert");
        let required = convert["inputSchema"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert!(convert["inputSchema"]["properties"]["favorite"].is_object());
    }

    #[test]
    fn test_convert_number() {
        let mut server = server();
        let result = convert(
            &mut server,
            json!({
                "category": "Temperature",
                "from_unit": "Celsius",
                "to_unit": "Fahrenheit",
                "value": 100
            }),
        );
        assert_eq!(result["isError"], false);
        assert_eq!(result["result"], 212.0);
        assert_eq!(result["formatted"], "212.00");
        assert_eq!(result["content"][0]["text"], "100 Celsius = 212.00 Fahrenheit");
    }

    #[test]
    fn test_convert_text_value_and_symbols() {
        let mut server = server();
        let result = convert(
            &mut server,
            json!({
                "category": "length",
                "from_unit": "m",
                "to_unit": "ft",
                "value": "1",
                "decimals": 5
            }),
        );
        assert_eq!(result["formatted"], "3.28084");
        assert_eq!(result["record"]["from_unit"], "Meters");
        assert_eq!(result["record"]["to_unit"], "Feet");
    }

    #[test]
    fn test_convert_invalid_text() {
        let mut server = server();
        let result = convert(
            &mut server,
            json!({"category": "Length", "from_unit": "Meters", "to_unit": "Feet", "value": "abc"}),
        );
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_VALUE");
        assert_eq!(server.session.history_len(), 0);
    }

    #[test]
    fn test_convert_overflow_is_error_and_not_recorded() {
        let mut server = server();
        let result = convert(
            &mut server,
            json!({
                "category": "Data Storage",
                "from_unit": "Terabytes",
                "to_unit": "Bytes",
                "value": 1e300,
                "favorite": true
            }),
        );
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_VALUE");
        assert!(result.get("result").is_none());
        assert_eq!(server.session.history_len(), 0);
        assert!(server.session.favorites().is_empty());
    }

    #[test]
    fn test_convert_wrong_category_unit() {
        let mut server = server();
        let result = convert(
            &mut server,
            json!({"category": "Length", "from_unit": "Meters", "to_unit": "Kelvin", "value": 5}),
        );
        assert_eq!(result["error"]["code"], "UNKNOWN_UNIT");
    }

    #[test]
    fn test_convert_unknown_category() {
        let mut server = server();
        let result = convert(
            &mut server,
            json!({"category": "Currency", "from_unit": "USD", "to_unit": "EUR", "value": 5}),
        );
        assert_eq!(result["error"]["code"], "UNKNOWN_CATEGORY");
    }

    #[test]
    fn test_convert_missing_argument_is_protocol_error() {
        let mut server = server();
        let err = server
            .tool_convert(json!({"category": "Length", "from_unit": "Meters", "value": 1}))
            .unwrap_err();
        assert_eq!(err.code, crate::protocol::INVALID_PARAMS);
    }

    #[test]
    fn test_favorites_flow() {
        let mut server = server();
        let saved = convert(
            &mut server,
            json!({
                "category": "Weight",
                "from_unit": "Kilograms",
                "to_unit": "Grams",
                "value": 2,
                "favorite": true
            }),
        );
        assert_eq!(saved["favoriteIndex"], 1);

        let list = server.tool_favorites().unwrap();
        assert_eq!(list["content"][0]["text"], "1. 2 Kilograms to Grams = 2000.00");

        let loaded = server.tool_load_favorite(json!({"index": 1})).unwrap();
        assert_eq!(loaded["favorite"]["value"], 2.0);
        assert_eq!(loaded["favorite"]["category"], "Weight");

        let missing = server.tool_load_favorite(json!({"index": 5})).unwrap();
        assert_eq!(missing["isError"], true);
    }

    #[test]
    fn test_favorites_limit() {
        let config = ServerConfig { favorites_limit: 0, ..ServerConfig::default() };
        let mut server = Server::new(config);
        let result = convert(
            &mut server,
            json!({
                "category": "Time",
                "from_unit": "Hours",
                "to_unit": "Minutes",
                "value": 1,
                "favorite": true
            }),
        );
        assert_eq!(result["isError"], false);
        assert!(result["favoriteError"].is_string());
    }

    #[test]
    fn test_history_newest_first() {
        let mut server = server();
        for v in [1, 2, 3] {
            convert(
                &mut server,
                json!({
                    "category": "Time",
                    "from_unit": "Minutes",
                    "to_unit": "Seconds",
                    "value": v
                }),
            );
        }

        let history = server.tool_history(json!({"limit": 2})).unwrap();
        let entries = history["history"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["value"], 3.0);
        assert_eq!(entries[1]["value"], 2.0);

        let cleared = server.tool_clear_history().unwrap();
        assert_eq!(cleared["cleared"], 3);
        let history = server.tool_history(json!({})).unwrap();
        assert_eq!(history["content"][0]["text"], "No conversions yet");
    }

    #[test]
    fn test_list_categories() {
        let result = server().tool_list_categories().unwrap();
        let categories = result["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 9);
        assert_eq!(categories[5], "Data Storage");
    }

    #[test]
    fn test_list_units() {
        let result = server().tool_list_units(json!({"category": "Temperature"})).unwrap();
        let units = result["units"].as_array().unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0]["name"], "Celsius");
        assert_eq!(units[0]["reference"], true);
        assert_eq!(units[0]["kind"], "formula");
        assert_eq!(result["category"], "Temperature");

        let unknown = server().tool_list_units(json!({"category": "Colour"})).unwrap();
        assert_eq!(unknown["error"]["code"], "UNKNOWN_CATEGORY");
    }
}
