mod lego;
mod lists;

use serde::{Deserialize, Serialize};

// Re-export types needed by tool handlers
pub use super::{JsonRpcError, Tool};

// MCP Protocol types for tools
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

#[derive(Debug, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ToolsList {
    pub tools: Vec<Tool>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResult {
    pub content: Vec<Content>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Wrap a serializable payload as pretty-printed MCP text content.
pub fn text_result<T: Serialize>(payload: &T) -> Result<serde_json::Value, JsonRpcError> {
    let json_string = serde_json::to_string_pretty(payload).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Serialization error: {e}"),
        data: None,
    })?;

    let result = CallToolResult {
        content: vec![Content::Text { text: json_string }],
        is_error: None,
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

pub fn handle_initialize() -> Result<serde_json::Value, JsonRpcError> {
    let result = InitializeResult {
        protocol_version: "2024-11-05".to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability {}),
        },
        server_info: ServerInfo {
            name: "bricktools".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

pub fn handle_tools_list() -> Result<serde_json::Value, JsonRpcError> {
    let tools = vec![
        Tool {
            name: "list_colors".to_string(),
            description: "Get all Rebrickable color names and ids for quick reference, sorted by name. Served from a local cache of the color reference data.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        Tool {
            name: "get_part".to_string(),
            description: "Fetch part details from the Rebrickable catalog, including variants. Requires REBRICKABLE_API_KEY and REBRICKABLE_USER_TOKEN environment variables.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "part_num": {
                        "type": "string",
                        "description": "Part number (e.g., '3020')"
                    }
                },
                "required": ["part_num"]
            }),
        },
        Tool {
            name: "search_parts".to_string(),
            description: "Search the Rebrickable catalog for parts by name or number.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "search": {
                        "type": "string",
                        "description": "Search term (name or part number)"
                    },
                    "part_cat_id": {
                        "type": "number",
                        "description": "Restrict results to a part category id"
                    },
                    "page": {
                        "type": "number",
                        "description": "Page number, 1-indexed"
                    },
                    "page_size": {
                        "type": "number",
                        "description": "Results per page"
                    }
                },
                "required": ["search"]
            }),
        },
        Tool {
            name: "get_part_colors".to_string(),
            description: "Get all colors a specific part comes in.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "part_num": {
                        "type": "string",
                        "description": "Part number (e.g., '3020')"
                    }
                },
                "required": ["part_num"]
            }),
        },
        Tool {
            name: "get_part_lists".to_string(),
            description: "Get all the user's part lists.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "page": {
                        "type": "number",
                        "description": "Page number, 1-indexed"
                    },
                    "page_size": {
                        "type": "number",
                        "description": "Results per page"
                    }
                },
                "required": []
            }),
        },
        Tool {
            name: "get_parts_in_list".to_string(),
            description: "Get all the parts in a specific part list.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "list_id": {
                        "type": "string",
                        "description": "Part list id"
                    },
                    "page": {
                        "type": "number",
                        "description": "Page number, 1-indexed"
                    },
                    "page_size": {
                        "type": "number",
                        "description": "Results per page"
                    },
                    "ordering": {
                        "type": "string",
                        "description": "Sort field; prefix with - to reverse"
                    }
                },
                "required": ["list_id"]
            }),
        },
        Tool {
            name: "create_part_list".to_string(),
            description: "Create a new part list.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Name of the new list"
                    },
                    "num_parts": {
                        "type": "number",
                        "description": "Initial number of parts"
                    },
                    "is_buildable": {
                        "type": "boolean",
                        "description": "Whether the list counts towards build calculations"
                    }
                },
                "required": ["name"]
            }),
        },
        Tool {
            name: "add_or_update_part".to_string(),
            description: "Add a part to a part list, or adjust its quantity if the part+color is already present. Quantity is a signed delta: negative values remove parts, and a line whose quantity would drop to zero or below is deleted. Returns a structured outcome: added, updated, deleted, or no_change.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "list_id": {
                        "type": "string",
                        "description": "Part list id"
                    },
                    "part_num": {
                        "type": "string",
                        "description": "Part number (e.g., '3020')"
                    },
                    "color_id": {
                        "type": "number",
                        "description": "Rebrickable color id"
                    },
                    "quantity": {
                        "type": "number",
                        "description": "Signed quantity change (default: 1)"
                    }
                },
                "required": ["list_id", "part_num", "color_id"]
            }),
        },
        Tool {
            name: "add_parts_to_list".to_string(),
            description: "Add several parts to a part list in a single batch. Each part+color already present in the list has its quantity increased; absent parts are created. The batch succeeds or fails as a whole.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "list_id": {
                        "type": "string",
                        "description": "Part list id"
                    },
                    "parts": {
                        "type": "array",
                        "description": "Parts to add, e.g. [{\"part_num\": \"3020\", \"color_id\": 0, \"quantity\": 5}]",
                        "items": {
                            "type": "object",
                            "properties": {
                                "part_num": {"type": "string"},
                                "color_id": {"type": "number"},
                                "quantity": {"type": "number", "description": "Amount to add (positive)"}
                            },
                            "required": ["part_num", "color_id", "quantity"]
                        }
                    }
                },
                "required": ["list_id", "parts"]
            }),
        },
        Tool {
            name: "update_part_in_list".to_string(),
            description: "Replace an existing part's quantity in a part list with an absolute value.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "list_id": {
                        "type": "string",
                        "description": "Part list id"
                    },
                    "part_num": {
                        "type": "string",
                        "description": "Part number"
                    },
                    "color_id": {
                        "type": "number",
                        "description": "Rebrickable color id"
                    },
                    "quantity": {
                        "type": "number",
                        "description": "Absolute quantity to store"
                    }
                },
                "required": ["list_id", "part_num", "color_id", "quantity"]
            }),
        },
        Tool {
            name: "delete_part_from_list".to_string(),
            description: "Remove a part entirely from a part list.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "list_id": {
                        "type": "string",
                        "description": "Part list id"
                    },
                    "part_num": {
                        "type": "string",
                        "description": "Part number"
                    },
                    "color_id": {
                        "type": "number",
                        "description": "Rebrickable color id"
                    }
                },
                "required": ["list_id", "part_num", "color_id"]
            }),
        },
        Tool {
            name: "move_parts_between_lists".to_string(),
            description: "Move parts from one part list to another. Adds or tops up each part in the destination, then drains the moved lines from the source. Returns a per-item report; individual failures are reported as error entries instead of aborting the move. If the move empties the source list, the list is deleted and recreated under a new id, reported as source_list_recreated and new_source_list_id — references to the old source list id become invalid.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "source_list_id": {
                        "type": "string",
                        "description": "Part list id to move parts out of"
                    },
                    "dest_list_id": {
                        "type": "string",
                        "description": "Part list id to move parts into"
                    },
                    "parts": {
                        "type": "array",
                        "description": "Parts to move, e.g. [{\"part_num\": \"3020\", \"color_id\": 0, \"quantity\": 5}]",
                        "items": {
                            "type": "object",
                            "properties": {
                                "part_num": {"type": "string"},
                                "color_id": {"type": "number"},
                                "quantity": {"type": "number", "description": "Amount to move (positive)"}
                            },
                            "required": ["part_num", "color_id", "quantity"]
                        }
                    }
                },
                "required": ["source_list_id", "dest_list_id", "parts"]
            }),
        },
    ];

    let result = ToolsList { tools };

    serde_json::to_value(result).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("Internal error: {e}"),
        data: None,
    })
}

pub async fn handle_tools_call(
    params: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: CallToolParams = serde_json::from_value(params.unwrap_or(serde_json::Value::Null))
        .map_err(|e| JsonRpcError {
            code: -32602,
            message: format!("Invalid params: {e}"),
            data: None,
        })?;

    match params.name.as_str() {
        "list_colors" => lego::handle_list_colors(params.arguments, global).await,
        "get_part" => lego::handle_get_part(params.arguments, global).await,
        "search_parts" => lego::handle_search_parts(params.arguments, global).await,
        "get_part_colors" => lego::handle_get_part_colors(params.arguments, global).await,
        "get_part_lists" => lists::handle_get_part_lists(params.arguments, global).await,
        "get_parts_in_list" => lists::handle_get_parts_in_list(params.arguments, global).await,
        "create_part_list" => lists::handle_create_part_list(params.arguments, global).await,
        "add_or_update_part" => lists::handle_add_or_update_part(params.arguments, global).await,
        "add_parts_to_list" => lists::handle_add_parts_to_list(params.arguments, global).await,
        "update_part_in_list" => lists::handle_update_part_in_list(params.arguments, global).await,
        "delete_part_from_list" => {
            lists::handle_delete_part_from_list(params.arguments, global).await
        }
        "move_parts_between_lists" => {
            lists::handle_move_parts_between_lists(params.arguments, global).await
        }
        _ => Err(JsonRpcError {
            code: -32602,
            message: format!("Unknown tool: {}", params.name),
            data: None,
        }),
    }
}
