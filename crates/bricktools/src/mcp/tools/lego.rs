use crate::prelude::{eprintln, *};
use serde::Deserialize;

use super::{text_result, JsonRpcError};

fn invalid_arguments(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32602,
        message: format!("Invalid arguments: {e}"),
        data: None,
    }
}

fn tool_error(e: impl std::fmt::Display) -> JsonRpcError {
    JsonRpcError {
        code: -32603,
        message: format!("Tool execution error: {e}"),
        data: None,
    }
}

pub async fn handle_list_colors(
    _arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    if global.verbose {
        eprintln!("Calling list_colors");
    }

    let entries = crate::lego::list_colors_data().await.map_err(tool_error)?;

    text_result(&entries)
}

pub async fn handle_get_part(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct GetPartArgs {
        part_num: String,
    }

    let args: GetPartArgs = serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
        .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!("Calling get_part: part_num={}", args.part_num);
    }

    let value = crate::lego::get_part_data(args.part_num)
        .await
        .map_err(tool_error)?;

    text_result(&value)
}

pub async fn handle_search_parts(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct SearchPartsArgs {
        search: String,
        part_cat_id: Option<u32>,
        page: Option<u32>,
        page_size: Option<u32>,
    }

    let args: SearchPartsArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!(
            "Calling search_parts: search={}, part_cat_id={:?}",
            args.search, args.part_cat_id
        );
    }

    let value = crate::lego::search_parts_data(
        args.search,
        args.part_cat_id,
        args.page,
        args.page_size,
    )
    .await
    .map_err(tool_error)?;

    text_result(&value)
}

pub async fn handle_get_part_colors(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct GetPartColorsArgs {
        part_num: String,
    }

    let args: GetPartColorsArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!("Calling get_part_colors: part_num={}", args.part_num);
    }

    let value = crate::lego::get_part_colors_data(args.part_num)
        .await
        .map_err(tool_error)?;

    text_result(&value)
}
