use bricktools_core::partlist::PartDelta;
use serde::Deserialize;

use crate::prelude::{eprintln, *};

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

pub async fn handle_get_part_lists(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize, Default)]
    struct GetPartListsArgs {
        page: Option<u32>,
        page_size: Option<u32>,
    }

    let args: GetPartListsArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!(
            "Calling get_part_lists: page={:?}, page_size={:?}",
            args.page, args.page_size
        );
    }

    let value = crate::lists::read::get_part_lists_data(args.page, args.page_size)
        .await
        .map_err(tool_error)?;

    text_result(&value)
}

pub async fn handle_get_parts_in_list(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct GetPartsInListArgs {
        list_id: String,
        page: Option<u32>,
        page_size: Option<u32>,
        ordering: Option<String>,
    }

    let args: GetPartsInListArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!("Calling get_parts_in_list: list_id={}", args.list_id);
    }

    let value = crate::lists::read::get_parts_in_list_data(
        args.list_id,
        args.page,
        args.page_size,
        args.ordering,
    )
    .await
    .map_err(tool_error)?;

    text_result(&value)
}

pub async fn handle_create_part_list(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct CreatePartListArgs {
        name: String,
        num_parts: Option<u32>,
        is_buildable: Option<bool>,
    }

    let args: CreatePartListArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!("Calling create_part_list: name={}", args.name);
    }

    let value =
        crate::lists::read::create_part_list_data(args.name, args.num_parts, args.is_buildable)
            .await
            .map_err(tool_error)?;

    text_result(&value)
}

pub async fn handle_add_or_update_part(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct AddOrUpdatePartArgs {
        list_id: String,
        part_num: String,
        color_id: i64,
        quantity: Option<i64>,
    }

    let args: AddOrUpdatePartArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!(
            "Calling add_or_update_part: list_id={}, part={}:{}, quantity={:?}",
            args.list_id, args.part_num, args.color_id, args.quantity
        );
    }

    let outcome = crate::lists::add_or_update_part_data(
        args.list_id,
        args.part_num,
        args.color_id,
        args.quantity.unwrap_or(1),
    )
    .await
    .map_err(tool_error)?;

    text_result(&outcome)
}

pub async fn handle_add_parts_to_list(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct AddPartsToListArgs {
        list_id: String,
        parts: Vec<PartDelta>,
    }

    let args: AddPartsToListArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if args.parts.is_empty() {
        return Err(invalid_arguments("parts must not be empty"));
    }
    if args.parts.iter().any(|part| part.quantity == 0) {
        return Err(invalid_arguments("part quantities must be positive"));
    }

    if global.verbose {
        eprintln!(
            "Calling add_parts_to_list: list_id={}, {} parts",
            args.list_id,
            args.parts.len()
        );
    }

    let value = crate::lists::add_parts_to_list_data(args.list_id, args.parts)
        .await
        .map_err(tool_error)?;

    text_result(&value)
}

pub async fn handle_update_part_in_list(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct UpdatePartInListArgs {
        list_id: String,
        part_num: String,
        color_id: i64,
        quantity: u32,
    }

    let args: UpdatePartInListArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!(
            "Calling update_part_in_list: list_id={}, part={}:{}, quantity={}",
            args.list_id, args.part_num, args.color_id, args.quantity
        );
    }

    let value = crate::lists::read::update_part_in_list_data(
        args.list_id,
        args.part_num,
        args.color_id,
        args.quantity,
    )
    .await
    .map_err(tool_error)?;

    text_result(&value)
}

pub async fn handle_delete_part_from_list(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct DeletePartFromListArgs {
        list_id: String,
        part_num: String,
        color_id: i64,
    }

    let args: DeletePartFromListArgs =
        serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
            .map_err(invalid_arguments)?;

    if global.verbose {
        eprintln!(
            "Calling delete_part_from_list: list_id={}, part={}:{}",
            args.list_id, args.part_num, args.color_id
        );
    }

    let value = crate::lists::read::delete_part_from_list_data(
        args.list_id,
        args.part_num,
        args.color_id,
    )
    .await
    .map_err(tool_error)?;

    text_result(&value)
}

pub async fn handle_move_parts_between_lists(
    arguments: Option<serde_json::Value>,
    global: &crate::Global,
) -> Result<serde_json::Value, JsonRpcError> {
    #[derive(Deserialize)]
    struct MovePartsArgs {
        source_list_id: String,
        dest_list_id: String,
        parts: Vec<PartDelta>,
    }

    let args: MovePartsArgs = serde_json::from_value(arguments.unwrap_or(serde_json::Value::Null))
        .map_err(invalid_arguments)?;

    if args.parts.is_empty() {
        return Err(invalid_arguments("parts must not be empty"));
    }
    if args.parts.iter().any(|part| part.quantity == 0) {
        return Err(invalid_arguments("part quantities must be positive"));
    }

    if global.verbose {
        eprintln!(
            "Calling move_parts_between_lists: {} -> {}, {} parts",
            args.source_list_id,
            args.dest_list_id,
            args.parts.len()
        );
    }

    let result = crate::lists::move_parts_data(args.source_list_id, args.dest_list_id, args.parts)
        .await
        .map_err(tool_error)?;

    text_result(&result)
}
