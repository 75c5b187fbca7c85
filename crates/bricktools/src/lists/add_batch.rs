//! Batch add: create or top up several lines in one POST
//!
//! Thin passthrough over the batch-create endpoint; the remote upserts each
//! `(part_num, color_id)` key, accumulating quantities for keys already
//! present. Unlike the move reconciler there is no per-item fallback: the
//! batch succeeds or fails as a whole.

use bricktools_core::partlist::{PartDelta, PartLine};
use serde::{Deserialize, Serialize};

use crate::prelude::{println, *};
use crate::rebrickable::{ApiError, InventoryApi, Rebrickable};

/// Options for adding several parts to a list at once
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct AddManyOptions {
    /// Part list id
    pub list_id: String,

    /// Part to add, as part_num:color_id:quantity (repeatable)
    #[arg(short, long = "part", required = true)]
    pub parts: Vec<String>,
}

/// Add all given parts to `list_id` in a single batch POST.
pub async fn add_parts<A: InventoryApi>(
    api: &A,
    list_id: &str,
    parts: &[PartDelta],
) -> Result<serde_json::Value, ApiError> {
    let items: Vec<PartLine> = parts
        .iter()
        .map(|delta| PartLine {
            part_num: delta.part_num.clone(),
            color_id: delta.color_id,
            quantity: delta.quantity,
        })
        .collect();

    api.create_parts(list_id, &items).await?;

    Ok(serde_json::json!({
        "status": "added",
        "parts_count": items.len(),
    }))
}

/// Env-bound wrapper over [`add_parts`] for the CLI and MCP tools.
pub async fn add_parts_to_list_data(
    list_id: String,
    parts: Vec<PartDelta>,
) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;

    add_parts(&api, &list_id, &parts)
        .await
        .map_err(|e| eyre!("Failed to add parts to list: {e}"))
}

/// Handle the add-many command
pub async fn handler(options: AddManyOptions, global: crate::Global) -> Result<()> {
    let parts = options
        .parts
        .iter()
        .map(|spec| super::parse_part_spec(spec))
        .collect::<Result<Vec<PartDelta>>>()?;

    if global.verbose {
        println!("Adding {} parts to list {}", parts.len(), options.list_id);
    }

    let value = add_parts_to_list_data(options.list_id, parts).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);

    Ok(())
}
