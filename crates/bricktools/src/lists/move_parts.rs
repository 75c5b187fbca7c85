//! Batch move reconciliation between two part lists
//!
//! The remote API batches creation but not update or deletion, so the two
//! sides of a move are handled asymmetrically: the destination gets one
//! snapshot, one batched create for absent lines, and individual updates
//! for present ones; the source is then drained either line by line or,
//! when the move empties it, by deleting and recreating the whole list.
//! Partial failure is a first-class outcome: every input delta gets a
//! per-item record whether or not its calls succeeded.

use bricktools_core::movelist::{classify, plan_drain, DrainMode, ItemOutcome, MoveResult};
use bricktools_core::partlist::{PartDelta, PartLine};
use serde::{Deserialize, Serialize};

use crate::prelude::{println, *};
use crate::rebrickable::{InventoryApi, RateLimiter, Rebrickable};

/// Page size for the destination snapshot; large enough to capture any
/// realistic part list in a single page.
pub const SNAPSHOT_PAGE_SIZE: u32 = 1000;

/// Options for moving parts between lists
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct MoveOptions {
    /// Source part list id
    pub source_list_id: String,

    /// Destination part list id
    pub dest_list_id: String,

    /// Part to move, as part_num:color_id:quantity (repeatable)
    #[arg(short, long = "part", required = true)]
    pub parts: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Move the given deltas from `source_list_id` to `dest_list_id`.
///
/// Strictly sequential; each remote call is spaced by the rate limiter.
/// Always returns a [`MoveResult`] with exactly one record per input delta,
/// never an error: item-level failures are captured as `error` outcomes and
/// the two unrecoverable fetches (destination snapshot, source metadata)
/// fall back to defaults instead of propagating.
///
/// When the source's reported `num_parts` does not exceed the total
/// requested quantity, the source is drained by deleting the entire list
/// and recreating an empty one under the same name. The recreated list has
/// a new id, carried in `MoveResult::new_source_list_id`.
pub async fn move_parts<A: InventoryApi>(
    api: &A,
    limiter: &mut RateLimiter,
    source_list_id: &str,
    dest_list_id: &str,
    parts: &[PartDelta],
) -> MoveResult {
    let mut ledger = bricktools_core::movelist::MoveLedger::new(parts);

    // Snapshot the destination; on failure assume empty so that every
    // delta routes through the create path.
    limiter.wait().await;
    let snapshot = api
        .fetch_list_lines(dest_list_id, SNAPSHOT_PAGE_SIZE)
        .await
        .unwrap_or_default();

    let classified = classify(&snapshot, parts);

    // One batched create for all absent lines, falling back to individual
    // creates when the batch is rejected.
    if !classified.new.is_empty() {
        let items: Vec<PartLine> = classified
            .new
            .iter()
            .map(|delta| PartLine {
                part_num: delta.part_num.clone(),
                color_id: delta.color_id,
                quantity: delta.quantity,
            })
            .collect();

        limiter.wait().await;
        match api.create_parts(dest_list_id, &items).await {
            Ok(()) => {
                for delta in &classified.new {
                    ledger.record_destination(
                        &delta.part_num,
                        delta.color_id,
                        ItemOutcome::Added {
                            quantity: delta.quantity,
                        },
                    );
                }
            }
            Err(_) => {
                for item in &items {
                    limiter.wait().await;
                    let outcome = match api
                        .create_parts(dest_list_id, std::slice::from_ref(item))
                        .await
                    {
                        Ok(()) => ItemOutcome::Added {
                            quantity: item.quantity,
                        },
                        Err(err) => ItemOutcome::Error {
                            message: err.to_string(),
                        },
                    };
                    ledger.record_destination(&item.part_num, item.color_id, outcome);
                }
            }
        }
    }

    // Individual updates for lines already present in the destination; a
    // failing item does not abort the rest.
    for existing in &classified.existing {
        limiter.wait().await;
        let outcome = match api
            .update_part(
                dest_list_id,
                &existing.part_num,
                existing.color_id,
                existing.new_quantity,
            )
            .await
        {
            Ok(()) => ItemOutcome::Updated {
                old_quantity: existing.old_quantity,
                added: existing.quantity_moved,
                new_quantity: existing.new_quantity,
            },
            Err(err) => ItemOutcome::Error {
                message: err.to_string(),
            },
        };
        ledger.record_destination(&existing.part_num, existing.color_id, outcome);
    }

    // Drain the source. A failing metadata fetch falls back to best-effort
    // individual deletes.
    limiter.wait().await;
    let drain = match api.fetch_list(source_list_id).await {
        Ok(info) => (plan_drain(info.num_parts, parts), Some(info.name)),
        Err(_) => (DrainMode::BestEffort, None),
    };

    let mut recreated = false;
    let mut new_source_list_id = None;
    match drain {
        (DrainMode::Recreate, Some(name)) => {
            limiter.wait().await;
            match api.delete_list(source_list_id).await {
                Ok(()) => {
                    recreated = true;
                    limiter.wait().await;
                    if let Ok(info) = api.create_list(&name).await {
                        new_source_list_id = Some(info.id);
                    }
                    // Reported without per-item confirmation: the whole
                    // list is gone.
                    for part in parts {
                        ledger.record_source(&part.part_num, part.color_id, ItemOutcome::Deleted);
                    }
                }
                Err(_) => {
                    drain_best_effort(api, limiter, source_list_id, parts, &mut ledger).await;
                }
            }
        }
        _ => {
            drain_best_effort(api, limiter, source_list_id, parts, &mut ledger).await;
        }
    }

    ledger.finish(recreated, new_source_list_id)
}

/// Delete each moved line from the source individually, swallowing
/// individual failures (best effort, uncounted).
async fn drain_best_effort<A: InventoryApi>(
    api: &A,
    limiter: &mut RateLimiter,
    source_list_id: &str,
    parts: &[PartDelta],
    ledger: &mut bricktools_core::movelist::MoveLedger,
) {
    for part in parts {
        limiter.wait().await;
        let _ = api
            .delete_part(source_list_id, &part.part_num, part.color_id)
            .await;
        ledger.record_source(&part.part_num, part.color_id, ItemOutcome::Deleted);
    }
}

/// Env-bound wrapper over [`move_parts`] for the CLI and MCP tools.
pub async fn move_parts_data(
    source_list_id: String,
    dest_list_id: String,
    parts: Vec<PartDelta>,
) -> Result<MoveResult> {
    let api = Rebrickable::from_env()?;
    let mut limiter = RateLimiter::api_default();

    Ok(move_parts(&api, &mut limiter, &source_list_id, &dest_list_id, &parts).await)
}

/// Handle the move command
pub async fn handler(options: MoveOptions, global: crate::Global) -> Result<()> {
    let parts = options
        .parts
        .iter()
        .map(|spec| super::parse_part_spec(spec))
        .collect::<Result<Vec<PartDelta>>>()?;

    if global.verbose {
        println!(
            "Moving {} parts from list {} to list {}",
            parts.len(),
            options.source_list_id,
            options.dest_list_id
        );
    }

    let result = move_parts_data(options.source_list_id, options.dest_list_id, parts).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        super::display_move_result(&result);
    }

    Ok(())
}
