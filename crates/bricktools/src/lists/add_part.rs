//! Single-item upsert: add, adjust, or remove one line in a part list
//!
//! One fetch decides the action, at most one write applies it, both spaced
//! by the rate limiter. Remote failures other than the fetch's 404 abort
//! the operation.

use bricktools_core::partlist::{plan_upsert, PartLine, UpsertAction, UpsertOutcome};
use serde::{Deserialize, Serialize};

use crate::prelude::{println, *};
use crate::rebrickable::{ApiError, InventoryApi, RateLimiter, Rebrickable};

/// Options for adding or updating a part in a list
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct AddOptions {
    /// Part list id
    pub list_id: String,

    /// Part number (e.g., "3020")
    pub part_num: String,

    /// Rebrickable color id
    pub color_id: i64,

    /// Signed quantity change; negative values remove parts
    #[arg(short, long, default_value = "1", allow_hyphen_values = true)]
    pub quantity: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Apply a signed quantity delta to one `(part_num, color_id)` line.
///
/// Fetches the line, then creates, updates, or deletes it so that a
/// resulting quantity of zero or less removes the line instead of storing
/// it. Exactly one terminal state per invocation: added, updated, deleted,
/// or no_change.
pub async fn add_or_update_part<A: InventoryApi>(
    api: &A,
    limiter: &mut RateLimiter,
    list_id: &str,
    part_num: &str,
    color_id: i64,
    quantity: i64,
) -> Result<UpsertOutcome, ApiError> {
    limiter.wait().await;
    let existing = api.fetch_part(list_id, part_num, color_id).await?;

    let action = plan_upsert(existing.map(|line| line.quantity), quantity);
    match action {
        UpsertAction::Create { quantity } => {
            limiter.wait().await;
            let line = PartLine {
                part_num: part_num.to_string(),
                color_id,
                quantity,
            };
            api.create_parts(list_id, std::slice::from_ref(&line)).await?;
        }
        UpsertAction::Update { new, .. } => {
            limiter.wait().await;
            api.update_part(list_id, part_num, color_id, new).await?;
        }
        UpsertAction::Delete { .. } => {
            limiter.wait().await;
            api.delete_part(list_id, part_num, color_id).await?;
        }
        UpsertAction::NoChange => {}
    }

    Ok(action.outcome(quantity))
}

/// Env-bound wrapper over [`add_or_update_part`] for the CLI and MCP tools.
pub async fn add_or_update_part_data(
    list_id: String,
    part_num: String,
    color_id: i64,
    quantity: i64,
) -> Result<UpsertOutcome> {
    let api = Rebrickable::from_env()?;
    let mut limiter = RateLimiter::api_default();

    add_or_update_part(&api, &mut limiter, &list_id, &part_num, color_id, quantity)
        .await
        .map_err(|e| eyre!("Failed to upsert part: {e}"))
}

/// Handle the add command
pub async fn handler(options: AddOptions, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!(
            "Upserting {}:{} in list {} by {}",
            options.part_num, options.color_id, options.list_id, options.quantity
        );
    }

    let outcome = add_or_update_part_data(
        options.list_id,
        options.part_num,
        options.color_id,
        options.quantity,
    )
    .await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        match &outcome {
            UpsertOutcome::Added { quantity } => println!("Added {quantity} parts"),
            UpsertOutcome::Updated {
                old_quantity,
                new_quantity,
                ..
            } => println!("Updated quantity {old_quantity} -> {new_quantity}"),
            UpsertOutcome::Deleted { removed, .. } => {
                println!("Deleted line ({removed} parts removed)")
            }
            UpsertOutcome::NoChange { message } => println!("No change: {message}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lists::fixture::MemoryApi;
    use std::time::Duration;

    fn fast_limiter() -> RateLimiter {
        RateLimiter::new(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_positive_delta_creates_absent_line() {
        let api = MemoryApi::new();
        api.add_list("7", "bin", &[]);
        let mut limiter = fast_limiter();

        let outcome = add_or_update_part(&api, &mut limiter, "7", "3020", 0, 5)
            .await
            .unwrap();

        assert_eq!(outcome, UpsertOutcome::Added { quantity: 5 });
        assert_eq!(api.quantity("7", "3020", 0), Some(5));

        // A subsequent fetch observes the created quantity.
        let line = api.fetch_part("7", "3020", 0).await.unwrap().unwrap();
        assert_eq!(line.quantity, 5);
    }

    #[tokio::test]
    async fn test_delta_adjusts_existing_line() {
        let api = MemoryApi::new();
        api.add_list("7", "bin", &[("3020", 0, 4)]);
        let mut limiter = fast_limiter();

        let outcome = add_or_update_part(&api, &mut limiter, "7", "3020", 0, 3)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            UpsertOutcome::Updated {
                old_quantity: 4,
                added: 3,
                new_quantity: 7,
            }
        );
        assert_eq!(api.quantity("7", "3020", 0), Some(7));
    }

    #[tokio::test]
    async fn test_delta_emptying_line_deletes_it() {
        let api = MemoryApi::new();
        api.add_list("7", "bin", &[("3020", 0, 4)]);
        let mut limiter = fast_limiter();

        let outcome = add_or_update_part(&api, &mut limiter, "7", "3020", 0, -6)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            UpsertOutcome::Deleted {
                old_quantity: 4,
                removed: 4,
            }
        );
        assert_eq!(api.quantity("7", "3020", 0), None);
    }

    #[tokio::test]
    async fn test_non_positive_delta_on_absent_line_issues_no_write() {
        let api = MemoryApi::new();
        api.add_list("7", "bin", &[]);
        let mut limiter = fast_limiter();

        let outcome = add_or_update_part(&api, &mut limiter, "7", "3020", 0, -2)
            .await
            .unwrap();

        assert!(matches!(outcome, UpsertOutcome::NoChange { .. }));
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("fetch_part"));
    }

    #[tokio::test]
    async fn test_zero_delta_on_existing_line_is_idempotent_update() {
        let api = MemoryApi::new();
        api.add_list("7", "bin", &[("3020", 0, 4)]);
        let mut limiter = fast_limiter();

        let outcome = add_or_update_part(&api, &mut limiter, "7", "3020", 0, 0)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            UpsertOutcome::Updated {
                old_quantity: 4,
                added: 0,
                new_quantity: 4,
            }
        );
        assert_eq!(api.quantity("7", "3020", 0), Some(4));
    }
}
