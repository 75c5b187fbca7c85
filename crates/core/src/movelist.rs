//! Batch-move classification, source-drain policy, and result assembly
//!
//! A move between two part lists is applied as: snapshot the destination,
//! split the requested deltas into lines to create versus lines to update,
//! then drain the source. The functions here make those decisions and
//! assemble the per-item report; all remote effects stay in the shell.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::partlist::{PartDelta, PartLine};

/// A requested delta whose line already exists in the destination, with the
/// replacement quantity precomputed from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingUpdate {
    pub part_num: String,
    pub color_id: i64,
    pub quantity_moved: u32,
    pub old_quantity: u32,
    pub new_quantity: u32,
}

/// Requested deltas split by membership in the destination snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classified {
    /// Absent from the destination: candidates for one batched create.
    pub new: Vec<PartDelta>,
    /// Present in the destination: updated individually.
    pub existing: Vec<ExistingUpdate>,
}

/// Split `parts` into new and existing lines against a destination snapshot.
///
/// An empty snapshot (including the fetch-failure fallback, where the
/// destination is treated as empty) classifies every delta as new.
pub fn classify(snapshot: &[PartLine], parts: &[PartDelta]) -> Classified {
    let by_key: BTreeMap<(&str, i64), u32> = snapshot
        .iter()
        .map(|line| (line.key(), line.quantity))
        .collect();

    let mut classified = Classified::default();
    for part in parts {
        match by_key.get(&part.key()) {
            Some(&old_quantity) => classified.existing.push(ExistingUpdate {
                part_num: part.part_num.clone(),
                color_id: part.color_id,
                quantity_moved: part.quantity,
                old_quantity,
                new_quantity: old_quantity.saturating_add(part.quantity),
            }),
            None => classified.new.push(part.clone()),
        }
    }
    classified
}

/// How the source list is drained after the destination has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainMode {
    /// The move empties (or would over-empty) the source: delete the whole
    /// list and recreate an empty one under the same name. The recreated
    /// list has a new id; callers holding the old id must re-resolve it.
    Recreate,
    /// Partial move: delete each moved line individually, swallowing
    /// individual delete failures (best effort, uncounted).
    BestEffort,
}

/// Pick the drain mode from the source list's server-reported `num_parts`.
///
/// The threshold compares `num_parts` against the sum of requested
/// quantities, not a verified per-line balance. A source list holding lines
/// the move never references can therefore trigger recreation even though
/// those lines would survive an individual drain; this mirrors the remote
/// API's lack of a bulk-delete and is intentional.
pub fn plan_drain(num_parts: u32, parts: &[PartDelta]) -> DrainMode {
    let total: u64 = parts.iter().map(|part| u64::from(part.quantity)).sum();
    if u64::from(num_parts) <= total {
        DrainMode::Recreate
    } else {
        DrainMode::BestEffort
    }
}

/// Terminal state of one side (destination or source) of one moved item.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Added {
        quantity: u32,
    },
    Updated {
        old_quantity: u32,
        added: u32,
        new_quantity: u32,
    },
    Deleted,
    Error {
        message: String,
    },
}

impl ItemOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ItemOutcome::Error { .. })
    }
}

/// Per-item record of a completed move.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MoveItemResult {
    pub part_num: String,
    pub color_id: i64,
    pub quantity_moved: u32,
    pub destination: ItemOutcome,
    pub source: ItemOutcome,
}

/// Top-level result of a move operation. Always produced, even when every
/// item failed; failures are data, not errors.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub status: String,
    pub parts_count: usize,
    pub add_result: Vec<MoveItemResult>,
    pub source_list_recreated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_source_list_id: Option<i64>,
}

/// Accumulates per-item outcomes during a move and assembles the final
/// [`MoveResult`] in input order.
///
/// Invariant: `finish` emits exactly one record per input delta.
#[derive(Debug)]
pub struct MoveLedger {
    parts: Vec<PartDelta>,
    destination: BTreeMap<(String, i64), ItemOutcome>,
    source: BTreeMap<(String, i64), ItemOutcome>,
}

impl MoveLedger {
    pub fn new(parts: &[PartDelta]) -> Self {
        MoveLedger {
            parts: parts.to_vec(),
            destination: BTreeMap::new(),
            source: BTreeMap::new(),
        }
    }

    pub fn record_destination(&mut self, part_num: &str, color_id: i64, outcome: ItemOutcome) {
        self.destination
            .insert((part_num.to_string(), color_id), outcome);
    }

    pub fn record_source(&mut self, part_num: &str, color_id: i64, outcome: ItemOutcome) {
        self.source
            .insert((part_num.to_string(), color_id), outcome);
    }

    pub fn finish(self, source_list_recreated: bool, new_source_list_id: Option<i64>) -> MoveResult {
        let missing = || ItemOutcome::Error {
            message: "no outcome recorded for item".to_string(),
        };

        let add_result: Vec<MoveItemResult> = self
            .parts
            .iter()
            .map(|part| {
                let key = (part.part_num.clone(), part.color_id);
                let destination = self.destination.get(&key).cloned().unwrap_or_else(missing);
                let source = self.source.get(&key).cloned().unwrap_or_else(missing);
                let quantity_moved = if destination.is_error() { 0 } else { part.quantity };
                MoveItemResult {
                    part_num: part.part_num.clone(),
                    color_id: part.color_id,
                    quantity_moved,
                    destination,
                    source,
                }
            })
            .collect();

        let status = if add_result
            .iter()
            .any(|item| item.destination.is_error() || item.source.is_error())
        {
            "partial".to_string()
        } else {
            "moved".to_string()
        };

        MoveResult {
            status,
            parts_count: add_result.len(),
            add_result,
            source_list_recreated,
            new_source_list_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(part_num: &str, color_id: i64, quantity: u32) -> PartLine {
        PartLine {
            part_num: part_num.to_string(),
            color_id,
            quantity,
        }
    }

    fn delta(part_num: &str, color_id: i64, quantity: u32) -> PartDelta {
        PartDelta {
            part_num: part_num.to_string(),
            color_id,
            quantity,
        }
    }

    #[test]
    fn test_classify_splits_by_destination_membership() {
        let snapshot = vec![line("3020", 0, 4), line("3001", 72, 2)];
        let parts = vec![delta("3020", 0, 5), delta("3021", 15, 1)];

        let classified = classify(&snapshot, &parts);

        assert_eq!(classified.new, vec![delta("3021", 15, 1)]);
        assert_eq!(
            classified.existing,
            vec![ExistingUpdate {
                part_num: "3020".to_string(),
                color_id: 0,
                quantity_moved: 5,
                old_quantity: 4,
                new_quantity: 9,
            }]
        );
    }

    #[test]
    fn test_classify_same_part_different_color_is_new() {
        let snapshot = vec![line("3020", 0, 4)];
        let parts = vec![delta("3020", 15, 2)];

        let classified = classify(&snapshot, &parts);

        assert!(classified.existing.is_empty());
        assert_eq!(classified.new, vec![delta("3020", 15, 2)]);
    }

    #[test]
    fn test_classify_empty_snapshot_routes_everything_to_new() {
        // The shell falls back to an empty snapshot when the destination
        // fetch fails, so every delta must land on the create path.
        let parts = vec![delta("3020", 0, 5), delta("3001", 72, 2)];

        let classified = classify(&[], &parts);

        assert_eq!(classified.new, parts);
        assert!(classified.existing.is_empty());
    }

    #[test]
    fn test_classify_saturates_instead_of_overflowing() {
        let snapshot = vec![line("3020", 0, u32::MAX - 1)];
        let parts = vec![delta("3020", 0, 5)];

        let classified = classify(&snapshot, &parts);

        assert_eq!(classified.existing[0].new_quantity, u32::MAX);
    }

    #[test]
    fn test_plan_drain_recreates_when_move_empties_source() {
        let parts = vec![delta("3020", 0, 3), delta("3001", 72, 2)];

        assert_eq!(plan_drain(5, &parts), DrainMode::Recreate);
        assert_eq!(plan_drain(4, &parts), DrainMode::Recreate);
    }

    #[test]
    fn test_plan_drain_best_effort_for_partial_move() {
        let parts = vec![delta("3020", 0, 3), delta("3001", 72, 2)];

        assert_eq!(plan_drain(6, &parts), DrainMode::BestEffort);
    }

    #[test]
    fn test_ledger_emits_one_record_per_input_delta() {
        let parts = vec![delta("3020", 0, 5), delta("3001", 72, 2)];
        let mut ledger = MoveLedger::new(&parts);

        ledger.record_destination("3020", 0, ItemOutcome::Added { quantity: 5 });
        ledger.record_source("3020", 0, ItemOutcome::Deleted);
        ledger.record_destination(
            "3001",
            72,
            ItemOutcome::Updated {
                old_quantity: 1,
                added: 2,
                new_quantity: 3,
            },
        );
        ledger.record_source("3001", 72, ItemOutcome::Deleted);

        let result = ledger.finish(false, None);

        assert_eq!(result.add_result.len(), parts.len());
        assert_eq!(result.parts_count, 2);
        assert_eq!(result.status, "moved");
        assert!(!result.source_list_recreated);
        assert_eq!(result.add_result[0].quantity_moved, 5);
        assert_eq!(result.add_result[1].quantity_moved, 2);
    }

    #[test]
    fn test_ledger_reports_partial_when_an_item_errors() {
        let parts = vec![delta("3020", 0, 5), delta("3001", 72, 2)];
        let mut ledger = MoveLedger::new(&parts);

        ledger.record_destination(
            "3020",
            0,
            ItemOutcome::Error {
                message: "create failed".to_string(),
            },
        );
        ledger.record_source("3020", 0, ItemOutcome::Deleted);
        ledger.record_destination("3001", 72, ItemOutcome::Added { quantity: 2 });
        ledger.record_source("3001", 72, ItemOutcome::Deleted);

        let result = ledger.finish(false, None);

        assert_eq!(result.status, "partial");
        assert_eq!(result.add_result.len(), 2);
        assert_eq!(result.add_result[0].quantity_moved, 0);
        assert!(result.add_result[0].destination.is_error());
        assert_eq!(result.add_result[1].quantity_moved, 2);
        assert!(!result.add_result[1].destination.is_error());
    }

    #[test]
    fn test_ledger_carries_recreated_source_identity() {
        let parts = vec![delta("3020", 0, 5)];
        let mut ledger = MoveLedger::new(&parts);
        ledger.record_destination("3020", 0, ItemOutcome::Added { quantity: 5 });
        ledger.record_source("3020", 0, ItemOutcome::Deleted);

        let result = ledger.finish(true, Some(9911));

        assert!(result.source_list_recreated);
        assert_eq!(result.new_source_list_id, Some(9911));
    }

    #[test]
    fn test_item_outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(ItemOutcome::Deleted).unwrap();
        assert_eq!(json, serde_json::json!({"status": "deleted"}));

        let json = serde_json::to_value(ItemOutcome::Error {
            message: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "boom");
    }

    #[test]
    fn test_move_result_omits_absent_new_source_list_id() {
        let ledger = MoveLedger::new(&[]);
        let result = ledger.finish(false, None);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("new_source_list_id").is_none());
        assert_eq!(json["parts_count"], 0);
        assert_eq!(json["status"], "moved");
    }
}
