//! Part-list line types and the single-item upsert decision
//!
//! A part list is a remote-owned collection of lines keyed by
//! `(part_num, color_id)`. A line with quantity `<= 0` does not exist: the
//! upsert decision below turns a signed delta against the observed state of
//! one line into exactly one action for the shell to execute.

use serde::{Deserialize, Serialize};

/// One `(part_num, color_id) -> quantity` line within a part list.
///
/// Serializes to the shape the Rebrickable batch-create endpoint accepts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PartLine {
    pub part_num: String,
    pub color_id: i64,
    pub quantity: u32,
}

impl PartLine {
    pub fn key(&self) -> (&str, i64) {
        (&self.part_num, self.color_id)
    }
}

/// A requested amount to move for one line. Always positive, distinct from
/// [`PartLine::quantity`] which is an absolute level.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PartDelta {
    pub part_num: String,
    pub color_id: i64,
    pub quantity: u32,
}

impl PartDelta {
    pub fn key(&self) -> (&str, i64) {
        (&self.part_num, self.color_id)
    }
}

/// Part-list metadata as reported by the remote system.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ListInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub num_parts: u32,
}

/// One entry of a part-list page as returned by the API, with the part and
/// color nested as objects.
#[derive(Debug, Deserialize, Clone)]
pub struct PartListEntry {
    pub quantity: u32,
    pub part: PartRef,
    pub color: ColorRef,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PartRef {
    pub part_num: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ColorRef {
    pub id: i64,
}

impl From<PartListEntry> for PartLine {
    fn from(entry: PartListEntry) -> Self {
        PartLine {
            part_num: entry.part.part_num,
            color_id: entry.color.id,
            quantity: entry.quantity,
        }
    }
}

/// The single remote action an upsert resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertAction {
    /// Line absent, positive delta: create it at `quantity`.
    Create { quantity: u32 },
    /// Line present and the delta keeps it above zero: replace its quantity.
    Update { old: u32, new: u32 },
    /// Line present and the delta empties it: remove the line.
    Delete { old: u32 },
    /// Line absent and the delta is not positive: nothing to do.
    NoChange,
}

/// Decide what to do with one line given its observed quantity and a signed
/// delta.
///
/// `existing` is `None` when the fetch reported the line absent (remote 404).
/// A resulting quantity of zero deletes the line rather than storing a zero.
pub fn plan_upsert(existing: Option<u32>, delta: i64) -> UpsertAction {
    match existing {
        Some(old) => {
            let new = i64::from(old) + delta;
            if new <= 0 {
                UpsertAction::Delete { old }
            } else {
                UpsertAction::Update {
                    old,
                    new: new as u32,
                }
            }
        }
        None if delta > 0 => UpsertAction::Create {
            quantity: delta as u32,
        },
        None => UpsertAction::NoChange,
    }
}

/// Structured outcome of an upsert, one terminal state per invocation.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpsertOutcome {
    Added {
        quantity: u32,
    },
    Updated {
        old_quantity: u32,
        added: i64,
        new_quantity: u32,
    },
    Deleted {
        old_quantity: u32,
        removed: u32,
    },
    NoChange {
        message: String,
    },
}

impl UpsertAction {
    /// The outcome record this action produces once executed.
    pub fn outcome(&self, delta: i64) -> UpsertOutcome {
        match *self {
            UpsertAction::Create { quantity } => UpsertOutcome::Added { quantity },
            UpsertAction::Update { old, new } => UpsertOutcome::Updated {
                old_quantity: old,
                added: delta,
                new_quantity: new,
            },
            UpsertAction::Delete { old } => UpsertOutcome::Deleted {
                old_quantity: old,
                removed: old,
            },
            UpsertAction::NoChange => UpsertOutcome::NoChange {
                message: "part not present in list and quantity is not positive; nothing to do"
                    .to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_upsert_creates_absent_line_with_positive_delta() {
        assert_eq!(
            plan_upsert(None, 5),
            UpsertAction::Create { quantity: 5 }
        );
    }

    #[test]
    fn test_plan_upsert_no_change_for_absent_line_and_non_positive_delta() {
        assert_eq!(plan_upsert(None, 0), UpsertAction::NoChange);
        assert_eq!(plan_upsert(None, -3), UpsertAction::NoChange);
    }

    #[test]
    fn test_plan_upsert_updates_existing_line() {
        assert_eq!(
            plan_upsert(Some(4), 3),
            UpsertAction::Update { old: 4, new: 7 }
        );
        assert_eq!(
            plan_upsert(Some(4), -3),
            UpsertAction::Update { old: 4, new: 1 }
        );
    }

    #[test]
    fn test_plan_upsert_zero_delta_is_idempotent_update() {
        assert_eq!(
            plan_upsert(Some(4), 0),
            UpsertAction::Update { old: 4, new: 4 }
        );

        let outcome = plan_upsert(Some(4), 0).outcome(0);
        assert_eq!(
            outcome,
            UpsertOutcome::Updated {
                old_quantity: 4,
                added: 0,
                new_quantity: 4,
            }
        );
    }

    #[test]
    fn test_plan_upsert_deletes_when_delta_empties_line() {
        assert_eq!(plan_upsert(Some(4), -4), UpsertAction::Delete { old: 4 });
        assert_eq!(plan_upsert(Some(4), -10), UpsertAction::Delete { old: 4 });
    }

    #[test]
    fn test_upsert_outcome_serializes_with_status_tag() {
        let outcome = UpsertAction::Create { quantity: 2 }.outcome(2);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "added");
        assert_eq!(json["quantity"], 2);

        let outcome = UpsertAction::Delete { old: 6 }.outcome(-6);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "deleted");
        assert_eq!(json["old_quantity"], 6);
        assert_eq!(json["removed"], 6);
    }

    #[test]
    fn test_part_list_entry_flattens_to_part_line() {
        let entry = PartListEntry {
            quantity: 12,
            part: PartRef {
                part_num: "3020".to_string(),
            },
            color: ColorRef { id: 0 },
        };

        let line = PartLine::from(entry);
        assert_eq!(
            line,
            PartLine {
                part_num: "3020".to_string(),
                color_id: 0,
                quantity: 12,
            }
        );
    }

    #[test]
    fn test_part_line_serializes_to_batch_create_shape() {
        let line = PartLine {
            part_num: "3001".to_string(),
            color_id: 72,
            quantity: 3,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"part_num": "3001", "color_id": 72, "quantity": 3})
        );
    }
}
