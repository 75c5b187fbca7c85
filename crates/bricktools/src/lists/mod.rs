use crate::prelude::{println, *};
use bricktools_core::movelist::{ItemOutcome, MoveResult};
use bricktools_core::partlist::PartDelta;
use colored::Colorize;

pub mod add_batch;
pub mod add_part;
pub mod move_parts;
pub mod read;

// Re-export public data functions
pub use add_batch::add_parts_to_list_data;
pub use add_part::add_or_update_part_data;
pub use move_parts::move_parts_data;

#[derive(Debug, clap::Parser)]
#[command(name = "lists")]
#[command(about = "User part-list operations")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List all the user's part lists
    #[clap(name = "list")]
    List(read::ListOptions),

    /// List the parts in a part list
    #[clap(name = "parts")]
    Parts(read::PartsOptions),

    /// Create a new part list
    #[clap(name = "create")]
    Create(read::CreateOptions),

    /// Add a part to a list, or adjust its quantity if already present
    #[clap(name = "add")]
    Add(add_part::AddOptions),

    /// Add several parts to a list in a single batch
    #[clap(name = "add-many")]
    AddMany(add_batch::AddManyOptions),

    /// Replace a part's quantity in a list
    #[clap(name = "update")]
    Update(read::UpdateOptions),

    /// Remove a part entirely from a list
    #[clap(name = "remove")]
    Remove(read::RemoveOptions),

    /// Move parts from one list to another
    #[clap(name = "move")]
    Move(move_parts::MoveOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::List(options) => read::list_handler(options, global).await,
        Commands::Parts(options) => read::parts_handler(options, global).await,
        Commands::Create(options) => read::create_handler(options, global).await,
        Commands::Add(options) => add_part::handler(options, global).await,
        Commands::AddMany(options) => add_batch::handler(options, global).await,
        Commands::Update(options) => read::update_handler(options, global).await,
        Commands::Remove(options) => read::remove_handler(options, global).await,
        Commands::Move(options) => move_parts::handler(options, global).await,
    }
}

/// Parse a `part_num:color_id:quantity` spec from the command line.
pub fn parse_part_spec(spec: &str) -> Result<PartDelta> {
    let fields: Vec<&str> = spec.split(':').collect();
    if fields.len() != 3 {
        return Err(eyre!(
            "Invalid part spec '{spec}': expected part_num:color_id:quantity"
        ));
    }

    let color_id = fields[1]
        .parse::<i64>()
        .map_err(|_| eyre!("Invalid color id in part spec '{spec}'"))?;
    let quantity = fields[2]
        .parse::<u32>()
        .map_err(|_| eyre!("Invalid quantity in part spec '{spec}'"))?;
    if quantity == 0 {
        return Err(eyre!("Quantity in part spec '{spec}' must be positive"));
    }

    Ok(PartDelta {
        part_num: fields[0].to_string(),
        color_id,
        quantity,
    })
}

fn outcome_label(outcome: &ItemOutcome) -> String {
    match outcome {
        ItemOutcome::Added { quantity } => f!("added {quantity}").green().to_string(),
        ItemOutcome::Updated { new_quantity, .. } => {
            f!("updated to {new_quantity}").green().to_string()
        }
        ItemOutcome::Deleted => "deleted".to_string(),
        ItemOutcome::Error { message } => f!("error: {message}").red().to_string(),
    }
}

/// Render a move result as a summary line plus a per-item table.
fn display_move_result(result: &MoveResult) {
    std::println!(
        "\n{} ({} parts)\n",
        result.status.bold().cyan(),
        result.parts_count
    );

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Part".bold(),
        "Color".bold(),
        "Moved".bold(),
        "Destination".bold(),
        "Source".bold()
    ]);
    for item in &result.add_result {
        table.add_row(prettytable::row![
            item.part_num,
            item.color_id,
            item.quantity_moved,
            outcome_label(&item.destination),
            outcome_label(&item.source)
        ]);
    }
    table.printstd();

    if result.source_list_recreated {
        std::println!();
        std::println!(
            "{} The source list was emptied by this move and has been recreated under a new id{}. References to the old list id are no longer valid.",
            "note:".bold().yellow(),
            result
                .new_source_list_id
                .map(|id| f!(" ({id})"))
                .unwrap_or_default()
        );
    }
}

#[cfg(test)]
pub mod fixture {
    //! In-memory [`InventoryApi`] used by the upsert and reconciler tests,
    //! with per-call failure switches for the partial-failure paths.

    use std::collections::{BTreeMap, BTreeSet};
    use std::sync::Mutex;

    use bricktools_core::partlist::{ListInfo, PartLine};

    use crate::prelude::f;
    use crate::rebrickable::{ApiError, InventoryApi};

    #[derive(Debug, Default)]
    pub struct MemoryList {
        pub name: String,
        pub lines: BTreeMap<(String, i64), u32>,
    }

    #[derive(Debug, Default)]
    pub struct State {
        pub lists: BTreeMap<String, MemoryList>,
        pub next_id: i64,
        pub calls: Vec<String>,
        /// List ids whose line-page fetch fails (destination snapshot).
        pub fail_lines_fetch: BTreeSet<String>,
        /// List ids whose metadata fetch fails (source drain planning).
        pub fail_list_fetch: BTreeSet<String>,
        /// List ids whose multi-item create fails (forces the fallback).
        pub fail_batch_create: BTreeSet<String>,
        /// Line keys whose individual create fails.
        pub fail_create_keys: BTreeSet<(String, i64)>,
        /// Line keys whose update fails.
        pub fail_update_keys: BTreeSet<(String, i64)>,
    }

    #[derive(Debug, Default)]
    pub struct MemoryApi {
        pub state: Mutex<State>,
    }

    fn remote_error(message: &str) -> ApiError {
        ApiError::Remote {
            status: 500,
            body: message.to_string(),
        }
    }

    impl MemoryApi {
        pub fn new() -> Self {
            let api = MemoryApi::default();
            api.state.lock().unwrap().next_id = 100;
            api
        }

        pub fn add_list(&self, id: &str, name: &str, lines: &[(&str, i64, u32)]) {
            let mut state = self.state.lock().unwrap();
            let list = MemoryList {
                name: name.to_string(),
                lines: lines
                    .iter()
                    .map(|&(part_num, color_id, quantity)| {
                        ((part_num.to_string(), color_id), quantity)
                    })
                    .collect(),
            };
            state.lists.insert(id.to_string(), list);
        }

        pub fn quantity(&self, list_id: &str, part_num: &str, color_id: i64) -> Option<u32> {
            let state = self.state.lock().unwrap();
            state
                .lists
                .get(list_id)?
                .lines
                .get(&(part_num.to_string(), color_id))
                .copied()
        }

        pub fn calls(&self) -> Vec<String> {
            self.state.lock().unwrap().calls.clone()
        }
    }

    impl InventoryApi for MemoryApi {
        async fn fetch_part(
            &self,
            list_id: &str,
            part_num: &str,
            color_id: i64,
        ) -> Result<Option<PartLine>, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(f!("fetch_part {list_id} {part_num} {color_id}"));
            let list = state.lists.get(list_id).ok_or(ApiError::NotFound)?;
            Ok(list
                .lines
                .get(&(part_num.to_string(), color_id))
                .map(|&quantity| PartLine {
                    part_num: part_num.to_string(),
                    color_id,
                    quantity,
                }))
        }

        async fn create_parts(&self, list_id: &str, items: &[PartLine]) -> Result<(), ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(f!("create_parts {list_id} x{}", items.len()));
            if items.len() > 1 && state.fail_batch_create.contains(list_id) {
                return Err(remote_error("batch create rejected"));
            }
            for item in items {
                let key = (item.part_num.clone(), item.color_id);
                if state.fail_create_keys.contains(&key) {
                    return Err(remote_error("create rejected"));
                }
            }
            let list = state
                .lists
                .get_mut(list_id)
                .ok_or(ApiError::NotFound)?;
            for item in items {
                // The remote POST upserts: an existing key accumulates.
                *list
                    .lines
                    .entry((item.part_num.clone(), item.color_id))
                    .or_insert(0) += item.quantity;
            }
            Ok(())
        }

        async fn update_part(
            &self,
            list_id: &str,
            part_num: &str,
            color_id: i64,
            quantity: u32,
        ) -> Result<(), ApiError> {
            let mut state = self.state.lock().unwrap();
            state
                .calls
                .push(f!("update_part {list_id} {part_num} {color_id} {quantity}"));
            let key = (part_num.to_string(), color_id);
            if state.fail_update_keys.contains(&key) {
                return Err(remote_error("update rejected"));
            }
            let list = state.lists.get_mut(list_id).ok_or(ApiError::NotFound)?;
            match list.lines.get_mut(&key) {
                Some(entry) => {
                    *entry = quantity;
                    Ok(())
                }
                None => Err(ApiError::NotFound),
            }
        }

        async fn delete_part(
            &self,
            list_id: &str,
            part_num: &str,
            color_id: i64,
        ) -> Result<(), ApiError> {
            let mut state = self.state.lock().unwrap();
            state
                .calls
                .push(f!("delete_part {list_id} {part_num} {color_id}"));
            let list = state.lists.get_mut(list_id).ok_or(ApiError::NotFound)?;
            list.lines
                .remove(&(part_num.to_string(), color_id))
                .map(|_| ())
                .ok_or(ApiError::NotFound)
        }

        async fn fetch_list(&self, list_id: &str) -> Result<ListInfo, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(f!("fetch_list {list_id}"));
            if state.fail_list_fetch.contains(list_id) {
                return Err(remote_error("list fetch rejected"));
            }
            let list = state.lists.get(list_id).ok_or(ApiError::NotFound)?;
            Ok(ListInfo {
                id: list_id.parse().unwrap_or(0),
                name: list.name.clone(),
                num_parts: list.lines.values().sum(),
            })
        }

        async fn fetch_list_lines(
            &self,
            list_id: &str,
            _page_size: u32,
        ) -> Result<Vec<PartLine>, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(f!("fetch_list_lines {list_id}"));
            if state.fail_lines_fetch.contains(list_id) {
                return Err(remote_error("line fetch rejected"));
            }
            let list = state.lists.get(list_id).ok_or(ApiError::NotFound)?;
            Ok(list
                .lines
                .iter()
                .map(|((part_num, color_id), &quantity)| PartLine {
                    part_num: part_num.clone(),
                    color_id: *color_id,
                    quantity,
                })
                .collect())
        }

        async fn delete_list(&self, list_id: &str) -> Result<(), ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(f!("delete_list {list_id}"));
            state
                .lists
                .remove(list_id)
                .map(|_| ())
                .ok_or(ApiError::NotFound)
        }

        async fn create_list(&self, name: &str) -> Result<ListInfo, ApiError> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(f!("create_list {name}"));
            let id = state.next_id;
            state.next_id += 1;
            state.lists.insert(
                id.to_string(),
                MemoryList {
                    name: name.to_string(),
                    lines: BTreeMap::new(),
                },
            );
            Ok(ListInfo {
                id,
                name: name.to_string(),
                num_parts: 0,
            })
        }
    }
}
