//! Crate-wide imports for the bricktools shell.

pub use crate::error::Error;

pub use anstream::eprintln;
pub use anstream::println;
pub use color_eyre::eyre::{eyre, Context, OptionExt, Result};
pub use std::format as f;

/// Borderless two-column table used for human-readable command output.
pub fn new_table() -> prettytable::Table {
    let mut table = prettytable::Table::new();

    let format = prettytable::format::FormatBuilder::new()
        .padding(1, 1)
        .build();

    table.set_format(format);

    table
}
