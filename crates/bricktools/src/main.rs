#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod error;
mod lego;
mod lists;
mod mcp;
mod prelude;
mod rebrickable;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Rebrickable LEGO catalog and part-list tools"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "BRICKTOOLS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// LEGO catalog operations (parts, colors)
    Lego(crate::lego::App),

    /// User part-list operations
    Lists(crate::lists::App),

    /// Model Context Protocol server
    MCP(crate::mcp::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Lego(sub_app) => crate::lego::run(sub_app, app.global).await,
        SubCommands::Lists(sub_app) => crate::lists::run(sub_app, app.global).await,
        SubCommands::MCP(sub_app) => crate::mcp::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
