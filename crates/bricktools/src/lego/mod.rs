use serde::{Deserialize, Serialize};

use crate::prelude::{println, *};
use crate::rebrickable::Rebrickable;

pub mod colors;

// Re-export public data functions
pub use colors::list_colors_data;

#[derive(Debug, clap::Parser)]
#[command(name = "lego")]
#[command(about = "LEGO catalog operations (parts, colors)")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Fetch part details, including variants
    #[clap(name = "get-part")]
    GetPart(GetPartOptions),

    /// Search for parts by name or number
    #[clap(name = "search")]
    Search(SearchOptions),

    /// List all colors a part comes in
    #[clap(name = "part-colors")]
    PartColors(PartColorsOptions),

    /// List all color names and ids from the local cache
    #[clap(name = "colors")]
    Colors(colors::ColorsOptions),
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    match app.command {
        Commands::GetPart(options) => get_part_handler(options, global).await,
        Commands::Search(options) => search_handler(options, global).await,
        Commands::PartColors(options) => part_colors_handler(options, global).await,
        Commands::Colors(options) => colors::handler(options, global).await,
    }
}

/// Options for fetching a single part
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct GetPartOptions {
    /// Part number (e.g., "3020")
    pub part_num: String,
}

/// Options for searching parts
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct SearchOptions {
    /// Search term (name or part number)
    pub search: String,

    /// Restrict to a part category id
    #[arg(long)]
    pub part_cat_id: Option<u32>,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Options for listing a part's colors
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct PartColorsOptions {
    /// Part number (e.g., "3020")
    pub part_num: String,
}

/// Fetch part details from the catalog.
pub async fn get_part_data(part_num: String) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;
    api.get_value(&f!("/lego/parts/{}/", urlencoding::encode(&part_num)), &[])
        .await
        .map_err(|e| eyre!("Failed to fetch part: {e}"))
}

/// Search the catalog for parts by name or number.
pub async fn search_parts_data(
    search: String,
    part_cat_id: Option<u32>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;

    let mut query = vec![("search", search)];
    if let Some(part_cat_id) = part_cat_id {
        query.push(("part_cat_id", part_cat_id.to_string()));
    }
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }
    if let Some(page_size) = page_size {
        query.push(("page_size", page_size.to_string()));
    }

    api.get_value("/lego/parts/", &query)
        .await
        .map_err(|e| eyre!("Failed to search parts: {e}"))
}

/// List every color a part has appeared in.
pub async fn get_part_colors_data(part_num: String) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;
    api.get_value(
        &f!("/lego/parts/{}/colors/", urlencoding::encode(&part_num)),
        &[],
    )
    .await
    .map_err(|e| eyre!("Failed to fetch part colors: {e}"))
}

async fn get_part_handler(options: GetPartOptions, _global: crate::Global) -> Result<()> {
    let value = get_part_data(options.part_num).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn search_handler(options: SearchOptions, _global: crate::Global) -> Result<()> {
    let value = search_parts_data(
        options.search,
        options.part_cat_id,
        options.page,
        options.page_size,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

async fn part_colors_handler(options: PartColorsOptions, _global: crate::Global) -> Result<()> {
    let value = get_part_colors_data(options.part_num).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
