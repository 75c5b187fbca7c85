//! Local cache of the Rebrickable color reference data
//!
//! Color definitions change rarely, so they are cached as a CSV file under
//! the user cache directory and served from there. A missing cache is
//! refreshed by paging through `GET /lego/colors/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bricktools_core::colors::{index_colors, list_by_name, Color, ColorEntry, ColorPage};
use serde::{Deserialize, Serialize};

use crate::prelude::{println, *};
use crate::rebrickable::Rebrickable;

const CACHE_FILE: &str = "colors.csv";
const COLORS_PAGE_SIZE: u32 = 1000;

/// Options for listing colors
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct ColorsOptions {
    /// Re-download the color data even if a cache exists
    #[arg(long)]
    pub refresh: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Directory holding the cached color data.
pub fn cache_dir() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("bricktools")
}

/// Write color definitions to the cache file in `dir`.
pub fn write_cache(dir: &Path, colors: &[Color]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::Cache(f!("failed to create {}: {e}", dir.display())))?;

    let path = dir.join(CACHE_FILE);
    let mut writer = csv::Writer::from_path(&path)
        .map_err(|e| Error::Cache(f!("failed to open {} for writing: {e}", path.display())))?;
    for color in colors {
        writer
            .serialize(color)
            .map_err(|e| Error::Cache(f!("failed to write color record: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| Error::Cache(f!("failed to flush color cache: {e}")))?;
    Ok(())
}

/// Read color definitions from the cache file in `dir`, keyed by id.
pub fn read_cache(dir: &Path) -> Result<BTreeMap<i64, Color>> {
    let path = dir.join(CACHE_FILE);
    let mut reader = csv::Reader::from_path(&path)
        .map_err(|e| Error::Cache(f!("failed to open {}: {e}", path.display())))?;

    let mut colors = Vec::new();
    for record in reader.deserialize() {
        let color: Color =
            record.map_err(|e| Error::Cache(f!("failed to parse color record: {e}")))?;
        colors.push(color);
    }
    Ok(index_colors(colors))
}

/// Download all color definitions from the API.
async fn fetch_colors(api: &Rebrickable) -> Result<Vec<Color>> {
    let mut colors = Vec::new();
    let mut page = 1u32;

    loop {
        let value = api
            .get_value(
                "/lego/colors/",
                &[
                    ("page", page.to_string()),
                    ("page_size", COLORS_PAGE_SIZE.to_string()),
                ],
            )
            .await
            .map_err(|e| eyre!("Failed to fetch colors: {e}"))?;

        let parsed: ColorPage = serde_json::from_value(value)
            .map_err(|e| eyre!("Failed to parse color page: {e}"))?;
        colors.extend(parsed.results);

        if parsed.next.is_none() {
            break;
        }
        page += 1;
    }

    Ok(colors)
}

/// Rewrite the cache from the API.
pub async fn refresh(dir: &Path) -> Result<usize> {
    let api = Rebrickable::from_env()?;
    let colors = fetch_colors(&api).await?;
    write_cache(dir, &colors)?;
    Ok(colors.len())
}

/// Load the cached colors, refreshing first when the cache is missing.
pub async fn load(dir: &Path) -> Result<BTreeMap<i64, Color>> {
    if !dir.join(CACHE_FILE).exists() {
        refresh(dir).await?;
    }
    read_cache(dir)
}

/// All color names and ids, sorted by name, for quick reference.
pub async fn list_colors_data() -> Result<Vec<ColorEntry>> {
    let colors = load(&cache_dir()).await?;
    Ok(list_by_name(&colors))
}

/// Handle the colors command
pub async fn handler(options: ColorsOptions, global: crate::Global) -> Result<()> {
    let dir = cache_dir();

    if options.refresh {
        let count = refresh(&dir).await?;
        if global.verbose {
            println!("Refreshed {count} colors into {}", dir.display());
        }
    }

    let colors = load(&dir).await?;
    let entries = list_by_name(&colors);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        let mut table = new_table();
        table.add_row(prettytable::row!["Id", "Name"]);
        for entry in &entries {
            table.add_row(prettytable::row![entry.id, entry.name]);
        }
        table.printstd();
    }

    Ok(())
}
