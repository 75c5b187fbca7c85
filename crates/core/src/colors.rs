//! Color reference data transformations
//!
//! Rebrickable color definitions are a small, slow-moving dataset the shell
//! caches on disk. This module holds the record type shared by the API
//! response, the cache file, and the listing transform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One Rebrickable color definition. Ids are stable and may be negative
/// (`-1` is the catalog's "[Unknown]" color).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Color {
    pub id: i64,
    pub name: String,
    pub rgb: String,
    pub is_trans: bool,
}

/// One page of `GET /lego/colors/`.
#[derive(Debug, Deserialize, Clone)]
pub struct ColorPage {
    #[serde(default)]
    pub next: Option<String>,
    pub results: Vec<Color>,
}

/// Compact id + name pair for quick reference output.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    pub id: i64,
    pub name: String,
}

/// Index colors by id.
pub fn index_colors(colors: Vec<Color>) -> BTreeMap<i64, Color> {
    colors.into_iter().map(|color| (color.id, color)).collect()
}

/// List all colors as id + name pairs, sorted by name.
pub fn list_by_name(colors: &BTreeMap<i64, Color>) -> Vec<ColorEntry> {
    let mut entries: Vec<ColorEntry> = colors
        .values()
        .map(|color| ColorEntry {
            id: color.id,
            name: color.name.clone(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(id: i64, name: &str) -> Color {
        Color {
            id,
            name: name.to_string(),
            rgb: "05131D".to_string(),
            is_trans: false,
        }
    }

    #[test]
    fn test_index_colors_keys_by_id() {
        let index = index_colors(vec![color(0, "Black"), color(-1, "[Unknown]")]);

        assert_eq!(index.len(), 2);
        assert_eq!(index[&0].name, "Black");
        assert_eq!(index[&-1].name, "[Unknown]");
    }

    #[test]
    fn test_list_by_name_sorts_alphabetically() {
        let index = index_colors(vec![
            color(15, "White"),
            color(0, "Black"),
            color(4, "Red"),
        ]);

        let entries = list_by_name(&index);

        let names: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["Black", "Red", "White"]);
        assert_eq!(entries[0].id, 0);
    }

    #[test]
    fn test_color_page_decodes_with_missing_next() {
        let page: ColorPage = serde_json::from_value(serde_json::json!({
            "results": [{"id": 0, "name": "Black", "rgb": "05131D", "is_trans": false}]
        }))
        .unwrap();

        assert!(page.next.is_none());
        assert_eq!(page.results.len(), 1);
    }
}
