//! Pass-through part-list endpoints
//!
//! One remote call each; the remote JSON is returned as-is.

use serde::{Deserialize, Serialize};

use crate::prelude::{println, *};
use crate::rebrickable::Rebrickable;

/// Options for listing the user's part lists
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct ListOptions {
    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Options for listing the parts in a list
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct PartsOptions {
    /// Part list id
    pub list_id: String,

    /// Page number
    #[arg(long)]
    pub page: Option<u32>,

    /// Results per page
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Sort field (prefix with - to reverse)
    #[arg(long)]
    pub ordering: Option<String>,
}

/// Options for creating a part list
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct CreateOptions {
    /// Name of the new list
    pub name: String,

    /// Initial number of parts
    #[arg(long)]
    pub num_parts: Option<u32>,

    /// Whether the list counts towards build calculations
    #[arg(long)]
    pub is_buildable: Option<bool>,
}

/// Options for replacing a part's quantity
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct UpdateOptions {
    /// Part list id
    pub list_id: String,

    /// Part number
    pub part_num: String,

    /// Rebrickable color id
    pub color_id: i64,

    /// Absolute quantity to store
    pub quantity: u32,
}

/// Options for removing a part from a list
#[derive(Debug, clap::Args, Serialize, Deserialize, Clone)]
pub struct RemoveOptions {
    /// Part list id
    pub list_id: String,

    /// Part number
    pub part_num: String,

    /// Rebrickable color id
    pub color_id: i64,
}

fn paging_query(page: Option<u32>, page_size: Option<u32>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }
    if let Some(page_size) = page_size {
        query.push(("page_size", page_size.to_string()));
    }
    query
}

/// Get all the user's part lists.
pub async fn get_part_lists_data(
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;
    let path = api.user_path("partlists/");
    api.get_value(&path, &paging_query(page, page_size))
        .await
        .map_err(|e| eyre!("Failed to fetch part lists: {e}"))
}

/// Get all the parts in one part list.
pub async fn get_parts_in_list_data(
    list_id: String,
    page: Option<u32>,
    page_size: Option<u32>,
    ordering: Option<String>,
) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;
    let path = api.user_path(&f!("partlists/{}/parts/", urlencoding::encode(&list_id)));
    let mut query = paging_query(page, page_size);
    if let Some(ordering) = ordering {
        query.push(("ordering", ordering));
    }
    api.get_value(&path, &query)
        .await
        .map_err(|e| eyre!("Failed to fetch parts in list: {e}"))
}

/// Create a new part list.
pub async fn create_part_list_data(
    name: String,
    num_parts: Option<u32>,
    is_buildable: Option<bool>,
) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;
    let path = api.user_path("partlists/");

    let mut body = serde_json::json!({"name": name});
    if let Some(num_parts) = num_parts {
        body["num_parts"] = num_parts.into();
    }
    if let Some(is_buildable) = is_buildable {
        body["is_buildable"] = is_buildable.into();
    }

    api.post_value(&path, &body)
        .await
        .map_err(|e| eyre!("Failed to create part list: {e}"))
}

/// Replace a part's quantity in a list with an absolute value.
pub async fn update_part_in_list_data(
    list_id: String,
    part_num: String,
    color_id: i64,
    quantity: u32,
) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;
    let path = api.user_path(&f!(
        "partlists/{}/parts/{}/{color_id}/",
        urlencoding::encode(&list_id),
        urlencoding::encode(&part_num)
    ));
    api.put_value(&path, &serde_json::json!({"quantity": quantity}))
        .await
        .map_err(|e| eyre!("Failed to update part in list: {e}"))
}

/// Remove a part entirely from a list.
pub async fn delete_part_from_list_data(
    list_id: String,
    part_num: String,
    color_id: i64,
) -> Result<serde_json::Value> {
    let api = Rebrickable::from_env()?;
    let path = api.user_path(&f!(
        "partlists/{}/parts/{}/{color_id}/",
        urlencoding::encode(&list_id),
        urlencoding::encode(&part_num)
    ));
    api.delete_value(&path)
        .await
        .map_err(|e| eyre!("Failed to delete part from list: {e}"))
}

pub async fn list_handler(options: ListOptions, _global: crate::Global) -> Result<()> {
    let value = get_part_lists_data(options.page, options.page_size).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn parts_handler(options: PartsOptions, _global: crate::Global) -> Result<()> {
    let value = get_parts_in_list_data(
        options.list_id,
        options.page,
        options.page_size,
        options.ordering,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn create_handler(options: CreateOptions, _global: crate::Global) -> Result<()> {
    let value = create_part_list_data(options.name, options.num_parts, options.is_buildable).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn update_handler(options: UpdateOptions, _global: crate::Global) -> Result<()> {
    let value = update_part_in_list_data(
        options.list_id,
        options.part_num,
        options.color_id,
        options.quantity,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn remove_handler(options: RemoveOptions, _global: crate::Global) -> Result<()> {
    let value =
        delete_part_from_list_data(options.list_id, options.part_num, options.color_id).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
