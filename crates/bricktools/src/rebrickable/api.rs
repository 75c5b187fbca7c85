//! Remote inventory client
//!
//! [`InventoryApi`] is the seam between the reconciliation logic and the
//! Rebrickable part-list endpoints. The HTTP implementation is a thin
//! passthrough: one request per call, no retries. A 404 on a line fetch is
//! not an error but the "line absent" branch condition, so `fetch_part`
//! returns `Option<PartLine>` and keeps the branch a pattern match.

use bricktools_core::partlist::{ListInfo, PartLine, PartListEntry};
use serde::Deserialize;

use super::{create_authenticated_client, RebrickableConfig};
use crate::prelude::*;

/// Failure taxonomy for remote inventory calls.
///
/// `NotFound` drives branch logic where an endpoint's 404 means
/// nonexistence; everything else is fatal for the single call it occurs in.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,

    #[error("remote API failure [{status}]: {body}")]
    Remote { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Operations the reconciler needs from the remote part-list store.
///
/// GETs are assumed idempotent; `quantity` and `num_parts` fields are
/// authoritative. Implemented by [`Rebrickable`] over HTTP and by an
/// in-memory store in the reconciler tests.
pub trait InventoryApi {
    /// Fetch one line by key. `Ok(None)` when the remote reports 404.
    async fn fetch_part(
        &self,
        list_id: &str,
        part_num: &str,
        color_id: i64,
    ) -> Result<Option<PartLine>, ApiError>;

    /// Create one or more lines in a single POST.
    async fn create_parts(&self, list_id: &str, items: &[PartLine]) -> Result<(), ApiError>;

    /// Replace a line's quantity.
    async fn update_part(
        &self,
        list_id: &str,
        part_num: &str,
        color_id: i64,
        quantity: u32,
    ) -> Result<(), ApiError>;

    /// Remove a line entirely.
    async fn delete_part(
        &self,
        list_id: &str,
        part_num: &str,
        color_id: i64,
    ) -> Result<(), ApiError>;

    /// Fetch list metadata (`id`, `name`, `num_parts`).
    async fn fetch_list(&self, list_id: &str) -> Result<ListInfo, ApiError>;

    /// Fetch the list's lines in one large page.
    async fn fetch_list_lines(
        &self,
        list_id: &str,
        page_size: u32,
    ) -> Result<Vec<PartLine>, ApiError>;

    /// Delete an entire list.
    async fn delete_list(&self, list_id: &str) -> Result<(), ApiError>;

    /// Create a new, empty list.
    async fn create_list(&self, name: &str) -> Result<ListInfo, ApiError>;
}

/// HTTP client for the Rebrickable API, constructed once and passed by
/// reference; holds the authenticated `reqwest` client, base URL, and the
/// user token bound into every `/users/` path.
#[derive(Debug, Clone)]
pub struct Rebrickable {
    client: reqwest::Client,
    base_url: String,
    user_token: String,
}

#[derive(Debug, Deserialize)]
struct PartListPage {
    results: Vec<PartListEntry>,
}

impl Rebrickable {
    pub fn new(config: &RebrickableConfig) -> Result<Self> {
        Ok(Self {
            client: create_authenticated_client(config)?,
            base_url: config.base_url.clone(),
            user_token: config.user_token.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&RebrickableConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        f!("{}{path}", self.base_url)
    }

    fn line_url(&self, list_id: &str, part_num: &str, color_id: i64) -> String {
        self.url(&f!(
            "/users/{}/partlists/{}/parts/{}/{color_id}/",
            self.user_token,
            urlencoding::encode(list_id),
            urlencoding::encode(part_num)
        ))
    }

    fn list_url(&self, list_id: &str) -> String {
        self.url(&f!(
            "/users/{}/partlists/{}/",
            self.user_token,
            urlencoding::encode(list_id)
        ))
    }

    fn lists_url(&self) -> String {
        self.url(&f!("/users/{}/partlists/", self.user_token))
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Remote { status, body });
        }
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Raw GET returning the remote JSON as-is. The passthrough read tools
    /// are one-line mappings over this.
    pub async fn get_value(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(Self::check(response).await?).await
    }

    /// Raw POST with a JSON body, returning the remote JSON.
    pub async fn post_value(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(Self::check(response).await?).await
    }

    /// Raw PUT with a JSON body, returning the remote JSON.
    pub async fn put_value(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(Self::check(response).await?).await
    }

    /// Raw DELETE. The API answers 204 with an empty body, so success is
    /// reported as a synthetic status object.
    pub async fn delete_value(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check(response).await?;
        Ok(serde_json::json!({"status": "success"}))
    }

    pub fn user_path(&self, suffix: &str) -> String {
        f!("/users/{}/{suffix}", self.user_token)
    }
}

impl InventoryApi for Rebrickable {
    async fn fetch_part(
        &self,
        list_id: &str,
        part_num: &str,
        color_id: i64,
    ) -> Result<Option<PartLine>, ApiError> {
        let response = self
            .client
            .get(self.line_url(list_id, part_num, color_id))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match Self::check(response).await {
            Ok(response) => {
                let entry: PartListEntry = Self::decode(response).await?;
                Ok(Some(entry.into()))
            }
            Err(ApiError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create_parts(&self, list_id: &str, items: &[PartLine]) -> Result<(), ApiError> {
        let url = self.url(&f!(
            "/users/{}/partlists/{}/parts/",
            self.user_token,
            urlencoding::encode(list_id)
        ));
        let response = self
            .client
            .post(url)
            .json(items)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_part(
        &self,
        list_id: &str,
        part_num: &str,
        color_id: i64,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.line_url(list_id, part_num, color_id))
            .json(&serde_json::json!({"quantity": quantity}))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete_part(
        &self,
        list_id: &str,
        part_num: &str,
        color_id: i64,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.line_url(list_id, part_num, color_id))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_list(&self, list_id: &str) -> Result<ListInfo, ApiError> {
        let response = self
            .client
            .get(self.list_url(list_id))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(Self::check(response).await?).await
    }

    async fn fetch_list_lines(
        &self,
        list_id: &str,
        page_size: u32,
    ) -> Result<Vec<PartLine>, ApiError> {
        let url = self.url(&f!(
            "/users/{}/partlists/{}/parts/",
            self.user_token,
            urlencoding::encode(list_id)
        ));
        let response = self
            .client
            .get(url)
            .query(&[("page_size", page_size)])
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let page: PartListPage = Self::decode(Self::check(response).await?).await?;
        Ok(page.results.into_iter().map(PartLine::from).collect())
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.list_url(list_id))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_list(&self, name: &str) -> Result<ListInfo, ApiError> {
        let response = self
            .client
            .post(self.lists_url())
            .json(&serde_json::json!({"name": name}))
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(Self::check(response).await?).await
    }
}
