use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::github::client::error_for_status;
use crate::github::rate_limiter::RateLimiter;

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
    ) -> Result<Vec<T>> {
        self.fetch_pages(base_url, per_page, None).await
    }

    pub async fn fetch_limited<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
        max_items: u32,
    ) -> Result<Vec<T>> {
        // Don't pull a full page when only a handful of items are wanted
        let per_page = per_page.min(max_items.max(1));
        self.fetch_pages(base_url, per_page, Some(max_items as usize))
            .await
    }

    async fn fetch_pages<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
        max_items: Option<usize>,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            self.rate_limiter.wait().await;

            let separator = if base_url.contains('?') { "&" } else { "?" };
            let url = format!("{}{}per_page={}&page={}", base_url, separator, per_page, page);

            tracing::debug!("Fetching: {}", url);
            let response = self.client.get(&url).send().await?;
            self.rate_limiter.update_from_headers(response.headers()).await;

            // Empty repositories answer 409 on the commits endpoint
            if response.status() == StatusCode::CONFLICT {
                tracing::debug!("Empty repository: {}", base_url);
                break;
            }
            let response = error_for_status(response, base_url).await?;

            let has_next = response
                .headers()
                .get("link")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("rel=\"next\""))
                .unwrap_or(false);

            let items: Vec<T> = response
                .json()
                .await
                .map_err(|e| Error::ParseError(format!("Failed to decode {}: {}", url, e)))?;
            let items_count = items.len();
            all_items.extend(items);

            let reached_limit = max_items.map(|m| all_items.len() >= m).unwrap_or(false);
            if reached_limit || !has_next || items_count < per_page as usize {
                break;
            }

            page += 1;
        }

        if let Some(max_items) = max_items {
            all_items.truncate(max_items);
        }
        Ok(all_items)
    }
}
