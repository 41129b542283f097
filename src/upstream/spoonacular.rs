//! Spoonacular API client
//!
//! Proxies the hosted Spoonacular recipe-data service. Responses are passed
//! through as raw JSON bodies; the server never reshapes what upstream
//! returns. The API credential is injected here, server-side only, after the
//! cache key has been computed, so it can never appear in a cache key or be
//! echoed to a client.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::cache::{response_cache_key, ResponseCache};

/// Base URL for the Spoonacular API
const SPOONACULAR_BASE_URL: &str = "https://api.spoonacular.com";

/// How long successful upstream responses stay cached
const RESPONSE_TTL: Duration = Duration::from_secs(60 * 60);

/// Errors that can occur when calling the upstream recipe API
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No API credential was configured; local routes keep working, the
    /// proxy cannot
    #[error("upstream API key is not configured (set SPOONACULAR_API_KEY)")]
    MissingApiKey,

    /// The outbound request failed at the transport level
    #[error("upstream request failed: {0}")]
    Request(reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned status {status}: {detail}")]
    Status { status: u16, detail: String },
}

/// Caller-supplied filters for recipe search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub cuisine: Option<String>,
    pub diet: Option<String>,
    pub intolerances: Option<String>,
}

impl SearchFilters {
    /// Returns the filters as query parameters, skipping unset ones
    fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(query) = self.query.as_deref() {
            params.push(("query", query));
        }
        if let Some(cuisine) = self.cuisine.as_deref() {
            params.push(("cuisine", cuisine));
        }
        if let Some(diet) = self.diet.as_deref() {
            params.push(("diet", diet));
        }
        if let Some(intolerances) = self.intolerances.as_deref() {
            params.push(("intolerances", intolerances));
        }
        params
    }
}

/// Client for the Spoonacular recipe API with a response cache in front
pub struct SpoonacularClient {
    http_client: Client,
    cache: ResponseCache,
    base_url: String,
    api_key: Option<String>,
}

impl SpoonacularClient {
    /// Creates a client; `api_key` of `None` degrades every call to
    /// `UpstreamError::MissingApiKey` instead of crashing the process
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http_client: Client::new(),
            cache: ResponseCache::new(),
            base_url: SPOONACULAR_BASE_URL.to_string(),
            api_key,
        }
    }

    /// Overrides the upstream base URL (for tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Access to the response cache, mainly for test isolation via `clear`
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Searches recipes by free-text query and optional filters
    pub async fn search_recipes(&self, filters: &SearchFilters) -> Result<String, UpstreamError> {
        self.fetch_cached("/recipes/complexSearch", &filters.params())
            .await
    }

    /// Fetches the full information payload for one upstream recipe
    pub async fn recipe_information(&self, id: u64) -> Result<String, UpstreamError> {
        self.fetch_cached(&format!("/recipes/{}/information", id), &[])
            .await
    }

    /// Fetches the nutrition widget payload for one upstream recipe
    pub async fn recipe_nutrition(&self, id: u64) -> Result<String, UpstreamError> {
        self.fetch_cached(&format!("/recipes/{}/nutritionWidget.json", id), &[])
            .await
    }

    /// Looks up substitutes for an ingredient by name
    pub async fn ingredient_substitutes(&self, name: &str) -> Result<String, UpstreamError> {
        self.fetch_cached("/food/ingredients/substitutes", &[("ingredientName", name)])
            .await
    }

    /// Cache-first fetch of one upstream endpoint
    ///
    /// On a hit the cached body is returned unchanged, byte-identical to what
    /// was stored, and the network is never touched; not even the credential
    /// check runs. On a miss the call goes out with the credential appended,
    /// non-success statuses become `UpstreamError::Status`, and only
    /// successful bodies are cached.
    async fn fetch_cached(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<String, UpstreamError> {
        let key = response_cache_key(path, params);
        if let Some(body) = self.cache.get(&key) {
            debug!(%path, "serving upstream response from cache");
            return Ok(body);
        }

        let api_key = self.api_key.as_deref().ok_or(UpstreamError::MissingApiKey)?;

        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("apiKey", api_key));

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            // Strip the URL so the credential never shows up in diagnostics
            .map_err(|err| UpstreamError::Request(err.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| UpstreamError::Request(err.without_url()))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                detail: body,
            });
        }

        debug!(%path, "caching upstream response");
        self.cache.put(&key, body.clone(), RESPONSE_TTL);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(query: &str) -> SearchFilters {
        SearchFilters {
            query: Some(query.to_string()),
            ..SearchFilters::default()
        }
    }

    #[test]
    fn test_search_params_skip_unset_filters() {
        let filters = SearchFilters {
            query: Some("pasta".to_string()),
            diet: Some("vegetarian".to_string()),
            ..SearchFilters::default()
        };

        assert_eq!(
            filters.params(),
            vec![("query", "pasta"), ("diet", "vegetarian")]
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        // Unroutable base URL: if the client tried the network this would
        // fail differently
        let client = SpoonacularClient::new(None).with_base_url("http://127.0.0.1:1");

        let result = client.search_recipes(&filters("pasta")).await;

        assert!(matches!(result, Err(UpstreamError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_cache_hit_bypasses_network_and_credential_check() {
        let client = SpoonacularClient::new(None).with_base_url("http://127.0.0.1:1");

        let key = response_cache_key("/recipes/complexSearch", &[("query", "pasta")]);
        client
            .cache()
            .put(&key, r#"{"results":[]}"#, Duration::from_secs(60));

        let body = client
            .search_recipes(&filters("pasta"))
            .await
            .expect("cached call should succeed even without an API key");

        assert_eq!(body, r#"{"results":[]}"#);
    }

    #[tokio::test]
    async fn test_transport_failure_is_an_upstream_error() {
        let client = SpoonacularClient::new(Some("test-key".to_string()))
            .with_base_url("http://127.0.0.1:1");

        let result = client.recipe_information(42).await;

        match result {
            Err(UpstreamError::Request(err)) => {
                // The credential travels in the query string; diagnostics
                // must not carry the URL
                assert!(!err.to_string().contains("test-key"));
            }
            other => panic!("expected transport error, got {:?}", other.map(|_| ())),
        }
    }
}
