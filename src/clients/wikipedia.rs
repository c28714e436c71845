//! Wikipedia (MediaWiki API) client
//!
//! Redirect resolution with disambiguation detection, opensearch title
//! suggestions and full-text search.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::traits::{PageInfo, TitleIndex, TitleSuggestion};
use super::types::{parse_opensearch, FullTextSearchResponse, PageQueryResponse};
use super::{build_http_client, fetch_json};
use crate::config::LinkerConfig;
use crate::error::ClientError;

pub struct WikipediaClient {
    client: Client,
    api_url: String,
}

impl WikipediaClient {
    pub fn new(config: &LinkerConfig) -> Result<Self> {
        let client = build_http_client(&config.endpoints.user_agent, config.timeouts.alias())
            .context("Failed to create Wikipedia HTTP client")?;

        Ok(Self {
            client,
            api_url: config.endpoints.wikipedia_api.clone(),
        })
    }
}

/// Pick the page a title query landed on. Existing non-disambiguation pages
/// win over disambiguation pages; missing pages are ignored.
fn landed_page(response: PageQueryResponse) -> Option<PageInfo> {
    let query = response.query?;
    let mut fallback = None;

    for page in query.pages.into_values().filter(|p| p.exists()) {
        let info = PageInfo {
            is_disambiguation: page.is_disambiguation(),
            title: page.title,
        };
        if !info.is_disambiguation {
            return Some(info);
        }
        fallback.get_or_insert(info);
    }

    fallback
}

#[async_trait]
impl TitleIndex for WikipediaClient {
    async fn resolve_page(&self, term: &str) -> Result<Option<PageInfo>, ClientError> {
        let request = self.client.get(&self.api_url).query(&[
            ("action", "query"),
            ("titles", term),
            ("redirects", "1"),
            ("prop", "pageprops"),
            ("format", "json"),
        ]);

        let response: PageQueryResponse = fetch_json(&self.api_url, request).await?;
        Ok(landed_page(response))
    }

    async fn suggest_titles(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<TitleSuggestion>, ClientError> {
        let limit = limit.to_string();
        let request = self.client.get(&self.api_url).query(&[
            ("action", "opensearch"),
            ("search", term),
            ("limit", limit.as_str()),
            ("namespace", "0"),
            ("format", "json"),
        ]);

        let body: Value = fetch_json(&self.api_url, request).await?;
        let hits = parse_opensearch(&body).map_err(|m| ClientError::malformed(&self.api_url, m))?;

        Ok(hits
            .into_iter()
            .map(|(title, description)| TitleSuggestion { title, description })
            .collect())
    }

    async fn top_search_title(&self, term: &str) -> Result<Option<String>, ClientError> {
        let request = self.client.get(&self.api_url).query(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", term),
            ("srlimit", "1"),
            ("format", "json"),
        ]);

        let response: FullTextSearchResponse = fetch_json(&self.api_url, request).await?;
        Ok(response
            .query
            .and_then(|q| q.search.into_iter().next())
            .map(|hit| hit.title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> PageQueryResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_landed_page_prefers_real_page() {
        let response = parse(json!({
            "query": {"pages": {
                "10": {"title": "Mercury", "pageprops": {"disambiguation": ""}},
                "11": {"title": "Mercury (planet)"}
            }}
        }));
        let page = landed_page(response).unwrap();
        assert_eq!(page.title, "Mercury (planet)");
        assert!(!page.is_disambiguation);
    }

    #[test]
    fn test_landed_page_disambiguation_only() {
        let response = parse(json!({
            "query": {"pages": {"4451": {"title": "Barca", "pageprops": {"disambiguation": ""}}}}
        }));
        assert!(landed_page(response).unwrap().is_disambiguation);
    }

    #[test]
    fn test_landed_page_missing() {
        let response = parse(json!({
            "query": {"pages": {"-1": {"title": "Zzqx", "missing": ""}}}
        }));
        assert!(landed_page(response).is_none());
        assert!(landed_page(parse(json!({"batchcomplete": ""}))).is_none());
    }

    #[test]
    fn test_client_builds_from_defaults() {
        let client = WikipediaClient::new(&LinkerConfig::default()).unwrap();
        assert_eq!(client.api_url, "https://en.wikipedia.org/w/api.php");
    }
}
