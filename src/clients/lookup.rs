//! DBpedia Lookup client
//!
//! Fuzzy entity search returning labels, ontology type names and a
//! reference-count popularity signal.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::{LookupHit, LookupIndex};
use super::types::{LookupDoc, LookupResponse};
use super::{build_http_client, fetch_json};
use crate::config::LinkerConfig;
use crate::error::ClientError;

pub struct DbpediaLookupClient {
    client: Client,
    api_url: String,
}

impl DbpediaLookupClient {
    pub fn new(config: &LinkerConfig) -> Result<Self> {
        let client = build_http_client(&config.endpoints.user_agent, config.timeouts.lookup())
            .context("Failed to create DBpedia Lookup HTTP client")?;

        Ok(Self {
            client,
            api_url: config.endpoints.lookup_api.clone(),
        })
    }
}

/// Validate one lookup document. Documents without a label, or with a
/// reference count that is not a number, are rejected.
pub(crate) fn hit_from_doc(doc: LookupDoc) -> Result<LookupHit, String> {
    let label = doc
        .label
        .into_iter()
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| "document has no label".to_string())?;

    let ref_count = match doc.ref_count.first() {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("refCount '{raw}' is not a count"))?,
        None => 0,
    };

    Ok(LookupHit {
        label,
        type_names: doc.type_name,
        ref_count,
    })
}

#[async_trait]
impl LookupIndex for DbpediaLookupClient {
    async fn search(&self, query: &str, max_hits: usize) -> Result<Vec<LookupHit>, ClientError> {
        let max_hits = max_hits.to_string();
        let request = self.client.get(&self.api_url).query(&[
            ("query", query),
            ("format", "json"),
            ("MaxHits", max_hits.as_str()),
        ]);

        let response: LookupResponse = fetch_json(&self.api_url, request).await?;

        Ok(response
            .docs
            .into_iter()
            .filter_map(|doc| match hit_from_doc(doc) {
                Ok(hit) => Some(hit),
                Err(reason) => {
                    debug!(query, %reason, "Skipping malformed lookup document");
                    None
                }
            })
            .collect())
    }
}
