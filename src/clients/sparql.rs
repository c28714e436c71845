//! SPARQL endpoint client
//!
//! ASK and SELECT over HTTP GET with JSON results.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;

use super::traits::{SolutionRow, SparqlEndpoint};
use super::types::{AskResponse, SelectResponse};
use super::{build_http_client, fetch_json};
use crate::config::LinkerConfig;
use crate::error::ClientError;

const RESULTS_JSON: &str = "application/sparql-results+json";

pub struct SparqlClient {
    client: Client,
    endpoint: String,
}

impl SparqlClient {
    pub fn new(config: &LinkerConfig) -> Result<Self> {
        let client = build_http_client(&config.endpoints.user_agent, config.timeouts.sparql())
            .context("Failed to create SPARQL HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoints.sparql.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, query: &str) -> reqwest::RequestBuilder {
        self.client
            .get(&self.endpoint)
            .header(ACCEPT, RESULTS_JSON)
            .query(&[("query", query), ("format", "json")])
    }
}

pub(crate) fn rows_from_select(response: SelectResponse) -> Vec<SolutionRow> {
    response
        .results
        .bindings
        .into_iter()
        .map(|binding| {
            binding
                .into_iter()
                .map(|(var, term)| (var, term.value))
                .collect()
        })
        .collect()
}

#[async_trait]
impl SparqlEndpoint for SparqlClient {
    async fn ask(&self, query: &str) -> Result<bool, ClientError> {
        let response: AskResponse = fetch_json(&self.endpoint, self.request(query)).await?;
        Ok(response.boolean.unwrap_or(false))
    }

    async fn select(&self, query: &str) -> Result<Vec<SolutionRow>, ClientError> {
        let response: SelectResponse = fetch_json(&self.endpoint, self.request(query)).await?;
        Ok(rows_from_select(response))
    }
}
