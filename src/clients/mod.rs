//! HTTP clients for the external services
//!
//! This module provides:
//! - Wire types for MediaWiki, DBpedia Lookup and SPARQL JSON results
//! - The service traits consumed by the linker and validator
//! - reqwest-backed implementations of those traits
//!
//! Every request carries the configured timeout and is never retried.

pub mod lookup;
pub mod sparql;
pub mod traits;
pub mod types;
pub mod wikipedia;

pub use lookup::DbpediaLookupClient;
pub use sparql::SparqlClient;
pub use traits::*;
pub use wikipedia::WikipediaClient;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ClientError;

/// Build the shared reqwest client for one service
pub(crate) fn build_http_client(user_agent: &str, timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

/// Send a request and decode the JSON body.
///
/// Non-success statuses and undecodable bodies are reported separately from
/// transport failures so callers can tell them apart in logs.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    endpoint: &str,
    request: RequestBuilder,
) -> Result<T, ClientError> {
    let response = request.send().await.map_err(|source| ClientError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        });
    }

    let text = response.text().await.map_err(|source| ClientError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|e| ClientError::malformed(endpoint, e.to_string()))
}
