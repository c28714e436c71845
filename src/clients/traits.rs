//! Service seams for the external collaborators
//!
//! Each trait is the narrow read surface the core consumes. The HTTP
//! clients in this module implement them; tests substitute in-process fakes.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::ClientError;

/// A page as seen after redirect resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub title: String,
    pub is_disambiguation: bool,
}

/// One ranked title suggestion from a search index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSuggestion {
    pub title: String,
    pub description: String,
}

/// Redirect and title search index (Wikipedia, or the key-value store)
#[async_trait]
pub trait TitleIndex: Send + Sync {
    /// Follow redirects for `term`. `None` when no page exists.
    async fn resolve_page(&self, term: &str) -> Result<Option<PageInfo>, ClientError>;

    /// Ranked prefix search over titles
    async fn suggest_titles(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<TitleSuggestion>, ClientError>;

    /// Best full-text search match for `term`, if any
    async fn top_search_title(&self, _term: &str) -> Result<Option<String>, ClientError> {
        Ok(None)
    }
}

/// A validated document from the fuzzy lookup index
#[derive(Debug, Clone, PartialEq)]
pub struct LookupHit {
    /// Raw label, possibly carrying highlight markup
    pub label: String,
    pub type_names: Vec<String>,
    pub ref_count: u64,
}

/// Fuzzy entity search (DBpedia Lookup)
#[async_trait]
pub trait LookupIndex: Send + Sync {
    async fn search(&self, query: &str, max_hits: usize) -> Result<Vec<LookupHit>, ClientError>;
}

/// One SELECT solution: variable name -> bound value
pub type SolutionRow = HashMap<String, String>;

/// Knowledge-graph query endpoint
#[async_trait]
pub trait SparqlEndpoint: Send + Sync {
    /// Run an ASK query. A well-formed answer without a boolean counts as
    /// `false`.
    async fn ask(&self, query: &str) -> Result<bool, ClientError>;

    /// Run a SELECT query and return the bindings in endpoint order
    async fn select(&self, query: &str) -> Result<Vec<SolutionRow>, ClientError>;
}
