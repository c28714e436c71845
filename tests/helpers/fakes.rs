//! In-process stand-ins for the external services
//!
//! Each fake implements one of the public service traits and records the
//! requests it receives, so tests can assert on query volume and shape.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use kg_linker::clients::{
    LookupHit, LookupIndex, PageInfo, SolutionRow, SparqlEndpoint, TitleIndex, TitleSuggestion,
};
use kg_linker::knowledge_graph::is_weak_predicate;
use kg_linker::ClientError;

pub const RESOURCE: &str = "http://dbpedia.org/resource/";
pub const ONTOLOGY: &str = "http://dbpedia.org/ontology/";

// ============================================================================
// Title index (MediaWiki)
// ============================================================================

#[derive(Default)]
pub struct FakeWikipedia {
    pages: HashMap<String, PageInfo>,
    suggestions: HashMap<String, Vec<TitleSuggestion>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeWikipedia {
    pub fn redirect(mut self, term: &str, title: &str) -> Self {
        self.pages.insert(
            term.to_string(),
            PageInfo {
                title: title.to_string(),
                is_disambiguation: false,
            },
        );
        self
    }

    pub fn disambiguation(mut self, term: &str) -> Self {
        self.pages.insert(
            term.to_string(),
            PageInfo {
                title: term.to_string(),
                is_disambiguation: true,
            },
        );
        self
    }

    pub fn suggest(mut self, term: &str, hits: &[(&str, &str)]) -> Self {
        self.suggestions.insert(
            term.to_string(),
            hits.iter()
                .map(|(title, description)| TitleSuggestion {
                    title: title.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TitleIndex for FakeWikipedia {
    async fn resolve_page(&self, term: &str) -> Result<Option<PageInfo>, ClientError> {
        self.requests.lock().unwrap().push(format!("page:{term}"));
        Ok(self.pages.get(term).cloned())
    }

    async fn suggest_titles(
        &self,
        term: &str,
        limit: usize,
    ) -> Result<Vec<TitleSuggestion>, ClientError> {
        self.requests.lock().unwrap().push(format!("suggest:{term}"));
        Ok(self
            .suggestions
            .get(term)
            .map(|s| s.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

// ============================================================================
// Fuzzy lookup index
// ============================================================================

#[derive(Default)]
pub struct FakeLookup {
    hits: HashMap<String, Vec<LookupHit>>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeLookup {
    pub fn hits(mut self, query: &str, docs: &[(&str, &[&str], u64)]) -> Self {
        self.hits.insert(
            query.to_string(),
            docs.iter()
                .map(|(label, types, refs)| LookupHit {
                    label: label.to_string(),
                    type_names: types.iter().map(|t| t.to_string()).collect(),
                    ref_count: *refs,
                })
                .collect(),
        );
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl LookupIndex for FakeLookup {
    async fn search(&self, query: &str, max_hits: usize) -> Result<Vec<LookupHit>, ClientError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .hits
            .get(query)
            .map(|h| h.iter().take(max_hits).cloned().collect())
            .unwrap_or_default())
    }
}

// ============================================================================
// Knowledge graph (SPARQL)
// ============================================================================

/// A small triple store answering the query shapes the crate issues by
/// matching on triple patterns in the query text
#[derive(Default)]
pub struct FakeKnowledgeGraph {
    edges: Vec<(String, String, String)>,
    fail_with: Option<u16>,
    pub queries: Mutex<Vec<String>>,
}

impl FakeKnowledgeGraph {
    /// Add `<resource/s> <ontology/p> <resource/o>`
    pub fn edge(mut self, s: &str, p: &str, o: &str) -> Self {
        self.edges.push((
            format!("{RESOURCE}{s}"),
            format!("{ONTOLOGY}{p}"),
            format!("{RESOURCE}{o}"),
        ));
        self
    }

    /// Every query answers with this HTTP status
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Default::default()
        }
    }

    pub fn recorded(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    fn record(&self, query: &str) -> Result<(), ClientError> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.fail_with {
            Some(status) => Err(ClientError::Status {
                endpoint: "fake-sparql".to_string(),
                status,
            }),
            None => Ok(()),
        }
    }

    /// Edges `s ?var o` visible to a query, honoring a weak-predicate filter
    fn connecting<'a>(
        &'a self,
        query: &'a str,
        var: &'a str,
    ) -> impl Iterator<Item = &'a (String, String, String)> + 'a {
        let strong = query.contains("NOT IN");
        self.edges.iter().filter(move |(s, p, o)| {
            query.contains(&format!("<{s}> ?{var} <{o}>")) && !(strong && is_weak_predicate(p))
        })
    }
}

fn row(pairs: &[(&str, &str)]) -> SolutionRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait]
impl SparqlEndpoint for FakeKnowledgeGraph {
    async fn ask(&self, query: &str) -> Result<bool, ClientError> {
        self.record(query)?;

        let exact = self
            .edges
            .iter()
            .any(|(s, p, o)| query.contains(&format!("<{s}> <{p}> <{o}>")));
        Ok(exact || self.connecting(query, "p").next().is_some())
    }

    async fn select(&self, query: &str) -> Result<Vec<SolutionRow>, ClientError> {
        self.record(query)?;

        if query.starts_with("SELECT ?p1 ?mid") {
            return Ok(self
                .edges
                .iter()
                .filter(|(s, p, _)| {
                    query.contains(&format!("<{s}> ?p1 ?mid"))
                        && p.starts_with(ONTOLOGY)
                        && !is_weak_predicate(p)
                })
                .map(|(_, p, o)| row(&[("p1", p.as_str()), ("mid", o.as_str())]))
                .collect());
        }

        if query.starts_with("SELECT ?p2 ") {
            return Ok(self
                .edges
                .iter()
                .filter(|(s, _, o)| query.contains(&format!("<{s}> ?p2 <{o}>")))
                .take(1)
                .map(|(_, p, _)| row(&[("p2", p.as_str())]))
                .collect());
        }

        if query.starts_with("SELECT ?p ") {
            return Ok(self
                .connecting(query, "p")
                .take(1)
                .map(|(_, p, _)| row(&[("p", p.as_str())]))
                .collect());
        }

        Ok(vec![])
    }
}
