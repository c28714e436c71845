//! Bounded path search between two entities
//!
//! 1. Direct edge `start -> end`, weak predicates excluded.
//! 2. Otherwise scan up to `neighbor_limit` ontology-namespace edges out of
//!    `start` and return the first intermediate resource with any edge to
//!    `end`, cross-reference links included.
//!
//! The first chain found wins. Nothing deeper than two hops is searched.

use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::resource::{display_name, local_name, resource_iri, weak_predicate_filter};
use crate::clients::{SolutionRow, SparqlClient, SparqlEndpoint};
use crate::config::{LinkerConfig, NamespaceConfig};

/// One edge of a path; `predicate` is the local name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathHop {
    pub from: String,
    pub predicate: String,
    pub to: String,
}

impl PathHop {
    fn new(from: &str, predicate_iri: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            predicate: local_name(predicate_iri).to_string(),
            to: to.to_string(),
        }
    }
}

pub struct PathReasoner {
    endpoint: Arc<dyn SparqlEndpoint>,
    namespaces: NamespaceConfig,
    neighbor_limit: usize,
}

impl PathReasoner {
    pub fn new(endpoint: Arc<dyn SparqlEndpoint>, config: &LinkerConfig) -> Self {
        Self {
            endpoint,
            namespaces: config.namespaces.clone(),
            neighbor_limit: config.reasoning.neighbor_limit,
        }
    }

    pub fn from_config(config: &LinkerConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(SparqlClient::new(config)?), config))
    }

    /// Path from `start` to `end` of at most two hops, or empty
    #[tracing::instrument(skip(self))]
    pub async fn find_path(&self, start: &str, end: &str) -> Vec<PathHop> {
        let start_iri = resource_iri(&self.namespaces, start);
        let end_iri = resource_iri(&self.namespaces, end);

        if let Some(predicate) = self.edge_between(&start_iri, &end_iri).await {
            info!(start, end, predicate = %local_name(&predicate), "Direct link found");
            return vec![PathHop::new(start, &predicate, end)];
        }

        for (p1, mid_iri) in self.neighbors(&start_iri).await {
            if mid_iri == end_iri {
                continue;
            }
            if let Some(p2) = self.any_edge(&mid_iri, &end_iri).await {
                let mid = display_name(&mid_iri);
                info!(start, mid = %mid, end, "Two-hop chain found");
                return vec![PathHop::new(start, &p1, &mid), PathHop::new(&mid, &p2, end)];
            }
        }

        info!(start, end, "No path within two hops");
        vec![]
    }

    /// First non-weak predicate linking `from` to `to`
    async fn edge_between(&self, from: &str, to: &str) -> Option<String> {
        let query = format!(
            "SELECT ?p WHERE {{ <{from}> ?p <{to}> . {} }} LIMIT 1",
            weak_predicate_filter("p")
        );
        self.select(&query).await.into_iter().find_map(|mut row| row.remove("p"))
    }

    /// First predicate of any kind linking `from` to `to`
    async fn any_edge(&self, from: &str, to: &str) -> Option<String> {
        let query = format!("SELECT ?p2 WHERE {{ <{from}> ?p2 <{to}> }} LIMIT 1");
        self.select(&query).await.into_iter().find_map(|mut row| row.remove("p2"))
    }

    /// `(predicate, resource)` edges out of `from` in the ontology namespace
    async fn neighbors(&self, from: &str) -> Vec<(String, String)> {
        let query = format!(
            "SELECT ?p1 ?mid WHERE {{ <{from}> ?p1 ?mid . \
             FILTER(STRSTARTS(STR(?p1), \"{}\")) {} }} LIMIT {}",
            self.namespaces.ontology,
            weak_predicate_filter("p1"),
            self.neighbor_limit
        );

        let neighbors: Vec<(String, String)> = self
            .select(&query)
            .await
            .into_iter()
            .filter_map(|mut row| Some((row.remove("p1")?, row.remove("mid")?)))
            .filter(|(_, mid)| mid.starts_with(&self.namespaces.resource))
            .map(|(p1, mid)| (p1, resource_iri(&self.namespaces, &mid)))
            .collect();

        debug!(from, count = neighbors.len(), "Neighbors scanned");
        neighbors
    }

    async fn select(&self, query: &str) -> Vec<SolutionRow> {
        match self.endpoint.select(query).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Path query failed");
                vec![]
            }
        }
    }
}
