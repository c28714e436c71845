//! Knowledge-graph metadata reads
//!
//! Small SELECT helpers used when building or debugging extraction data:
//! which predicates connect two resources, what an entity is typed as, its
//! English abstract, and its cross-reference links.
//!
//! Unlike validation, failures are returned to the caller.

use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use super::resource::{local_name, resource_iri, weak_predicate_filter, WIKI_LINK};
use crate::clients::{SolutionRow, SparqlClient, SparqlEndpoint};
use crate::config::{LinkerConfig, NamespaceConfig};
use crate::error::ClientError;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

pub struct GraphInspector {
    endpoint: Arc<dyn SparqlEndpoint>,
    namespaces: NamespaceConfig,
}

impl GraphInspector {
    pub fn new(endpoint: Arc<dyn SparqlEndpoint>, config: &LinkerConfig) -> Self {
        Self {
            endpoint,
            namespaces: config.namespaces.clone(),
        }
    }

    pub fn from_config(config: &LinkerConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(SparqlClient::new(config)?), config))
    }

    fn iri(&self, name: &str) -> String {
        resource_iri(&self.namespaces, name)
    }

    fn wiki_link(&self) -> String {
        format!("{}{}", self.namespaces.ontology, WIKI_LINK)
    }

    async fn column(&self, query: &str, var: &str) -> Result<Vec<String>, ClientError> {
        let rows = self.endpoint.select(query).await?;
        debug!(var, rows = rows.len(), "Inspection query answered");
        Ok(take_column(rows, var))
    }

    /// Predicate IRIs on edges `subject -> object`. The cross-reference link
    /// is always left out; `exclude_weak` drops the whole weak set.
    pub async fn predicates_between(
        &self,
        subject: &str,
        object: &str,
        exclude_weak: bool,
    ) -> Result<Vec<String>, ClientError> {
        let filter = if exclude_weak {
            weak_predicate_filter("predicate")
        } else {
            format!("FILTER(?predicate != <{}>)", self.wiki_link())
        };
        let query = format!(
            "SELECT DISTINCT ?predicate WHERE {{ <{}> ?predicate <{}> . {filter} }}",
            self.iri(subject),
            self.iri(object),
        );
        self.column(&query, "predicate").await
    }

    /// Ontology class local names of an entity, e.g. `SoccerClub`
    pub async fn entity_types(&self, entity: &str) -> Result<Vec<String>, ClientError> {
        let query = format!(
            "SELECT DISTINCT ?type WHERE {{ <{}> <{RDF_TYPE}> ?type . \
             FILTER(STRSTARTS(STR(?type), \"{}\")) }}",
            self.iri(entity),
            self.namespaces.ontology,
        );
        Ok(self
            .column(&query, "type")
            .await?
            .iter()
            .map(|iri| local_name(iri).to_string())
            .collect())
    }

    /// English abstract, if the entity has one
    pub async fn abstract_of(&self, entity: &str) -> Result<Option<String>, ClientError> {
        let query = format!(
            "SELECT ?abstract WHERE {{ <{}> <{}abstract> ?abstract . \
             FILTER(LANG(?abstract) = 'en') }} LIMIT 1",
            self.iri(entity),
            self.namespaces.ontology,
        );
        Ok(self.column(&query, "abstract").await?.into_iter().next())
    }

    /// Every resource the entity's page links to
    pub async fn wiki_links(&self, entity: &str) -> Result<Vec<String>, ClientError> {
        let query = format!(
            "SELECT ?linked WHERE {{ <{}> <{}> ?linked . }}",
            self.iri(entity),
            self.wiki_link(),
        );
        self.column(&query, "linked").await
    }

    /// Resources linked from the entity by the cross-reference link and by
    /// no other predicate
    pub async fn wiki_only_links(&self, entity: &str) -> Result<Vec<String>, ClientError> {
        let s = self.iri(entity);
        let link = self.wiki_link();
        let query = format!(
            "SELECT ?o WHERE {{ {{ SELECT ?o WHERE {{ <{s}> <{link}> ?o . }} }} \
             MINUS {{ <{s}> ?p ?o . FILTER(?p != <{link}>) }} }}"
        );
        self.column(&query, "o").await
    }
}

fn take_column(rows: Vec<SolutionRow>, var: &str) -> Vec<String> {
    rows.into_iter()
        .filter_map(|mut row| row.remove(var))
        .collect()
}
