//! Tiered fact validation
//!
//! ```text
//! sanitize ──► Tier 1 strict ASK ──true──► StrictMatch
//!                   │ false
//!                   ▼
//!              Tier 2 relaxed ASK ──true──► GraphProximityMatch
//!                   │ false
//!                   ▼
//!              Rejected
//!
//! any transport / status / parse failure ──► QueryError
//! ```
//!
//! Tier 2 accepts any predicate in either direction plus the generic
//! cross-reference link. In `ValidationMode::Strong` the weak predicates
//! are excluded, so only a meaningful relation counts as proximity.

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use super::resource::{predicate_iri, resource_iri, weak_predicate_filter, WIKI_LINK};
use crate::clients::{SparqlClient, SparqlEndpoint};
use crate::config::{LinkerConfig, NamespaceConfig, ValidationMode};
use crate::entity_linking::Resolution;
use crate::error::ClientError;

/// A subject-predicate-object assertion to check. Subject and object are
/// entity names or resource IRIs; the predicate is `prefix:local`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Build from `(mention, resolution)` pairs. Each side takes the
    /// canonical label, or the raw mention text when lookup found nothing.
    pub fn from_resolutions(
        subject: (&str, &Resolution),
        predicate: &str,
        object: (&str, &Resolution),
    ) -> Self {
        Self::new(
            subject.1.entity_name(subject.0),
            predicate,
            object.1.entity_name(object.0),
        )
    }
}

/// Terminal outcome of a validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The exact triple exists
    StrictMatch,
    /// Subject and object are connected by some other link
    GraphProximityMatch,
    /// Neither tier matched
    Rejected,
    /// The endpoint could not answer; says nothing about the fact
    QueryError { reason: String },
}

impl Verdict {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::StrictMatch | Self::GraphProximityMatch)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrictMatch => write!(f, "STRICT_MATCH"),
            Self::GraphProximityMatch => write!(f, "GRAPH_PROXIMITY_MATCH"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::QueryError { reason } => write!(f, "QUERY_ERROR ({reason})"),
        }
    }
}

pub struct FactValidator {
    endpoint: Arc<dyn SparqlEndpoint>,
    namespaces: NamespaceConfig,
    mode: ValidationMode,
}

impl FactValidator {
    pub fn new(endpoint: Arc<dyn SparqlEndpoint>, config: &LinkerConfig) -> Self {
        Self {
            endpoint,
            namespaces: config.namespaces.clone(),
            mode: config.validation.mode,
        }
    }

    /// Validator against the configured SPARQL endpoint
    pub fn from_config(config: &LinkerConfig) -> Result<Self> {
        let client = SparqlClient::new(config)?;
        info!(endpoint = %client.endpoint(), mode = ?config.validation.mode, "Fact validator ready");
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Classify `(subject, predicate, object)` against the knowledge graph
    #[tracing::instrument(skip(self))]
    pub async fn validate(&self, subject: &str, predicate: &str, object: &str) -> Verdict {
        let Some((s, o)) = self.entity_iris(subject, object) else {
            return Verdict::Rejected;
        };
        let p = predicate_iri(&self.namespaces, predicate);

        let verdict = match self.run_tiers(&s, &p, &o).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(error = %e, "Validation query failed");
                Verdict::QueryError {
                    reason: e.to_string(),
                }
            }
        };

        info!(subject = %s, predicate = %p, object = %o, %verdict, "Fact validated");
        verdict
    }

    pub async fn validate_triple(&self, triple: &Triple) -> Verdict {
        self.validate(&triple.subject, &triple.predicate, &triple.object)
            .await
    }

    async fn run_tiers(&self, s: &str, p: &str, o: &str) -> Result<Verdict, ClientError> {
        if self.endpoint.ask(&strict_query(s, p, o)).await? {
            return Ok(Verdict::StrictMatch);
        }

        let relaxed = match self.mode {
            ValidationMode::Relaxed => self.relaxed_query(s, o),
            ValidationMode::Strong => strong_query(s, o),
        };
        if self.endpoint.ask(&relaxed).await? {
            return Ok(Verdict::GraphProximityMatch);
        }

        Ok(Verdict::Rejected)
    }

    /// True when subject and object share a predicate outside the weak set,
    /// in either direction
    pub async fn has_strong_relation(&self, subject: &str, object: &str) -> Result<bool, ClientError> {
        let Some((s, o)) = self.entity_iris(subject, object) else {
            return Ok(false);
        };
        self.endpoint.ask(&strong_query(&s, &o)).await
    }

    /// Resource IRIs for both entities, or `None` when sanitizing leaves
    /// nothing of one of the names
    fn entity_iris(&self, subject: &str, object: &str) -> Option<(String, String)> {
        let s = resource_iri(&self.namespaces, subject);
        let o = resource_iri(&self.namespaces, object);
        if s == self.namespaces.resource || o == self.namespaces.resource {
            warn!(subject, object, "Nothing left of the identifier after sanitizing");
            return None;
        }
        Some((s, o))
    }

    fn relaxed_query(&self, s: &str, o: &str) -> String {
        let link = format!("{}{}", self.namespaces.ontology, WIKI_LINK);
        format!(
            "ASK {{ {{ <{s}> ?p <{o}> }} UNION {{ <{o}> ?p <{s}> }} UNION {{ <{s}> <{link}> <{o}> }} }}"
        )
    }
}

fn strict_query(s: &str, p: &str, o: &str) -> String {
    format!("ASK {{ <{s}> <{p}> <{o}> }}")
}

fn strong_query(s: &str, o: &str) -> String {
    let filter = weak_predicate_filter("p");
    format!("ASK {{ {{ <{s}> ?p <{o}> {filter} }} UNION {{ <{o}> ?p <{s}> {filter} }} }}")
}
