//! kg-linker - Entity Linking and Fact Validation
//!
//! Links informal entity mentions ("Barca", "CR7") to canonical
//! knowledge-graph resources and checks subject-predicate-object assertions
//! against a SPARQL endpoint.
//!
//! ## Pipeline
//!
//! ```text
//! mention -> AliasResolver -> CandidateSource -> ScoringEngine -> EntityLinker
//!                                                                    │
//!                     (subject, predicate, object) ◄─────────────────┘
//!                                │
//!                                ▼
//!                          FactValidator -> Verdict
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kg_linker::config::LinkerConfig;
//! use kg_linker::entity_linking::EntityLinker;
//! use kg_linker::knowledge_graph::FactValidator;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = LinkerConfig::from_env()?;
//! let linker = EntityLinker::from_config(&config)?;
//! let validator = FactValidator::from_config(&config)?;
//!
//! let subject = linker.disambiguate("CR7", None).await;
//! let object = linker.disambiguate("Real Madrid", Some("Ronaldo joined Real Madrid in 2009")).await;
//! let verdict = validator.validate(subject.label(), "dbo:team", object.label()).await;
//! println!("{verdict}");
//! # Ok(())
//! # }
//! ```

// Typed errors for service seams and configuration
pub mod error;

// YAML configuration with environment overrides
pub mod config;

// HTTP clients for MediaWiki, DBpedia Lookup and SPARQL
pub mod clients;

// Key-value candidate/redirect store
pub mod store;

// Mention -> canonical entity
pub mod entity_linking;

// Validation, path search and graph metadata
pub mod knowledge_graph;

pub use config::LinkerConfig;
pub use entity_linking::{EntityLinker, Mention, Resolution, ResolvedEntity};
pub use error::{ClientError, ConfigError};
pub use knowledge_graph::{FactValidator, GraphInspector, PathHop, PathReasoner, Verdict};
