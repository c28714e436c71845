//! Disambiguation
//!
//! Runs the full resolution pipeline for one mention:
//!
//! ```text
//! mention ──► year literal? ──yes──► (term, ["literal-year"])
//!    │
//!    ▼
//! AliasResolver ──► query variants ──► CandidateSource (pooled)
//!    │
//!    ├─ remote lookup:  admit (threshold + coverage) ──► score ──► max
//!    │                  nothing admitted ──► Unknown
//!    │
//!    └─ curated anchors: rank by character similarity ──► max
//!                       no entry at all ──► Unresolved(term)
//! ```
//!
//! Ties keep the first-seen candidate, so the outcome is deterministic for a
//! fixed variant order.

use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::alias::AliasResolver;
use super::candidates::{CandidateSource, CuratedAnchorSource, RemoteLookupSource, SourceStrategy};
use super::normalize::is_literal_year;
use super::scoring::ScoringEngine;
use super::similarity::character_similarity;
use super::types::{CandidateRecord, Mention, Resolution, ResolvedEntity};
use crate::clients::{DbpediaLookupClient, WikipediaClient};
use crate::config::LinkerConfig;
use crate::store::{InMemoryStore, KeyValueStore, StoreTitleIndex};

const DEFAULT_BATCH_CONCURRENCY: usize = 4;

pub struct EntityLinker {
    aliases: AliasResolver,
    source: Arc<dyn CandidateSource>,
    scoring: ScoringEngine,
    batch_concurrency: usize,
}

impl EntityLinker {
    pub fn new(
        aliases: AliasResolver,
        source: Arc<dyn CandidateSource>,
        scoring: ScoringEngine,
    ) -> Self {
        Self {
            aliases,
            source,
            scoring,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Build from configuration. A configured store seed selects the curated
    /// anchor strategy; otherwise the remote services are used.
    pub fn from_config(config: &LinkerConfig) -> Result<Self> {
        config.validate()?;

        match &config.store.seed_path {
            Some(path) => {
                let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::from_file(path)?);
                Ok(Self::with_store(store, config))
            }
            None => {
                let titles = Arc::new(WikipediaClient::new(config)?);
                let lookup = Arc::new(DbpediaLookupClient::new(config)?);
                info!(
                    wikipedia = %config.endpoints.wikipedia_api,
                    lookup = %config.endpoints.lookup_api,
                    "Entity linker using remote lookup"
                );

                Ok(Self::new(
                    AliasResolver::from_config(titles, &config.linking),
                    Arc::new(RemoteLookupSource::new(lookup, &config.linking)),
                    ScoringEngine::new(&config.linking),
                )
                .with_batch_concurrency(config.linking.batch_concurrency))
            }
        }
    }

    /// Resolve against a key-value store: store redirects for aliases,
    /// curated anchors for candidates
    pub fn with_store(store: Arc<dyn KeyValueStore>, config: &LinkerConfig) -> Self {
        Self::new(
            AliasResolver::from_config(
                Arc::new(StoreTitleIndex::new(store.clone())),
                &config.linking,
            ),
            Arc::new(CuratedAnchorSource::new(store)),
            ScoringEngine::new(&config.linking),
        )
        .with_batch_concurrency(config.linking.batch_concurrency)
    }

    pub fn with_batch_concurrency(mut self, concurrency: usize) -> Self {
        self.batch_concurrency = concurrency.max(1);
        self
    }

    pub fn strategy(&self) -> SourceStrategy {
        self.source.strategy()
    }

    /// Resolve one surface form, optionally using its sentence as context.
    /// Always returns a usable value.
    #[tracing::instrument(skip(self, context))]
    pub async fn disambiguate(&self, term: &str, context: Option<&str>) -> Resolution {
        let term = term.trim();

        if is_literal_year(term) {
            return Resolution::literal_year(term);
        }

        let resolved = self.aliases.resolve(term).await;
        let pool = self.pool_candidates(term, &resolved).await;

        let resolution = match self.source.strategy() {
            SourceStrategy::RemoteLookup => self.select_scored(&resolved, pool, context),
            SourceStrategy::CuratedAnchors => select_by_similarity(&resolved, pool),
        };

        info!(
            term,
            resolved = %resolved,
            label = resolution.label(),
            "Mention resolved"
        );
        resolution
    }

    pub async fn resolve(&self, mention: &Mention) -> Resolution {
        self.disambiguate(&mention.text, mention.context.as_deref())
            .await
    }

    /// Resolve independent mentions concurrently; output order matches input.
    pub async fn resolve_many(&self, mentions: &[Mention]) -> Vec<Resolution> {
        stream::iter(mentions)
            .map(|mention| self.resolve(mention))
            .buffered(self.batch_concurrency)
            .collect()
            .await
    }

    /// Candidates from every query variant, in variant order. A failed
    /// variant contributes nothing.
    async fn pool_candidates(&self, original: &str, resolved: &str) -> Vec<CandidateRecord> {
        let mut pool = Vec::new();

        for variant in self.source.query_variants(original, resolved) {
            match self.source.lookup(&variant).await {
                Ok(records) => {
                    debug!(variant = %variant, count = records.len(), "Candidates fetched");
                    pool.extend(records);
                }
                Err(e) => warn!(
                    variant = %variant,
                    timeout = e.is_timeout(),
                    error = %e,
                    "Candidate lookup failed"
                ),
            }
        }

        pool
    }

    fn select_scored(
        &self,
        query: &str,
        pool: Vec<CandidateRecord>,
        context: Option<&str>,
    ) -> Resolution {
        let mut best: Option<(f64, ResolvedEntity)> = None;

        for record in pool {
            let Some(candidate) = self.scoring.admit(query, record) else {
                continue;
            };

            let score = self.scoring.score(query, &candidate, context);
            debug!(label = %candidate.label, score, "Scored candidate");

            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((
                    score,
                    ResolvedEntity {
                        canonical_label: candidate.label,
                        type_tags: candidate.type_tags,
                        confidence: candidate.lexical_score,
                    },
                ));
            }
        }

        match best {
            Some((_, entity)) => Resolution::Resolved(entity),
            None => Resolution::Unknown,
        }
    }
}

/// Rank a curated list by character similarity to the query
fn select_by_similarity(query: &str, pool: Vec<CandidateRecord>) -> Resolution {
    let mut best: Option<(f64, CandidateRecord)> = None;

    for record in pool {
        let similarity = character_similarity(query, &record.label);
        if best.as_ref().map_or(true, |(top, _)| similarity > *top) {
            best = Some((similarity, record));
        }
    }

    match best {
        Some((similarity, record)) => Resolution::Resolved(ResolvedEntity {
            canonical_label: record.label,
            type_tags: record.type_tags,
            confidence: similarity,
        }),
        None => Resolution::Unresolved {
            term: query.to_string(),
        },
    }
}
