//! Candidate generation
//!
//! Two interchangeable strategies sit behind `CandidateSource`:
//!
//! - `RemoteLookupSource`: fuzzy search index, capped result count, raw
//!   labels with types and a popularity signal. Scored in full.
//! - `CuratedAnchorSource`: precomputed anchor-text index in the key-value
//!   store. Returns a fixed, already-curated list without popularity.
//!
//! Both clean labels and drop list pages before anything is scored.

use async_trait::async_trait;
use std::sync::Arc;

use super::normalize::{clean_label, contains_token, is_list_page};
use super::types::CandidateRecord;
use crate::clients::LookupIndex;
use crate::config::LinkingConfig;
use crate::error::ClientError;
use crate::store::KeyValueStore;

/// How much scoring signal a source provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStrategy {
    /// Labels, types and popularity; subject to the coverage filter
    RemoteLookup,
    /// Fixed curated list; ranked by character similarity only
    CuratedAnchors,
}

#[async_trait]
pub trait CandidateSource: Send + Sync {
    fn strategy(&self) -> SourceStrategy;

    /// Queries to issue for one mention, in order. `original` is the raw
    /// mention, `resolved` its alias-resolved form.
    fn query_variants(&self, original: &str, resolved: &str) -> Vec<String>;

    /// Candidates for one query, labels cleaned, list pages removed
    async fn lookup(&self, term: &str) -> Result<Vec<CandidateRecord>, ClientError>;
}

/// Clean a raw label; `None` when nothing entity-like remains
fn cleaned(raw: &str) -> Option<String> {
    let label = clean_label(raw);
    if label.is_empty() || is_list_page(&label) {
        None
    } else {
        Some(label)
    }
}

// =============================================================================
// Remote lookup index
// =============================================================================

pub struct RemoteLookupSource {
    index: Arc<dyn LookupIndex>,
    max_hits: usize,
    augment_suffix: String,
}

impl RemoteLookupSource {
    pub fn new(index: Arc<dyn LookupIndex>, config: &LinkingConfig) -> Self {
        Self {
            index,
            max_hits: config.max_hits,
            augment_suffix: config.augment_suffix.clone(),
        }
    }
}

#[async_trait]
impl CandidateSource for RemoteLookupSource {
    fn strategy(&self) -> SourceStrategy {
        SourceStrategy::RemoteLookup
    }

    /// The resolved term, plus `term + suffix` unless the term already
    /// carries the suffix token
    fn query_variants(&self, _original: &str, resolved: &str) -> Vec<String> {
        let mut variants = vec![resolved.to_string()];
        let suffix = self.augment_suffix.trim();
        if !suffix.is_empty() && !contains_token(resolved, suffix) {
            variants.push(format!("{resolved} {suffix}"));
        }
        variants
    }

    async fn lookup(&self, term: &str) -> Result<Vec<CandidateRecord>, ClientError> {
        let hits = self.index.search(term, self.max_hits).await?;

        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                Some(CandidateRecord {
                    label: cleaned(&hit.label)?,
                    type_tags: hit.type_names,
                    popularity: hit.ref_count,
                })
            })
            .collect())
    }
}

// =============================================================================
// Curated anchor index (key-value store)
// =============================================================================

pub struct CuratedAnchorSource {
    store: Arc<dyn KeyValueStore>,
}

impl CuratedAnchorSource {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CandidateSource for CuratedAnchorSource {
    fn strategy(&self) -> SourceStrategy {
        SourceStrategy::CuratedAnchors
    }

    /// Anchors are exact keys, so the raw mention is tried too
    fn query_variants(&self, original: &str, resolved: &str) -> Vec<String> {
        let mut variants = vec![resolved.to_string()];
        if original != resolved {
            variants.push(original.to_string());
        }
        variants
    }

    async fn lookup(&self, term: &str) -> Result<Vec<CandidateRecord>, ClientError> {
        let entities = self.store.get_candidates(term).await?;

        let mut records = Vec::with_capacity(entities.len());
        for entity in entities {
            let Some(label) = cleaned(&entity) else {
                continue;
            };
            let type_tags = self.store.get_type(&entity).await?;
            records.push(CandidateRecord {
                label,
                type_tags,
                popularity: 0,
            });
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::LookupHit;
    use crate::store::{InMemoryStore, StoreSeed};

    struct FixedIndex(Vec<LookupHit>);

    #[async_trait]
    impl LookupIndex for FixedIndex {
        async fn search(&self, _query: &str, max_hits: usize) -> Result<Vec<LookupHit>, ClientError> {
            Ok(self.0.iter().take(max_hits).cloned().collect())
        }
    }

    fn hit(label: &str, types: &[&str], refs: u64) -> LookupHit {
        LookupHit {
            label: label.to_string(),
            type_names: types.iter().map(|t| t.to_string()).collect(),
            ref_count: refs,
        }
    }

    fn remote(hits: Vec<LookupHit>) -> RemoteLookupSource {
        RemoteLookupSource::new(Arc::new(FixedIndex(hits)), &LinkingConfig::default())
    }

    #[test]
    fn test_remote_query_variants() {
        let source = remote(vec![]);
        assert_eq!(
            source.query_variants("Barca", "Barcelona"),
            vec!["Barcelona", "Barcelona FC"]
        );
        assert_eq!(
            source.query_variants("Barca", "FC Barcelona"),
            vec!["FC Barcelona"]
        );
    }

    #[tokio::test]
    async fn test_remote_lookup_cleans_and_filters() {
        let source = remote(vec![
            hit("<B>Barcelona</B> (football club)", &["SoccerClub"], 7000),
            hit("List of <B>Barcelona</B> players", &[], 10),
            hit("(stub)", &[], 1),
            hit("Barcelona", &["City"], 5000),
        ]);

        let records = source.lookup("Barcelona").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "Barcelona");
        assert_eq!(records[0].type_tags, vec!["SoccerClub"]);
        assert_eq!(records[0].popularity, 7000);
        assert_eq!(source.strategy(), SourceStrategy::RemoteLookup);
    }

    #[tokio::test]
    async fn test_curated_lookup_attaches_types() {
        let seed = StoreSeed {
            anchors: [(
                "Al-Nassr".to_string(),
                vec!["Al-Nassr FC".to_string(), "Al-Nasr SC".to_string()],
            )]
            .into(),
            types: [("Al-Nassr FC".to_string(), vec!["SoccerClub".to_string()])].into(),
            ..Default::default()
        };
        let source = CuratedAnchorSource::new(Arc::new(InMemoryStore::from_seed(seed)));

        let records = source.lookup("Al-Nassr").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].type_tags, vec!["SoccerClub"]);
        assert_eq!(records[1].type_tags, vec!["Thing"]);
        assert!(records.iter().all(|r| r.popularity == 0));

        assert!(source.lookup("Nobody").await.unwrap().is_empty());
        assert_eq!(
            source.query_variants("Barca", "FC Barcelona"),
            vec!["FC Barcelona", "Barca"]
        );
        assert_eq!(source.query_variants("La Liga", "La Liga"), vec!["La Liga"]);
    }
}
