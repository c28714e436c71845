//! Key-value candidate and redirect store
//!
//! The store is consumed through three idempotent reads:
//!
//! ```text
//! r:<term>    -> canonical term        get_redirect
//! a:<anchor>  -> [entity, ...]         get_candidates
//! t:<entity>  -> [type, ...]           get_type   (default ["Thing"])
//! ```
//!
//! Its persistence is not owned by this crate. `InMemoryStore` is a
//! read-only implementation seeded from YAML.

pub mod memory;

pub use memory::{InMemoryStore, StoreSeed};

use async_trait::async_trait;
use std::sync::Arc;

use crate::clients::{PageInfo, TitleIndex, TitleSuggestion};
use crate::error::ClientError;

/// Type reported for entities the store has no type for
pub const DEFAULT_ENTITY_TYPE: &str = "Thing";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_redirect(&self, term: &str) -> Result<Option<String>, ClientError>;

    async fn get_candidates(&self, anchor: &str) -> Result<Vec<String>, ClientError>;

    /// Never empty: falls back to `["Thing"]`
    async fn get_type(&self, entity: &str) -> Result<Vec<String>, ClientError>;
}

/// Exposes the store's redirects as a title index, so alias resolution can
/// run against the store. A redirect target is always a real page; the
/// store offers no title search.
pub struct StoreTitleIndex {
    store: Arc<dyn KeyValueStore>,
}

impl StoreTitleIndex {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TitleIndex for StoreTitleIndex {
    async fn resolve_page(&self, term: &str) -> Result<Option<PageInfo>, ClientError> {
        Ok(self
            .store
            .get_redirect(term)
            .await?
            .map(|title| PageInfo {
                title,
                is_disambiguation: false,
            }))
    }

    async fn suggest_titles(
        &self,
        _term: &str,
        _limit: usize,
    ) -> Result<Vec<TitleSuggestion>, ClientError> {
        Ok(vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_title_index() {
        let store = InMemoryStore::from_seed(StoreSeed {
            redirects: [("CR7".to_string(), "Cristiano Ronaldo".to_string())].into(),
            ..Default::default()
        });
        let index = StoreTitleIndex::new(Arc::new(store));

        let page = index.resolve_page("CR7").await.unwrap().unwrap();
        assert_eq!(page.title, "Cristiano Ronaldo");
        assert!(!page.is_disambiguation);

        assert!(index.resolve_page("Physics").await.unwrap().is_none());
        assert!(index.suggest_titles("CR7", 5).await.unwrap().is_empty());
        assert!(index.top_search_title("CR7").await.unwrap().is_none());
    }
}
