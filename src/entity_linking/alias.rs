//! Alias resolution
//!
//! Turns slang, abbreviations and redirects into a canonical title:
//!
//! ```text
//! "UK"      --redirect-->          "United Kingdom"
//! "Barca"   --disambiguation page--> title search --> "FC Barcelona"
//! "Physics" --already canonical-->  "Physics"
//! ```
//!
//! Resolution never fails: when nothing better is found the input comes
//! back unchanged.

use std::sync::Arc;
use tracing::{debug, warn};

use super::normalize::{is_numeric, token_count};
use crate::clients::{TitleIndex, TitleSuggestion};
use crate::config::LinkingConfig;

/// Number of title suggestions inspected in the search fallback
const SUGGESTION_LIMIT: usize = 5;

const DISAMBIGUATION_MARKER: &str = "disambiguation";

pub struct AliasResolver {
    index: Arc<dyn TitleIndex>,
    max_tokens: usize,
    search_expansion: bool,
    max_expansion_chars: usize,
}

impl AliasResolver {
    pub fn new(index: Arc<dyn TitleIndex>) -> Self {
        Self::from_config(index, &LinkingConfig::default())
    }

    pub fn from_config(index: Arc<dyn TitleIndex>, config: &LinkingConfig) -> Self {
        Self {
            index,
            max_tokens: config.max_alias_tokens,
            search_expansion: config.search_expansion,
            max_expansion_chars: config.max_expansion_chars,
        }
    }

    /// Literals and sentence-length spans are not entity names
    fn should_skip(&self, term: &str) -> bool {
        term.trim().is_empty() || token_count(term) > self.max_tokens || is_numeric(term)
    }

    /// Resolve `term` to a canonical title, or return it unchanged.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn resolve(&self, term: &str) -> String {
        if self.should_skip(term) {
            return term.to_string();
        }

        let term = self.expand(term).await;

        if let Some(title) = self.exact_redirect(&term).await {
            debug!(%term, %title, "Resolved by redirect");
            return title;
        }

        if let Some(title) = self.search_fallback(&term).await {
            debug!(%term, %title, "Resolved by title search");
            return title;
        }

        term
    }

    /// Optional full-text search expansion for short terms
    async fn expand(&self, term: &str) -> String {
        if !self.search_expansion || term.chars().count() > self.max_expansion_chars {
            return term.to_string();
        }

        match self.index.top_search_title(term).await {
            Ok(Some(title)) => title,
            Ok(None) => term.to_string(),
            Err(e) => {
                warn!(term, error = %e, "Search expansion failed");
                term.to_string()
            }
        }
    }

    /// Step 1: the page `term` lands on, unless it is a disambiguation page
    async fn exact_redirect(&self, term: &str) -> Option<String> {
        match self.index.resolve_page(term).await {
            Ok(Some(page)) if !page.is_disambiguation => Some(page.title),
            Ok(Some(page)) => {
                debug!(term, title = %page.title, "Landed on disambiguation page");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(term, error = %e, "Redirect lookup failed");
                None
            }
        }
    }

    /// Step 2: first ranked suggestion that is neither a disambiguation page
    /// nor a bare echo of the input
    async fn search_fallback(&self, term: &str) -> Option<String> {
        let suggestions = match self.index.suggest_titles(term, SUGGESTION_LIMIT).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                warn!(term, error = %e, "Title search failed");
                return None;
            }
        };

        suggestions
            .into_iter()
            .find(|s| is_acceptable_suggestion(term, s))
            .map(|s| s.title)
    }
}

fn is_acceptable_suggestion(term: &str, suggestion: &TitleSuggestion) -> bool {
    let description = suggestion.description.to_lowercase();
    if description.contains(DISAMBIGUATION_MARKER) {
        return false;
    }
    if suggestion
        .title
        .to_lowercase()
        .contains("(disambiguation)")
    {
        return false;
    }
    // Same title with no description is the index echoing the query back
    let echo = suggestion.title.to_lowercase() == term.to_lowercase();
    !(echo && suggestion.description.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::PageInfo;
    use crate::error::ClientError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeIndex {
        pages: HashMap<String, PageInfo>,
        suggestions: HashMap<String, Vec<TitleSuggestion>>,
        search: HashMap<String, String>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeIndex {
        fn page(mut self, term: &str, title: &str, disambiguation: bool) -> Self {
            self.pages.insert(
                term.to_string(),
                PageInfo {
                    title: title.to_string(),
                    is_disambiguation: disambiguation,
                },
            );
            self
        }

        fn suggest(mut self, term: &str, hits: &[(&str, &str)]) -> Self {
            self.suggestions.insert(
                term.to_string(),
                hits.iter()
                    .map(|(t, d)| TitleSuggestion {
                        title: t.to_string(),
                        description: d.to_string(),
                    })
                    .collect(),
            );
            self
        }
    }

    #[async_trait]
    impl TitleIndex for FakeIndex {
        async fn resolve_page(&self, term: &str) -> Result<Option<PageInfo>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::malformed("fake", "boom"));
            }
            Ok(self.pages.get(term).cloned())
        }

        async fn suggest_titles(
            &self,
            term: &str,
            _limit: usize,
        ) -> Result<Vec<TitleSuggestion>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ClientError::malformed("fake", "boom"));
            }
            Ok(self.suggestions.get(term).cloned().unwrap_or_default())
        }

        async fn top_search_title(&self, term: &str) -> Result<Option<String>, ClientError> {
            Ok(self.search.get(term).cloned())
        }
    }

    fn resolver(index: FakeIndex) -> AliasResolver {
        AliasResolver::new(Arc::new(index))
    }

    #[tokio::test]
    async fn test_strict_redirect() {
        let r = resolver(FakeIndex::default().page("UK", "United Kingdom", false));
        assert_eq!(r.resolve("UK").await, "United Kingdom");
    }

    #[tokio::test]
    async fn test_identity_for_canonical_title() {
        let r = resolver(FakeIndex::default().page("Physics", "Physics", false));
        assert_eq!(r.resolve("Physics").await, "Physics");
    }

    #[tokio::test]
    async fn test_disambiguation_falls_back_to_search() {
        let index = FakeIndex::default()
            .page("Barca", "Barca", true)
            .suggest(
                "Barca",
                &[
                    ("Barca", ""),
                    ("Barca (disambiguation)", ""),
                    ("Barcarolle", "Barcarolle may refer to a disambiguation list"),
                    ("FC Barcelona", "Association football club in Barcelona, Spain"),
                ],
            );
        assert_eq!(resolver(index).resolve("Barca").await, "FC Barcelona");
    }

    #[tokio::test]
    async fn test_echo_with_description_is_accepted() {
        let index = FakeIndex::default().suggest("Barça", &[("Barça", "Nickname of FC Barcelona")]);
        assert_eq!(resolver(index).resolve("Barça").await, "Barça");
    }

    #[tokio::test]
    async fn test_nothing_found_returns_input() {
        let r = resolver(FakeIndex::default());
        assert_eq!(r.resolve("Qwzx Club").await, "Qwzx Club");
    }

    #[tokio::test]
    async fn test_numeric_and_long_terms_skip_lookups() {
        let index = Arc::new(FakeIndex::default().page("2015", "2015 (year)", false));
        let r = AliasResolver::new(index.clone());

        assert_eq!(r.resolve("2015").await, "2015");
        assert_eq!(
            r.resolve("one two three four five six").await,
            "one two three four five six"
        );
        assert_eq!(index.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_returns_input() {
        let index = FakeIndex {
            fail: true,
            ..Default::default()
        };
        assert_eq!(resolver(index).resolve("UK").await, "UK");
    }

    #[tokio::test]
    async fn test_search_expansion() {
        let mut index = FakeIndex::default().page("Cristiano Ronaldo", "Cristiano Ronaldo", false);
        index
            .search
            .insert("CR7".to_string(), "Cristiano Ronaldo".to_string());

        let config = LinkingConfig {
            search_expansion: true,
            ..Default::default()
        };
        let r = AliasResolver::from_config(Arc::new(index), &config);
        assert_eq!(r.resolve("CR7").await, "Cristiano Ronaldo");
    }
}
