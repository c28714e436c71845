//! Linker configuration
//!
//! Loads `LinkerConfig` from YAML and applies environment overrides.
//! Every field has a default, so an empty file (or no file) is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_ENV: &str = "KG_LINKER_CONFIG";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    pub endpoints: EndpointConfig,
    pub timeouts: TimeoutConfig,
    pub linking: LinkingConfig,
    pub namespaces: NamespaceConfig,
    pub reasoning: ReasoningConfig,
    pub validation: ValidationConfig,
    pub store: StoreConfig,
}

/// External service addresses
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub wikipedia_api: String,
    pub lookup_api: String,
    pub sparql: String,
    pub user_agent: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            wikipedia_api: "https://en.wikipedia.org/w/api.php".to_string(),
            lookup_api: "https://lookup.dbpedia.org/api/search".to_string(),
            sparql: "https://dbpedia.org/sparql".to_string(),
            user_agent: concat!("kg-linker/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Per-request timeouts, in seconds. No request is retried.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub alias_secs: u64,
    pub lookup_secs: u64,
    pub sparql_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            alias_secs: 5,
            lookup_secs: 10,
            sparql_secs: 10,
        }
    }
}

impl TimeoutConfig {
    pub fn alias(&self) -> Duration {
        Duration::from_secs(self.alias_secs)
    }

    pub fn lookup(&self) -> Duration {
        Duration::from_secs(self.lookup_secs)
    }

    pub fn sparql(&self) -> Duration {
        Duration::from_secs(self.sparql_secs)
    }
}

/// Entity resolution tuning
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkingConfig {
    /// Candidates with a lexical score below this are dropped before scoring
    pub min_lexical: f64,
    /// Result cap for the remote search index
    pub max_hits: usize,
    /// Terms with more tokens than this skip alias resolution
    pub max_alias_tokens: usize,
    /// Suffix token appended to build the augmented query variant
    pub augment_suffix: String,
    /// Popularity signal at which the popularity factor saturates at 2x
    pub popularity_scale: f64,
    /// Replace short terms with the top full-text search title before redirects
    pub search_expansion: bool,
    /// Terms longer than this (in chars) skip search expansion
    pub max_expansion_chars: usize,
    /// Batch resolution concurrency
    pub batch_concurrency: usize,
    /// Overrides merged over the built-in type prior table
    pub type_priors: HashMap<String, f64>,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            min_lexical: 0.65,
            max_hits: 20,
            max_alias_tokens: 5,
            augment_suffix: "FC".to_string(),
            popularity_scale: 8000.0,
            search_expansion: false,
            max_expansion_chars: 25,
            batch_concurrency: 4,
            type_priors: HashMap::new(),
        }
    }
}

/// Knowledge-graph IRI namespaces
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    pub resource: String,
    pub ontology: String,
    /// Prefix -> namespace IRI, used to expand `prefix:local` predicates
    pub prefixes: HashMap<String, String>,
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        let prefixes = [
            ("dbo", "http://dbpedia.org/ontology/"),
            ("dbp", "http://dbpedia.org/property/"),
            ("dbr", "http://dbpedia.org/resource/"),
            ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            ("owl", "http://www.w3.org/2002/07/owl#"),
            ("foaf", "http://xmlns.com/foaf/0.1/"),
            ("dct", "http://purl.org/dc/terms/"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            resource: "http://dbpedia.org/resource/".to_string(),
            ontology: "http://dbpedia.org/ontology/".to_string(),
            prefixes,
        }
    }
}

/// Path search limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Outgoing edges of the start entity scanned during two-hop search
    pub neighbor_limit: usize,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self { neighbor_limit: 50 }
    }
}

/// How Tier 2 treats weak predicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Any predicate, in either direction, counts as proximity
    #[default]
    Relaxed,
    /// Only predicates outside the weak set count
    Strong,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub mode: ValidationMode,
}

/// Key-value store settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// YAML seed for the in-memory store. When set, resolution uses the
    /// curated anchor strategy instead of the remote lookup index.
    pub seed_path: Option<PathBuf>,
}

impl LinkerConfig {
    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading linker configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Parse and validate YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: LinkerConfig = if content.trim().is_empty() {
            LinkerConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `KG_LINKER_CONFIG` (or defaults), then apply endpoint
    /// overrides from `DBPEDIA_ENDPOINT`, `WIKIPEDIA_API` and `DBPEDIA_LOOKUP`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(endpoint) = std::env::var("DBPEDIA_ENDPOINT") {
            config.endpoints.sparql = endpoint;
        }
        if let Ok(endpoint) = std::env::var("WIKIPEDIA_API") {
            config.endpoints.wikipedia_api = endpoint;
        }
        if let Ok(endpoint) = std::env::var("DBPEDIA_LOOKUP") {
            config.endpoints.lookup_api = endpoint;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("endpoints.wikipedia_api", &self.endpoints.wikipedia_api),
            ("endpoints.lookup_api", &self.endpoints.lookup_api),
            ("endpoints.sparql", &self.endpoints.sparql),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError::invalid(field, e.to_string()))?;
        }

        let linking = &self.linking;
        if !(0.0..=1.0).contains(&linking.min_lexical) {
            return Err(ConfigError::invalid(
                "linking.min_lexical",
                "must be within [0, 1]",
            ));
        }
        if linking.max_hits == 0 {
            return Err(ConfigError::invalid("linking.max_hits", "must be positive"));
        }
        if linking.popularity_scale <= 0.0 {
            return Err(ConfigError::invalid(
                "linking.popularity_scale",
                "must be positive",
            ));
        }
        if linking.batch_concurrency == 0 {
            return Err(ConfigError::invalid(
                "linking.batch_concurrency",
                "must be positive",
            ));
        }
        if let Some((class, weight)) = linking.type_priors.iter().find(|(_, w)| **w < 0.0) {
            return Err(ConfigError::invalid(
                format!("linking.type_priors.{class}"),
                format!("weight {weight} is negative"),
            ));
        }

        for (field, secs) in [
            ("timeouts.alias_secs", self.timeouts.alias_secs),
            ("timeouts.lookup_secs", self.timeouts.lookup_secs),
            ("timeouts.sparql_secs", self.timeouts.sparql_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::invalid(field, "timeout must be positive"));
            }
        }

        if self.reasoning.neighbor_limit == 0 {
            return Err(ConfigError::invalid(
                "reasoning.neighbor_limit",
                "must be positive",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LinkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.linking.min_lexical, 0.65);
        assert_eq!(config.reasoning.neighbor_limit, 50);
        assert_eq!(config.validation.mode, ValidationMode::Relaxed);
        assert_eq!(
            config.namespaces.prefixes.get("dbo").map(String::as_str),
            Some("http://dbpedia.org/ontology/")
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
endpoints:
  sparql: http://localhost:8890/sparql
linking:
  max_hits: 15
  type_priors:
    BasketballTeam: 1.2
validation:
  mode: strong
"#;
        let config = LinkerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.endpoints.sparql, "http://localhost:8890/sparql");
        assert_eq!(
            config.endpoints.wikipedia_api,
            "https://en.wikipedia.org/w/api.php"
        );
        assert_eq!(config.linking.max_hits, 15);
        assert_eq!(config.linking.min_lexical, 0.65);
        assert_eq!(config.linking.type_priors.get("BasketballTeam"), Some(&1.2));
        assert_eq!(config.validation.mode, ValidationMode::Strong);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = LinkerConfig::from_yaml("  \n").unwrap();
        assert_eq!(config.timeouts.sparql_secs, 10);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = LinkerConfig::from_yaml("linking:\n  min_lexical: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("min_lexical"));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = LinkerConfig::from_yaml("endpoints:\n  sparql: not a url\n").unwrap_err();
        assert!(err.to_string().contains("endpoints.sparql"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = LinkerConfig::default();
        config.timeouts.sparql_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field, .. }) if field == "timeouts.sparql_secs"
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linker.yaml");
        std::fs::write(&path, "reasoning:\n  neighbor_limit: 10\n").unwrap();

        let config = LinkerConfig::from_file(&path).unwrap();
        assert_eq!(config.reasoning.neighbor_limit, 10);
        assert!(LinkerConfig::from_file(dir.path().join("missing.yaml")).is_err());
    }
}
