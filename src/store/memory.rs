//! In-memory key-value store seeded from YAML

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use super::{KeyValueStore, DEFAULT_ENTITY_TYPE};
use crate::error::ClientError;

/// Seed file layout
///
/// ```yaml
/// redirects:
///   Barca: FC Barcelona
/// anchors:
///   Al-Nassr: [Al-Nassr FC, Al-Nasr SC]
/// types:
///   Al-Nassr FC: [SoccerClub]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSeed {
    pub redirects: HashMap<String, String>,
    pub anchors: HashMap<String, Vec<String>>,
    pub types: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    seed: StoreSeed,
}

impl InMemoryStore {
    pub fn from_seed(seed: StoreSeed) -> Self {
        Self { seed }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let seed: StoreSeed = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!(
            redirects = seed.redirects.len(),
            anchors = seed.anchors.len(),
            types = seed.types.len(),
            "Loaded store seed from {}",
            path.display()
        );

        Ok(Self::from_seed(seed))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_redirect(&self, term: &str) -> Result<Option<String>, ClientError> {
        Ok(self.seed.redirects.get(term).cloned())
    }

    async fn get_candidates(&self, anchor: &str) -> Result<Vec<String>, ClientError> {
        Ok(self.seed.anchors.get(anchor).cloned().unwrap_or_default())
    }

    async fn get_type(&self, entity: &str) -> Result<Vec<String>, ClientError> {
        Ok(self
            .seed
            .types
            .get(entity)
            .filter(|types| !types.is_empty())
            .cloned()
            .unwrap_or_else(|| vec![DEFAULT_ENTITY_TYPE.to_string()]))
    }
}
