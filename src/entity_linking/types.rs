//! Entity linking value types
//!
//! All of these are request-scoped: built for one mention, never shared or
//! mutated after construction.

use serde::{Deserialize, Serialize};

/// Type tag attached to 4-digit year literals
pub const LITERAL_YEAR_TYPE: &str = "literal-year";

/// Label returned when lookup ran but no candidate cleared the threshold
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Type marker returned when the source has no entry for the term
pub const UNRESOLVED_TYPE: &str = "Unresolved";

/// A surface form extracted from source text, with its sentence if known
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub text: String,
    #[serde(default)]
    pub context: Option<String>,
}

impl Mention {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, sentence: impl Into<String>) -> Self {
        self.context = Some(sentence.into());
        self
    }
}

/// A candidate as produced by a `CandidateSource`, before scoring.
/// The label is already cleaned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub label: String,
    pub type_tags: Vec<String>,
    pub popularity: u64,
}

/// A candidate that cleared the lexical threshold for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
    pub type_tags: Vec<String>,
    pub popularity: u64,
    /// Token-set similarity to the query, always in [0, 1]
    pub lexical_score: f64,
}

impl Candidate {
    pub fn new(record: CandidateRecord, lexical_score: f64) -> Self {
        Self {
            label: record.label,
            type_tags: record.type_tags,
            popularity: record.popularity,
            lexical_score: lexical_score.clamp(0.0, 1.0),
        }
    }
}

/// A linked entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub canonical_label: String,
    /// Empty means "unknown type"
    pub type_tags: Vec<String>,
    /// Similarity of the winning candidate to the query, in [0, 1]
    pub confidence: f64,
}

/// Outcome of resolving one mention. Exactly one of these, never several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(ResolvedEntity),
    /// Lookup ran but nothing cleared the threshold
    Unknown,
    /// The candidate source has no entry for the (alias-resolved) term
    Unresolved { term: String },
}

impl Resolution {
    pub fn literal_year(term: &str) -> Self {
        Self::Resolved(ResolvedEntity {
            canonical_label: term.to_string(),
            type_tags: vec![LITERAL_YEAR_TYPE.to_string()],
            confidence: 1.0,
        })
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Resolved(entity) => &entity.canonical_label,
            Self::Unknown => UNKNOWN_LABEL,
            Self::Unresolved { term } => term,
        }
    }

    pub fn type_tags(&self) -> Vec<String> {
        match self {
            Self::Resolved(entity) => entity.type_tags.clone(),
            Self::Unknown => vec![],
            Self::Unresolved { .. } => vec![UNRESOLVED_TYPE.to_string()],
        }
    }

    /// Name to use for the entity in a fact: the label, or `mention` when
    /// nothing was found
    pub fn entity_name<'a>(&'a self, mention: &'a str) -> &'a str {
        match self {
            Self::Unknown => mention,
            _ => self.label(),
        }
    }

    /// The `(label, type tags)` pair
    pub fn to_pair(&self) -> (String, Vec<String>) {
        (self.label().to_string(), self.type_tags())
    }

    pub fn entity(&self) -> Option<&ResolvedEntity> {
        match self {
            Self::Resolved(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}
