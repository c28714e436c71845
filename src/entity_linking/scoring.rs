//! Candidate scoring
//!
//! ```text
//! score = lexical × type_prior × popularity × context
//!         × 1.5  when the label equals the query (case-insensitive)
//!         × 0.1  when the label or a type mentions "season"
//! ```
//!
//! - lexical: token-set similarity of query and label; below the minimum
//!   the candidate is excluded, not down-weighted
//! - type_prior: best weight among the candidate's ontology classes
//! - popularity: `1 + min(refs / scale, 1)`, so at most 2×
//! - context: `0.7 + 0.6 × similarity(sentence, label)`, only with a sentence
//!
//! Remote lookup candidates must also cover every non-stopword query token.

use std::collections::HashMap;
use tracing::debug;

use super::normalize::{covers_query, normalize_for_matching};
use super::similarity::lexical_similarity;
use super::types::{Candidate, CandidateRecord};
use crate::config::LinkingConfig;

/// Built-in class weights. Entity-like classes are boosted, transient
/// event-like classes penalized. Unlisted classes weigh 1.0.
pub const DEFAULT_TYPE_PRIORS: &[(&str, f64)] = &[
    ("Person", 1.8),
    ("Athlete", 1.9),
    ("Politician", 1.8),
    ("Artist", 1.7),
    ("Company", 1.9),
    ("Organisation", 1.7),
    ("SportsTeam", 2.0),
    ("FootballClub", 2.1),
    ("SoccerClub", 2.1),
    ("SportsLeague", 1.8),
    ("SoccerLeague", 1.8),
    ("Place", 1.7),
    ("City", 1.7),
    ("Country", 1.7),
    ("Album", 1.5),
    ("Film", 1.4),
    ("Work", 1.2),
    ("Event", 0.3),
    ("Tournament", 0.2),
    ("Season", 0.05),
    ("List", 0.01),
];

const EXACT_MATCH_BOOST: f64 = 1.5;
const SEASON_PENALTY: f64 = 0.1;
const SEASON_MARKER: &str = "season";
const CONTEXT_FLOOR: f64 = 0.7;
const CONTEXT_SPAN: f64 = 0.6;

#[derive(Debug, Clone)]
pub struct ScoringEngine {
    type_priors: HashMap<String, f64>,
    min_lexical: f64,
    popularity_scale: f64,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(&LinkingConfig::default())
    }
}

impl ScoringEngine {
    pub fn new(config: &LinkingConfig) -> Self {
        let mut type_priors: HashMap<String, f64> = DEFAULT_TYPE_PRIORS
            .iter()
            .map(|(class, weight)| (class.to_string(), *weight))
            .collect();
        type_priors.extend(config.type_priors.clone());

        Self {
            type_priors,
            min_lexical: config.min_lexical,
            popularity_scale: config.popularity_scale,
        }
    }

    pub fn min_lexical(&self) -> f64 {
        self.min_lexical
    }

    /// Admit a record for `query`, or drop it.
    ///
    /// Records below the lexical minimum are dropped, and so are records
    /// whose label does not cover the query.
    pub fn admit(&self, query: &str, record: CandidateRecord) -> Option<Candidate> {
        let lexical = lexical_similarity(query, &record.label);
        if lexical < self.min_lexical {
            debug!(query, label = %record.label, lexical, "Below lexical minimum");
            return None;
        }

        if !covers_query(query, &record.label) {
            debug!(query, label = %record.label, "Label does not cover query");
            return None;
        }

        Some(Candidate::new(record, lexical))
    }

    pub fn type_prior(&self, type_tags: &[String]) -> f64 {
        type_tags
            .iter()
            .map(|tag| self.type_priors.get(tag).copied().unwrap_or(1.0))
            .reduce(f64::max)
            .unwrap_or(1.0)
    }

    pub fn popularity_factor(&self, popularity: u64) -> f64 {
        1.0 + (popularity as f64 / self.popularity_scale).min(1.0)
    }

    pub fn context_factor(sentence: &str, label: &str) -> f64 {
        CONTEXT_FLOOR + CONTEXT_SPAN * lexical_similarity(sentence, label)
    }

    /// Composite plausibility of `candidate` for `query`
    pub fn score(&self, query: &str, candidate: &Candidate, context: Option<&str>) -> f64 {
        let mut score = candidate.lexical_score
            * self.type_prior(&candidate.type_tags)
            * self.popularity_factor(candidate.popularity);

        if let Some(sentence) = context {
            score *= Self::context_factor(sentence, &candidate.label);
        }

        if normalize_for_matching(query) == normalize_for_matching(&candidate.label) {
            score *= EXACT_MATCH_BOOST;
        }

        if mentions_season(candidate) {
            score *= SEASON_PENALTY;
        }

        score
    }
}

fn mentions_season(candidate: &Candidate) -> bool {
    candidate.label.to_lowercase().contains(SEASON_MARKER)
        || candidate
            .type_tags
            .iter()
            .any(|t| t.to_lowercase().contains(SEASON_MARKER))
}
