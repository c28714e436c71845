//! Entity linking
//!
//! Maps a surface-form mention to a canonical knowledge-graph entity:
//!
//! ```text
//! mention -> AliasResolver -> CandidateSource -> ScoringEngine -> EntityLinker
//! ```
//!
//! Resolution always produces a value. Absence of data yields the
//! `Unknown` or `Unresolved` sentinel, never an error.

pub mod alias;
pub mod candidates;
pub mod disambiguator;
pub mod normalize;
pub mod scoring;
pub mod similarity;
pub mod types;

pub use alias::AliasResolver;
pub use candidates::{CandidateSource, CuratedAnchorSource, RemoteLookupSource, SourceStrategy};
pub use disambiguator::EntityLinker;
pub use scoring::ScoringEngine;
pub use types::{Candidate, CandidateRecord, Mention, Resolution, ResolvedEntity};
