//! Knowledge-graph reasoning
//!
//! This module provides:
//! - Resource identifier sanitizing and IRI expansion
//! - `FactValidator`: tiered triple validation
//! - `PathReasoner`: direct or two-hop paths between entities
//! - `GraphInspector`: predicate, type, abstract and link reads

pub mod inspect;
pub mod reasoning;
pub mod resource;
pub mod validator;

pub use inspect::GraphInspector;
pub use reasoning::{PathHop, PathReasoner};
pub use resource::{is_weak_predicate, sanitize_identifier, WEAK_PREDICATES};
pub use validator::{FactValidator, Triple, Verdict};
