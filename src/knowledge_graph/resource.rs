//! Resource identifiers
//!
//! Turns entity names and namespaced predicates into IRIs that are safe to
//! embed in a query between angle brackets.

use crate::config::NamespaceConfig;

/// Punctuation allowed in an identifier, besides alphanumerics.
/// Everything else (`<>"{}|\^` and backtick among them) is stripped.
const IDENTIFIER_PUNCTUATION: &[char] = &[
    '_', ':', '/', '?', '#', '=', '-', '.', '(', ')', '\'', ',', '%', '&',
];

/// Generic links that say nothing about how two resources are related
pub const WEAK_PREDICATES: &[&str] = &[
    "http://dbpedia.org/ontology/wikiPageWikiLink",
    "http://dbpedia.org/ontology/wikiPageRedirects",
    "http://dbpedia.org/ontology/wikiPageDisambiguates",
    "http://dbpedia.org/ontology/wikiPageExternalLink",
    "http://dbpedia.org/property/wikiPageUsesTemplate",
    "http://www.w3.org/2002/07/owl#sameAs",
    "http://purl.org/dc/terms/subject",
    "http://www.w3.org/2000/01/rdf-schema#seeAlso",
];

/// Local name of the generic cross-reference link in the ontology namespace
pub const WIKI_LINK: &str = "wikiPageWikiLink";

/// Normalize a name to resource-identifier form: spaces become underscores,
/// characters outside the identifier allow-list are dropped.
pub fn sanitize_identifier(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || IDENTIFIER_PUNCTUATION.contains(c))
        .collect()
}

fn is_absolute(iri: &str) -> bool {
    iri.starts_with("http://") || iri.starts_with("https://")
}

/// IRI for an entity name. Absolute IRIs are kept (sanitized).
pub fn resource_iri(namespaces: &NamespaceConfig, name: &str) -> String {
    let id = sanitize_identifier(name);
    if is_absolute(&id) {
        id
    } else {
        format!("{}{}", namespaces.resource, id)
    }
}

/// IRI for a predicate written as `prefix:local`, a bare local name, or an
/// absolute IRI. Unknown prefixes fall back to the ontology namespace.
pub fn predicate_iri(namespaces: &NamespaceConfig, predicate: &str) -> String {
    let predicate = sanitize_identifier(predicate);
    if is_absolute(&predicate) {
        return predicate;
    }

    match predicate.split_once(':') {
        Some((prefix, local)) => match namespaces.prefixes.get(prefix) {
            Some(ns) => format!("{ns}{local}"),
            None => format!("{}{}", namespaces.ontology, local),
        },
        None => format!("{}{}", namespaces.ontology, predicate),
    }
}

pub fn is_weak_predicate(iri: &str) -> bool {
    WEAK_PREDICATES.contains(&iri)
}

/// Last path or fragment segment of an IRI
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['/', '#']).next().unwrap_or(iri)
}

/// Human-readable name of a resource IRI
pub fn display_name(iri: &str) -> String {
    local_name(iri).replace('_', " ")
}

/// `FILTER(?var NOT IN (<weak>, ...))`
pub(crate) fn weak_predicate_filter(var: &str) -> String {
    let list = WEAK_PREDICATES
        .iter()
        .map(|iri| format!("<{iri}>"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("FILTER(?{var} NOT IN ({list}))")
}
