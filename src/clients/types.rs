//! Wire types for the external services
//!
//! These mirror the JSON the services return. They are converted into the
//! crate's own records at the client boundary and never leak further.
//!
//! References:
//! - https://www.mediawiki.org/wiki/API:Query and API:Opensearch
//! - https://lookup.dbpedia.org/api/search
//! - https://www.w3.org/TR/sparql11-results-json/

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// MediaWiki
// =============================================================================

/// `action=query&titles=...&redirects=1&prop=pageprops`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQueryResponse {
    #[serde(default)]
    pub query: Option<PageQuery>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Keyed by page id; missing pages use negative ids
    #[serde(default)]
    pub pages: BTreeMap<String, WikiPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WikiPage {
    pub title: String,
    #[serde(default)]
    pub missing: Option<Value>,
    #[serde(default)]
    pub invalid: Option<Value>,
    #[serde(default)]
    pub pageprops: Option<HashMap<String, Value>>,
}

impl WikiPage {
    pub fn exists(&self) -> bool {
        self.missing.is_none() && self.invalid.is_none()
    }

    pub fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .map(|props| props.contains_key("disambiguation"))
            .unwrap_or(false)
    }
}

/// `action=query&list=search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FullTextSearchResponse {
    #[serde(default)]
    pub query: Option<FullTextSearchQuery>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FullTextSearchQuery {
    #[serde(default)]
    pub search: Vec<FullTextSearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullTextSearchHit {
    pub title: String,
}

/// `action=opensearch` answers with a positional array:
/// `[term, [titles], [descriptions], [urls]]`. Older mirrors omit the
/// description array entirely, so this is parsed by hand.
pub fn parse_opensearch(body: &Value) -> Result<Vec<(String, String)>, String> {
    let items = body
        .as_array()
        .ok_or_else(|| "opensearch response is not an array".to_string())?;

    let titles = items
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| "opensearch response has no title list".to_string())?;

    let descriptions = items.get(2).and_then(Value::as_array);

    Ok(titles
        .iter()
        .enumerate()
        .filter_map(|(i, title)| {
            let title = title.as_str()?.to_string();
            let description = descriptions
                .and_then(|d| d.get(i))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some((title, description))
        })
        .collect())
}

// =============================================================================
// DBpedia Lookup
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub docs: Vec<LookupDoc>,
}

/// Every field arrives as an array of strings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupDoc {
    #[serde(default)]
    pub label: Vec<String>,
    #[serde(default, rename = "typeName")]
    pub type_name: Vec<String>,
    #[serde(default, rename = "refCount")]
    pub ref_count: Vec<String>,
}

// =============================================================================
// SPARQL 1.1 JSON results
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    /// Absent when the endpoint answered something other than an ASK result
    #[serde(default)]
    pub boolean: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponse {
    pub results: SelectResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectResults {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, BindingTerm>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BindingTerm {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_query_redirect_and_props() {
        let body = json!({
            "query": {
                "redirects": [{"from": "UK", "to": "United Kingdom"}],
                "pages": {
                    "31717": {"pageid": 31717, "ns": 0, "title": "United Kingdom"}
                }
            }
        });
        let parsed: PageQueryResponse = serde_json::from_value(body).unwrap();
        let query = parsed.query.unwrap();
        let page = query.pages.values().next().unwrap();
        assert_eq!(page.title, "United Kingdom");
        assert!(page.exists());
        assert!(!page.is_disambiguation());
    }

    #[test]
    fn test_page_query_disambiguation_and_missing() {
        let body = json!({
            "query": {
                "pages": {
                    "-1": {"ns": 0, "title": "Qwzx", "missing": ""},
                    "4451": {"title": "Barca", "pageprops": {"disambiguation": ""}}
                }
            }
        });
        let parsed: PageQueryResponse = serde_json::from_value(body).unwrap();
        let pages = parsed.query.unwrap().pages;
        assert!(!pages["-1"].exists());
        assert!(pages["4451"].is_disambiguation());
    }

    #[test]
    fn test_parse_opensearch() {
        let body = json!([
            "Barca",
            ["Barca", "Barça", "Barcarolle"],
            ["Barca may refer to:", "", "A barcarolle is a song"],
            ["u1", "u2", "u3"]
        ]);
        let hits = parse_opensearch(&body).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[1], ("Barça".to_string(), String::new()));
    }

    #[test]
    fn test_parse_opensearch_without_descriptions() {
        let body = json!(["UK", ["United Kingdom"]]);
        let hits = parse_opensearch(&body).unwrap();
        assert_eq!(hits, vec![("United Kingdom".to_string(), String::new())]);
        assert!(parse_opensearch(&json!({"error": "x"})).is_err());
    }

    #[test]
    fn test_lookup_doc_fields() {
        let body = json!({
            "docs": [{
                "label": ["<B>Barcelona</B> (football club)"],
                "typeName": ["SoccerClub", "Organisation"],
                "refCount": ["7342"],
                "resource": ["http://dbpedia.org/resource/FC_Barcelona"]
            }, {}]
        });
        let parsed: LookupResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.docs.len(), 2);
        assert_eq!(parsed.docs[0].type_name.len(), 2);
        assert!(parsed.docs[1].label.is_empty());
    }

    #[test]
    fn test_sparql_shapes() {
        let ask: AskResponse =
            serde_json::from_value(json!({"head": {}, "boolean": true})).unwrap();
        assert_eq!(ask.boolean, Some(true));

        let select: SelectResponse = serde_json::from_value(json!({
            "head": {"vars": ["p"]},
            "results": {"bindings": [
                {"p": {"type": "uri", "value": "http://dbpedia.org/ontology/team"}}
            ]}
        }))
        .unwrap();
        assert_eq!(
            select.results.bindings[0]["p"].value,
            "http://dbpedia.org/ontology/team"
        );
    }
}
