//! Text normalization for entity matching
//!
//! Provides the string hygiene shared by alias resolution, candidate
//! generation and scoring:
//! - Unicode NFKC normalization and lowercasing
//! - Label cleaning (highlight markup, parenthetical qualifiers)
//! - Literal detection (years, plain numbers)
//! - Query coverage against a candidate label

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// HTML-like tags, e.g. `<B>Barcelona</B>`
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<]+?>").unwrap());

/// Parenthetical qualifiers, e.g. `Barcelona (football club)`
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\(.*?\)").unwrap());

/// Tokens ignored by the coverage check
const COVERAGE_STOPWORDS: &[&str] = &["fc", "club", "sc", "the", "of", "and", "in", "inc"];

/// Labels starting with this are index pages, not entities
const LIST_PAGE_MARKER: &str = "List of";

/// Normalize text for similarity comparison.
///
/// Performs NFKC fold, lowercasing and whitespace collapse. Punctuation is
/// kept: "F.C." and "FC" are different tokens.
///
/// # Examples
///
/// ```
/// use kg_linker::entity_linking::normalize::normalize_for_matching;
///
/// assert_eq!(normalize_for_matching("  Real   Madrid CF "), "real madrid cf");
/// assert_eq!(normalize_for_matching("ＢＡＲÇＡ"), "barça");
/// ```
pub fn normalize_for_matching(s: &str) -> String {
    let folded: String = s.nfkc().collect();
    folded
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip markup and parenthetical qualifiers from a candidate label
pub fn clean_label(label: &str) -> String {
    let without_tags = TAG_RE.replace_all(label, "");
    PAREN_RE.replace_all(&without_tags, "").trim().to_string()
}

pub fn is_list_page(label: &str) -> bool {
    label.starts_with(LIST_PAGE_MARKER)
}

/// A 4-digit number, treated as a calendar year
pub fn is_literal_year(term: &str) -> bool {
    term.len() == 4 && term.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_numeric(term: &str) -> bool {
    !term.is_empty() && term.chars().all(char::is_numeric)
}

pub fn token_count(term: &str) -> usize {
    term.split_whitespace().count()
}

/// True when some whitespace token of `term` equals `marker`, ignoring case
/// and punctuation ("F.C." matches "FC")
pub fn contains_token(term: &str, marker: &str) -> bool {
    term.split_whitespace().any(|t| {
        let bare: String = t.chars().filter(|c| c.is_alphanumeric()).collect();
        bare.eq_ignore_ascii_case(marker)
    })
}

fn coverage_tokens(s: &str) -> Vec<String> {
    s.to_lowercase()
        .replace('-', " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Every non-stopword query token must prefix some label token.
///
/// "Real Madrid" is covered by "Real Madrid CF"; "Manchester City" is not
/// covered by "Manchester United F.C.".
pub fn covers_query(query: &str, label: &str) -> bool {
    let label_tokens = coverage_tokens(label);

    coverage_tokens(query)
        .iter()
        .filter(|q| !COVERAGE_STOPWORDS.contains(&q.as_str()))
        .all(|q| label_tokens.iter().any(|l| l.starts_with(q.as_str())))
}
