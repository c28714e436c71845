//! String similarity measures, all in [0, 1]

use std::collections::BTreeSet;

use super::normalize::normalize_for_matching;

/// Indel similarity: `2 * LCS / (len_a + len_b)` over characters.
/// Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // Longest common subsequence, two-row table
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b.len()];

    (2 * lcs) as f64 / total as f64
}

fn join_sections(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Token-set similarity.
///
/// Splits both strings into token sets and compares the shared tokens
/// against each side's full token set, so word order and repeated or extra
/// tokens on one side do not hurt the score. A string whose tokens are a
/// subset of the other's scores 1.0.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 1.0;
    }

    let shared = shared.join(" ");
    let full_a = join_sections(&shared, &only_a.join(" "));
    let full_b = join_sections(&shared, &only_b.join(" "));

    let mut best = ratio(&full_a, &full_b);
    if !shared.is_empty() {
        best = best.max(ratio(&shared, &full_a)).max(ratio(&shared, &full_b));
    }
    best
}

/// Token-set similarity on normalized text (lexical score of a candidate)
pub fn lexical_similarity(query: &str, label: &str) -> f64 {
    token_set_ratio(&normalize_for_matching(query), &normalize_for_matching(label))
}

/// Plain character similarity, used where no richer scoring signal exists
pub fn character_similarity(a: &str, b: &str) -> f64 {
    strsim::jaro_winkler(&normalize_for_matching(a), &normalize_for_matching(b))
}
