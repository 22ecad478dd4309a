//! Lexical helpers shared by ranking and scoring.

use std::collections::BTreeSet;

/// Unique lowercase whitespace-separated terms of `text`.
pub fn unique_terms(text: &str) -> BTreeSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Number of `terms` that occur as substrings of the lowercase `text`.
pub fn matched_terms(terms: &BTreeSet<String>, text: &str) -> usize {
    let haystack = text.to_lowercase();
    terms.iter().filter(|t| haystack.contains(t.as_str())).count()
}
