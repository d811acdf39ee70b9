use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid camelCase regex"));
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]").expect("valid non-word regex"));

/// Tokenize text for indexing and querying.
///
/// camelCase boundaries split into sub-tokens, snake_case survives intact,
/// everything is case-folded, and single-character tokens are dropped.
/// Stopwords are retained; BM25's idf downweights ubiquitous terms.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let spaced = CAMEL_BOUNDARY.replace_all(text, "$1 $2");
    let cleaned = NON_WORD.replace_all(&spaced, " ");

    cleaned
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| t.len() > 1)
        .collect()
}
