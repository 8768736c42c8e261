//! Turning free-text queries into FTS5 match expressions
//!
//! Terms are separated by whitespace; a double-quoted run is one phrase.
//! Every term must match. Each term is emitted as a quoted FTS5 string so
//! user input can never inject operators or column filters.

use regex::Regex;
use std::sync::LazyLock;

static TERM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|\S+"#).expect("term pattern is valid"));

/// Split a query into terms and phrases, dropping empty ones
pub fn parse_terms(query: &str) -> Vec<String> {
    TERM_PATTERN
        .find_iter(query)
        .map(|m| {
            let raw = m.as_str();
            if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
                raw[1..raw.len() - 1].trim().to_string()
            } else {
                raw.to_string()
            }
        })
        .filter(|term| !term.is_empty())
        .collect()
}

/// Build the FTS5 match expression, or `None` for a query with no terms
pub fn to_match_expression(query: &str) -> Option<String> {
    let terms = parse_terms(query);
    if terms.is_empty() {
        return None;
    }
    let quoted: Vec<String> = terms
        .iter()
        .map(|term| format!("\"{}\"", term.replace('"', "\"\"")))
        .collect();
    Some(quoted.join(" AND "))
}
