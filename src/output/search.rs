//! Keyword search over an existing index

use crate::index::tokenize;
use crate::storage::{SearchHit, Storage, StorageResult};
use std::fmt::Write;

/// Most hits returned for one query
pub const DEFAULT_SEARCH_LIMIT: usize = 100;

/// Characters of page content shown under each hit
pub const SNIPPET_CHARS: usize = 200;

/// Searches the index for pages containing every word of `query`
///
/// The query is tokenized exactly like page text, so punctuation, digits
/// and case are ignored. A query with no usable words matches nothing.
pub fn search(storage: &dyn Storage, query: &str, limit: usize) -> StorageResult<Vec<SearchHit>> {
    let terms: Vec<String> = tokenize(query).collect();
    if terms.is_empty() {
        return Ok(Vec::new());
    }
    storage.search(&terms, limit)
}

/// Returns the first `max` characters of `content`, marking a cut with `...`
pub fn snippet(content: &str, max: usize) -> String {
    match content.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", content[..idx].trim_end()),
        None => content.to_string(),
    }
}

/// Formats search hits for the terminal
pub fn format_search_results(query: &str, hits: &[SearchHit]) -> String {
    let mut out = String::new();

    if hits.is_empty() {
        let _ = writeln!(out, "No pages match '{}'", query);
        return out;
    }

    let _ = writeln!(out, "{} result(s) for '{}':\n", hits.len(), query);
    for (rank, hit) in hits.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {} [{:.4}]", rank + 1, hit.title, hit.score);
        let _ = writeln!(out, "     {}", hit.url);
        let _ = writeln!(out, "     {}", snippet(&hit.content, SNIPPET_CHARS));
        let _ = writeln!(out);
    }
    out
}

/// Prints search hits to stdout
pub fn print_search_results(query: &str, hits: &[SearchHit]) {
    print!("{}", format_search_results(query, hits));
}
