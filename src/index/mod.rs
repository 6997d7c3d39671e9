//! Keyword indexing
//!
//! This module turns page text into keyword rows:
//! - `tokenize` splits text into lowercase alphabetic tokens
//! - `Indexer` records pages, keywords and per-page occurrence counts
//! - `RelevanceBatch` periodically recomputes keyword relevance
//! - `ResilientStorage` applies the reconnect-and-retry policy to every statement

mod indexer;
mod relevance;
mod retry;
mod tokenizer;

pub use indexer::{Indexer, MAX_KEYWORD_CHARS};
pub use relevance::RelevanceBatch;
pub use retry::{ResilientStorage, RetryPolicy};
pub use tokenizer::{tokenize, DELIMITERS};
