//! URL handling module for WebIndex
//!
//! This module canonicalizes frontier URLs and resolves hyperlinks found on
//! fetched pages into absolute URLs.

mod normalize;
mod resolve;

pub use normalize::normalize_url;
pub use resolve::{resolve_link, skipped_extension, SKIPPED_EXTENSIONS};
