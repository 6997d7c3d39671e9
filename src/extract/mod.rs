//! Page extraction
//!
//! Turns a fetched HTML document into the three things the crawler needs:
//! - the page title, which gates whether the page is indexed at all
//! - a flattened plain-text rendering used for tokenizing and storage
//! - the absolute URLs of all outgoing anchors

mod converter;
mod markup;

pub use converter::HtmlToText;
pub use markup::{extract_links, extract_title, MAX_TITLE_CHARS};

pub(crate) use markup::truncate_chars;
use url::Url;

/// Longest plain-text content kept, in characters
pub const MAX_CONTENT_CHARS: usize = 65_535;

/// Everything extracted from one HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Decoded, trimmed title; `None` means the page must not be indexed
    pub title: Option<String>,

    /// Single-line plain text with runs of whitespace collapsed
    pub text: String,

    /// Absolute outgoing links in document order
    pub links: Vec<String>,
}

/// Extracts title, plain text and links from a page
///
/// # Arguments
///
/// * `html` - The page markup
/// * `base_url` - The final URL of the page, for resolving relative links
/// * `max_url_length` - Links whose absolute form reaches this length are dropped
///
/// # Example
///
/// ```
/// use url::Url;
/// use webindex::extract::extract_page;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let page = extract_page(
///     "<title>Hi</title><body><p>Hello <a href=\"/next\">there</a></p></body>",
///     &base,
///     256,
/// );
/// assert_eq!(page.title.as_deref(), Some("Hi"));
/// assert_eq!(page.text, "Hello there");
/// assert_eq!(page.links, vec!["https://example.com/next"]);
/// ```
pub fn extract_page(html: &str, base_url: &Url, max_url_length: usize) -> ExtractedPage {
    let title = extract_title(html);
    let links = extract_links(html, base_url, max_url_length);
    let text = plain_text(html);

    ExtractedPage { title, text, links }
}

/// Converts markup to stored page content
///
/// The converter output is entity-decoded, flattened onto one line, trimmed
/// and truncated to [`MAX_CONTENT_CHARS`].
pub fn plain_text(html: &str) -> String {
    let converted = HtmlToText::new().convert(html);
    let decoded = html_escape::decode_html_entities(&converted);
    let flat = flatten_whitespace(&decoded);
    truncate_chars(&flat, MAX_CONTENT_CHARS).to_string()
}

/// Replaces every whitespace character with a space, collapses space runs and trims
///
/// Decoded `&nbsp;` (U+00A0) and the other Unicode spaces count as whitespace.
pub fn flatten_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let ch = if ch.is_whitespace() { ' ' } else { ch };
        if ch == ' ' && (out.is_empty() || out.ends_with(' ')) {
            continue;
        }
        out.push(ch);
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}
