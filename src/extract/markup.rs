//! Raw-markup scans for the page title and outgoing anchors
//!
//! Both scans run over the original markup rather than the converted text, so
//! they see anchors inside elements the converter drops.

use crate::url::resolve_link;
use url::Url;

/// Longest title kept, in characters
pub const MAX_TITLE_CHARS: usize = 255;

/// Finds the first `<title>` element and returns its decoded, trimmed text
///
/// # Returns
///
/// * `Some(title)` - The title, truncated to [`MAX_TITLE_CHARS`] characters
/// * `None` - No title element, or its text is empty after trimming
pub fn extract_title(html: &str) -> Option<String> {
    let bytes = html.as_bytes();
    let open = find_tag(bytes, 0, b"<title")?;
    let content_start = open + bytes[open..].iter().position(|&b| b == b'>')? + 1;
    let content_end = find_ignore_case(bytes, content_start, b"</title>")?;

    let raw = &html[content_start..content_end];
    let decoded = html_escape::decode_html_entities(raw);
    let title = truncate_chars(decoded.trim(), MAX_TITLE_CHARS);

    (!title.is_empty()).then(|| title.to_string())
}

/// Collects every `<a href>` target as an absolute URL, in document order
///
/// Fragments are dropped, relative targets are resolved against `base_url`,
/// and any target that fails to resolve or reaches `max_url_length` bytes is
/// skipped. Duplicates are kept: each anchor counts as one inbound link.
///
/// # Arguments
///
/// * `html` - The raw page markup
/// * `base_url` - The URL the page was fetched from
/// * `max_url_length` - Exclusive upper bound on the absolute URL length
pub fn extract_links(html: &str, base_url: &Url, max_url_length: usize) -> Vec<String> {
    let bytes = html.as_bytes();
    let mut links = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find_tag(bytes, cursor, b"<a") {
        let (href, end) = scan_href(html, start + 2);
        cursor = end;

        let Some(href) = href else { continue };
        let href = html_escape::decode_html_entities(href);
        match resolve_link(&href, base_url, max_url_length) {
            Ok(link) => links.push(link),
            Err(e) => tracing::trace!("Skipping link '{}': {}", href, e),
        }
    }

    links
}

/// Scans the attributes of a tag starting at `pos` for an `href` value
///
/// Returns the value, if any, and the offset just past the tag.
fn scan_href(html: &str, mut pos: usize) -> (Option<&str>, usize) {
    let bytes = html.as_bytes();
    let mut href = None;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return (href, pos);
        }
        if bytes[pos] == b'>' {
            return (href, pos + 1);
        }

        let name_start = pos;
        while pos < bytes.len()
            && !bytes[pos].is_ascii_whitespace()
            && !matches!(bytes[pos], b'=' | b'>')
        {
            pos += 1;
        }
        let name = &bytes[name_start..pos];
        if name.is_empty() {
            // stray '=' with no name
            pos += 1;
            continue;
        }

        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'=' {
            continue;
        }
        pos += 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let (value_start, value_end) = match bytes.get(pos) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = pos + 1;
                let end = bytes[start..]
                    .iter()
                    .position(|&b| b == quote)
                    .map_or(bytes.len(), |offset| start + offset);
                pos = (end + 1).min(bytes.len());
                (start, end)
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>'
                {
                    pos += 1;
                }
                (start, pos)
            }
        };

        if href.is_none() && name.eq_ignore_ascii_case(b"href") {
            href = Some(&html[value_start..value_end]);
        }
    }
}

/// Finds `<name` at or after `from`, case-insensitively, followed by whitespace or `>`
fn find_tag(bytes: &[u8], mut from: usize, open: &[u8]) -> Option<usize> {
    loop {
        let at = find_ignore_case(bytes, from, open)?;
        match bytes.get(at + open.len()) {
            Some(&b) if b.is_ascii_whitespace() || b == b'>' => return Some(at),
            Some(_) => from = at + open.len(),
            None => return None,
        }
    }
}

fn find_ignore_case(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|offset| from + offset)
}

/// Truncates to at most `max` characters without splitting a character
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
