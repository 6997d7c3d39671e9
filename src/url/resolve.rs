use crate::{UrlError, UrlResult};
use url::Url;

/// File extensions of resources that are never HTML pages
///
/// Links whose path ends in one of these are not worth fetching.
pub const SKIPPED_EXTENSIONS: &[&str] = &[
    "3g2", "3gp", "7z", "ai", "aif", "apk", "arj", "avi", "bat", "bin", "bmp", "cda", "com", "csv",
    "dat", "db", "dbf", "deb", "dmg", "doc", "docx", "email", "eml", "emlx", "exe", "flv", "fnt",
    "fon", "gadget", "gif", "h264", "ico", "iso", "jar", "jpeg", "jpg", "log", "m4v", "mdb", "mid",
    "midi", "mov", "mp3", "mp4", "mpa", "mpeg", "mpg", "msg", "msi", "odt", "ods", "oft", "ogg",
    "ost", "otf", "pdf", "pkg", "png", "ppt", "pptx", "ps", "psd", "pst", "rar", "rpm", "rtf",
    "sql", "svg", "swf", "tar", "tar.gz", "tex", "tif", "tiff", "toast", "ttf", "txt", "vcd", "vcf",
    "vob", "wav", "wma", "wmv", "wpd", "wpl", "wsf", "xls", "xlsx", "xml", "z", "zip",
];

/// Returns the skipped extension the URL path ends with, if any
///
/// Only the last path segment is inspected, case-insensitively, so a bare
/// host such as `https://example.com/` never matches.
pub fn skipped_extension(url: &Url) -> Option<&'static str> {
    let segment = url.path().rsplit('/').next().unwrap_or("").to_ascii_lowercase();
    SKIPPED_EXTENSIONS.iter().copied().find(|ext| {
        segment.len() > ext.len() + 1
            && segment.ends_with(ext)
            && segment.as_bytes()[segment.len() - ext.len() - 1] == b'.'
    })
}

/// Resolves an `href` value against the page it was found on
///
/// The fragment suffix is cut off before resolution. The link is rejected
/// when:
/// - it is empty or fragment-only
/// - it uses a non-navigational scheme (`javascript:`, `mailto:`, `tel:`, `data:`, ...)
/// - joining it onto `base_url` fails
/// - its path names a non-HTML file type from [`SKIPPED_EXTENSIONS`]
/// - the absolute URL is `max_len` characters or longer
///
/// # Examples
///
/// ```
/// use url::Url;
/// use webindex::url::resolve_link;
///
/// let base = Url::parse("https://example.com/wiki/Main").unwrap();
/// let link = resolve_link("Other#History", &base, 256).unwrap();
/// assert_eq!(link, "https://example.com/wiki/Other");
/// ```
pub fn resolve_link(href: &str, base_url: &Url, max_len: usize) -> UrlResult<String> {
    let href = match href.find('#') {
        Some(pos) => &href[..pos],
        None => href,
    };
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Parse("empty link".to_string()));
    }

    let absolute = base_url
        .join(href)
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return Err(UrlError::InvalidScheme(absolute.scheme().to_string()));
    }

    if absolute.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    if let Some(ext) = skipped_extension(&absolute) {
        return Err(UrlError::SkippedExtension(ext.to_string()));
    }

    let absolute = absolute.to_string();
    if absolute.len() >= max_len {
        return Err(UrlError::TooLong { max: max_len });
    }

    Ok(absolute)
}
