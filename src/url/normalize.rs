use crate::{UrlError, UrlResult};
use url::Url;

/// Canonicalizes an absolute URL into the form the frontier stores
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Accept only HTTP and HTTPS schemes
/// 3. Require a host
/// 4. Remove fragment (everything after #)
///
/// Parsing already lowercases the host, resolves dot segments and turns an
/// empty path into `/`. Query strings and trailing slashes are kept as-is, so
/// `/page` and `/page/` remain distinct frontier entries.
///
/// # Examples
///
/// ```
/// use webindex::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}
