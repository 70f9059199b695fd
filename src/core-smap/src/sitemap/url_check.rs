//! URL validation before serialization.

use url::Url;

use crate::errors::{Result, SitemapError};

/// Schemes a sitemap may reference.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Checks that `value` is an absolute http(s) URL with a host.
///
/// `context` names the record (and locale) in the error message.
///
/// # Examples
///
/// ```
/// # use core_smap::sitemap::url_check::validate_url;
/// assert!(validate_url("https://example.com/docs?a=1&b=2", "route docs").is_ok());
/// assert!(validate_url("javascript:alert(1)", "route docs").is_err());
/// assert!(validate_url("/relative/path", "route docs").is_err());
/// ```
pub fn validate_url(value: &str, context: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SitemapError::invalid_url(context, "empty URL", value));
    }
    if value.chars().any(|c| c.is_control()) {
        return Err(SitemapError::invalid_url(context, "control characters in URL", value));
    }

    let url = Url::parse(value)
        .map_err(|e| SitemapError::invalid_url(context, format!("malformed or relative URL ({e})"), value))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(SitemapError::invalid_url(
            context,
            format!("scheme \"{}\" is not allowed, only http and https", url.scheme()),
            value,
        ));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(SitemapError::invalid_url(context, "missing host", value));
    }
    Ok(())
}
