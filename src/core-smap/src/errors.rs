//! Error types for sitemap.xml / robots.txt generation.

use std::path::PathBuf;

use data_model_smap::ModelError;
use thiserror::Error;

/// Longest excerpt of an offending value quoted in an error message.
const MAX_QUOTED_CHARS: usize = 100;

/// Main error type for sitemap.xml / robots.txt generation.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// A model value (priority, change frequency, user agent, locale) is invalid.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// An inline route option or handler attribute has the wrong shape.
    #[error("The route {route} {option} option {message}")]
    InvalidOption {
        route: String,
        option: &'static str,
        message: String,
    },

    /// The `lastmod` value cannot be read as a date.
    #[error("The route {route} has an invalid value \"{value}\" specified for the \"lastmod\" option")]
    InvalidLastMod { route: String, value: String },

    /// A URL about to be written is malformed, not http(s) or has no host.
    #[error("Invalid URL for {context}: {reason} (\"{value}\")")]
    InvalidUrl {
        context: String,
        reason: String,
        value: String,
    },

    /// A record reached serialization without a URL.
    #[error("Route {0} has no URL, it must be normalized before creating the sitemap")]
    MissingUrl(String),

    /// A record reached serialization with a field still unset.
    #[error("Route {route} has no {field}, it must be normalized before creating the sitemap")]
    IncompleteRecord { route: String, field: &'static str },

    #[error(
        "Sitemap contains {count} URLs, but the maximum allowed is {max}. Consider splitting into multiple sitemaps."
    )]
    TooManyUrls { count: usize, max: usize },

    #[error(
        "Sitemap size is {size_mb:.2} MB, but the maximum allowed is 50 MB. Consider splitting into multiple sitemaps."
    )]
    TooLarge { size_bytes: usize, size_mb: f64 },

    /// A route path contains `{_locale}` but translation is disabled in the sitemap configuration.
    #[error("Translation not enabled, but localized routes found ({0})")]
    TranslationNotEnabled(String),

    /// A robots.txt path contains `{_locale}` but translation is disabled in the robots configuration.
    #[error("Translation not enabled for robots.txt, but localized paths found ({0})")]
    RobotsTranslationNotEnabled(String),

    /// The computed output path has no file name.
    #[error("Filename for {0} is missing")]
    FilenameMissing(&'static str),

    /// Writing the generated file failed.
    #[error("Cannot write {}: {source}", .path.display())]
    CannotWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown route \"{0}\"")]
    UnknownRoute(String),

    #[error("Missing parameter \"{parameter}\" to generate a URL for route \"{route}\"")]
    MissingRouteParameter { route: String, parameter: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("XML serialization failed: {0}")]
    Xml(String),

    /// Configuration or route table file cannot be read or parsed.
    #[error("Invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// Another generation run holds the lock.
    #[error("The command is already running in another process (lock {})", .0.display())]
    AlreadyRunning(PathBuf),

    #[error("Cannot acquire lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SitemapError {
    pub fn too_large(size_bytes: usize) -> Self {
        let size_mb = (size_bytes as f64 / 1024.0 / 1024.0 * 100.0).round() / 100.0;
        SitemapError::TooLarge { size_bytes, size_mb }
    }

    pub fn invalid_url(context: impl Into<String>, reason: impl Into<String>, value: &str) -> Self {
        SitemapError::InvalidUrl {
            context: context.into(),
            reason: reason.into(),
            value: quote_excerpt(value),
        }
    }

    pub fn cannot_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SitemapError::CannotWrite {
            path: path.into(),
            source,
        }
    }
}

/// At most [`MAX_QUOTED_CHARS`] characters of `value`, with `...` appended when cut.
fn quote_excerpt(value: &str) -> String {
    match value.char_indices().nth(MAX_QUOTED_CHARS) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

/// Type alias for Result with SitemapError
pub type Result<T> = std::result::Result<T, SitemapError>;
