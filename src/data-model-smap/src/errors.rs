//! Validation errors raised while building model values.

use thiserror::Error;

/// Errors raised when a model value is constructed from invalid input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Priority outside of the closed range [0.0, 1.0].
    #[error("Priority must be between 0.0 and 1.0, got {0}")]
    InvalidPriority(f64),

    /// Not one of always, hourly, daily, weekly, monthly, yearly, never.
    #[error("Unknown change frequency \"{0}\"")]
    UnknownChangeFreq(String),

    /// User agents must be non-empty strings without control characters.
    #[error("User agent must be a non-empty string without control characters, got {0:?}")]
    InvalidUserAgent(String),

    /// robots.txt paths are written on a single line.
    #[error("robots.txt path must not contain control characters, got {0:?}")]
    InvalidRobotsPath(String),

    /// Locales are short language/region codes such as `en` or `de-CH`.
    #[error("Invalid locale \"{0}\"")]
    InvalidLocale(String),

    /// An inline route option that is neither a boolean (or boolean-like) nor a mapping.
    #[error("must be of type \"boolean\" or \"mapping\", got \"{0}\"")]
    NotBooleanOrMapping(String),
}
