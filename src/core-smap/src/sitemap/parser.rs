//! Reads the sitemap configuration of one route.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use data_model_smap::{ChangeFreq, Coerced, RouteRecord};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{Result, SitemapError};
use crate::routing::{AttributeLookup, Route};

const OPTION: &str = "sitemap";

/// Date-time layouts with a numeric offset that RFC 3339 rejects (`+0200`).
const OFFSET_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive date-time layouts accepted for `lastmod`, read as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts accepted for `lastmod`, read as UTC midnight.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Turns a route's inline `sitemap` option, or its handler's sitemap attribute, into a record.
pub struct RouteParser<'a> {
    attributes: &'a dyn AttributeLookup,
}

impl<'a> RouteParser<'a> {
    pub fn new(attributes: &'a dyn AttributeLookup) -> Self {
        Self { attributes }
    }

    /// `Ok(None)` when the route is not part of the sitemap.
    ///
    /// The inline option wins over the handler attribute; the attribute is not looked up at all
    /// when the inline option is present.
    pub fn parse(&self, name: &str, route: &Route) -> Result<Option<RouteRecord>> {
        let coerced = match &route.options.sitemap {
            Some(inline) => {
                warn!(
                    "Using route option \"sitemap\" for route \"{name}\" is deprecated, register a sitemap attribute for its handler instead"
                );
                inline.coerce().map_err(|e| SitemapError::InvalidOption {
                    route: name.to_string(),
                    option: OPTION,
                    message: e.to_string(),
                })?
            }
            None => match route
                .controller
                .as_deref()
                .and_then(|controller| self.attributes.sitemap_attribute(controller))
            {
                Some(attribute) => attribute.to_coerced(),
                None => return Ok(None),
            },
        };

        let record = match coerced {
            Coerced::Disabled => None,
            Coerced::Enabled => Some(RouteRecord::new(name)),
            Coerced::Detailed(options) => Some(record_from_options(name, &options)?),
        };
        debug!("Route {name}: {}", if record.is_some() { "in sitemap" } else { "skipped" });
        Ok(record)
    }
}

fn record_from_options(name: &str, options: &Map<String, Value>) -> Result<RouteRecord> {
    let mut record = RouteRecord::new(name);

    match options.get("lastmod") {
        None | Some(Value::Null) => {}
        Some(Value::String(text)) => {
            let lastmod = parse_lastmod(text).ok_or_else(|| SitemapError::InvalidLastMod {
                route: name.to_string(),
                value: text.clone(),
            })?;
            record.set_last_modified(lastmod);
        }
        Some(other) => {
            return Err(SitemapError::InvalidLastMod {
                route: name.to_string(),
                value: other.to_string(),
            });
        }
    }

    match options.get("changefreq") {
        None | Some(Value::Null) => {}
        Some(Value::String(text)) => {
            record.set_change_frequency(ChangeFreq::from_str(text)?);
        }
        Some(other) => return Err(invalid(name, format!("changefreq must be a string, got {other}"))),
    }

    match options.get("priority") {
        None | Some(Value::Null) => {}
        Some(Value::Number(number)) => {
            let priority = number
                .as_f64()
                .ok_or_else(|| invalid(name, format!("priority {number} is not a number")))?;
            record.set_priority(priority)?;
        }
        Some(Value::String(text)) => {
            let priority = text
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid(name, format!("priority \"{text}\" is not a number")))?;
            record.set_priority(priority)?;
        }
        Some(other) => return Err(invalid(name, format!("priority must be a number, got {other}"))),
    }

    Ok(record)
}

fn invalid(name: &str, message: String) -> SitemapError {
    SitemapError::InvalidOption {
        route: name.to_string(),
        option: OPTION,
        message,
    }
}

/// Reads a `lastmod` value: RFC 3339 or ISO 8601 (basic date, optional seconds and fraction,
/// offset with or without colon), a naive date-time or date (taken as UTC), or RFC 2822.
pub fn parse_lastmod(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed);
    }
    for format in OFFSET_DATE_TIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }
    let utc = |naive: NaiveDateTime| naive.and_utc().fixed_offset();
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(utc(naive));
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0).map(utc);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Some(parsed);
    }
    match text.to_ascii_lowercase().as_str() {
        "now" => Some(Utc::now().fixed_offset()),
        _ => None,
    }
}
