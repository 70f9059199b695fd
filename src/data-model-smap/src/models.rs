use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Priority assumed by search engines when a `<url>` entry has none.
pub const DEFAULT_PRIORITY: f64 = 0.5;

/// The user agent matching every crawler.
pub const WILDCARD_USER_AGENT: &str = "*";

// ChangeFreq enum
/// How frequently the content behind a URL is likely to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// The lowercase text written into `<changefreq>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFreq {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ChangeFreq::Always),
            "hourly" => Ok(ChangeFreq::Hourly),
            "daily" => Ok(ChangeFreq::Daily),
            "weekly" => Ok(ChangeFreq::Weekly),
            "monthly" => Ok(ChangeFreq::Monthly),
            "yearly" => Ok(ChangeFreq::Yearly),
            "never" => Ok(ChangeFreq::Never),
            _ => Err(ModelError::UnknownChangeFreq(s.to_string())),
        }
    }
}

fn is_valid_priority(value: &f64) -> bool {
    (0.0..=1.0).contains(value)
}

newtype_valid!(
    /// Relative importance of a URL within the site, between 0.0 and 1.0.
    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
    #[serde(try_from = "f64", into = "f64")]
    Priority,
    f64,
    is_valid_priority,
    ModelError,
    |p: &f64| ModelError::InvalidPriority(*p)
);

impl Priority {
    /// True when this priority is the one search engines assume anyway.
    pub fn is_default(&self) -> bool {
        (self.0 - DEFAULT_PRIORITY).abs() < f64::EPSILON
    }
}

impl TryFrom<f64> for Priority {
    type Error = ModelError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Priority::new(value)
    }
}

impl From<Priority> for f64 {
    fn from(priority: Priority) -> Self {
        priority.extract()
    }
}

#[allow(clippy::ptr_arg)]
fn is_valid_locale(value: &String) -> bool {
    !value.is_empty()
        && value.len() <= 35
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

newtype_valid!(
    /// A locale code such as `en`, `de` or `pt_BR`, substituted for `{_locale}` in route paths.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(try_from = "String", into = "String")]
    Locale,
    String,
    is_valid_locale,
    ModelError,
    |l: &String| ModelError::InvalidLocale(l.clone())
);

impl TryFrom<String> for Locale {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::new(value.trim().to_string())
    }
}

impl TryFrom<&str> for Locale {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Locale::new(value.trim().to_string())
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.extract()
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One candidate `<url>` entry of sitemap.xml.
///
/// Created by the route parser (or a dynamic routes provider) with only the fields the
/// route declares. The normalizer fills in the URL, alternates and any unset field.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    route_name: String,
    url: Option<String>,
    last_modified: Option<DateTime<FixedOffset>>,
    priority: Option<Priority>,
    change_frequency: Option<ChangeFreq>,
    route_parameters: BTreeMap<String, String>,
    alternates: Vec<(String, String)>,
}

impl RouteRecord {
    pub fn new(route_name: impl Into<String>) -> Self {
        Self {
            route_name: route_name.into(),
            url: None,
            last_modified: None,
            priority: None,
            change_frequency: None,
            route_parameters: BTreeMap::new(),
            alternates: Vec::new(),
        }
    }

    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.set_url(url);
        self
    }

    pub fn last_modified(&self) -> Option<&DateTime<FixedOffset>> {
        self.last_modified.as_ref()
    }

    /// `<lastmod>` text: RFC 3339 with seconds precision and a numeric offset, e.g. `2024-12-09T00:00:00+00:00`.
    pub fn last_modified_w3c(&self) -> Option<String> {
        self.last_modified
            .map(|lastmod| lastmod.to_rfc3339_opts(SecondsFormat::Secs, false))
    }

    pub fn set_last_modified(&mut self, last_modified: DateTime<FixedOffset>) -> &mut Self {
        self.last_modified = Some(last_modified);
        self
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<FixedOffset>) -> Self {
        self.set_last_modified(last_modified);
        self
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Rejects values outside [0.0, 1.0] and leaves the record untouched in that case.
    pub fn set_priority(&mut self, priority: f64) -> Result<&mut Self, ModelError> {
        self.priority = Some(Priority::new(priority)?);
        Ok(self)
    }

    pub fn with_priority(mut self, priority: f64) -> Result<Self, ModelError> {
        self.set_priority(priority)?;
        Ok(self)
    }

    pub fn change_frequency(&self) -> Option<ChangeFreq> {
        self.change_frequency
    }

    pub fn set_change_frequency(&mut self, change_frequency: ChangeFreq) -> &mut Self {
        self.change_frequency = Some(change_frequency);
        self
    }

    pub fn with_change_frequency(mut self, change_frequency: ChangeFreq) -> Self {
        self.set_change_frequency(change_frequency);
        self
    }

    pub fn route_parameters(&self) -> &BTreeMap<String, String> {
        &self.route_parameters
    }

    pub fn with_route_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.route_parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_route_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.route_parameters = parameters;
        self
    }

    /// Locale code -> absolute URL, in insertion order.
    pub fn alternates(&self) -> &[(String, String)] {
        &self.alternates
    }

    /// Adds (or replaces) the alternate URL for a locale.
    pub fn add_alternate(&mut self, locale: impl Into<String>, url: impl Into<String>) {
        let locale = locale.into();
        let url = url.into();
        match self.alternates.iter_mut().find(|(l, _)| *l == locale) {
            Some(existing) => existing.1 = url,
            None => self.alternates.push((locale, url)),
        }
    }
}

/// One allow and/or disallow directive source for robots.txt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsRecord {
    name: String,
    allow: bool,
    disallow: bool,
    allow_list: Vec<String>,
    disallow_list: Vec<String>,
    path: String,
}

impl RobotsRecord {
    /// A record that neither allows nor disallows yet; both user-agent lists start as `["*"]`.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allow: false,
            disallow: false,
            allow_list: vec![WILDCARD_USER_AGENT.to_string()],
            disallow_list: vec![WILDCARD_USER_AGENT.to_string()],
            path: path.into(),
        }
    }

    /// An `Allow:` rule for `path`, named after the path itself.
    pub fn allow_rule<S: AsRef<str>>(path: &str, user_agents: &[S]) -> Result<Self, ModelError> {
        check_robots_path(path)?;
        let mut record = RobotsRecord::new(path, path);
        record.set_allow(true).set_allow_list(user_agents)?;
        Ok(record)
    }

    /// A `Disallow:` rule for `path`, named after the path itself.
    pub fn disallow_rule<S: AsRef<str>>(path: &str, user_agents: &[S]) -> Result<Self, ModelError> {
        check_robots_path(path)?;
        let mut record = RobotsRecord::new(path, path);
        record.set_disallow(true).set_disallow_list(user_agents)?;
        Ok(record)
    }

    /// Route name for parsed routes, or the path for rules added by a provider.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn allow(&self) -> bool {
        self.allow
    }

    pub fn disallow(&self) -> bool {
        self.disallow
    }

    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    pub fn disallow_list(&self) -> &[String] {
        &self.disallow_list
    }

    pub fn set_allow(&mut self, allow: bool) -> &mut Self {
        self.allow = allow;
        self
    }

    pub fn set_disallow(&mut self, disallow: bool) -> &mut Self {
        self.disallow = disallow;
        self
    }

    /// Replaces the allow user agents. An empty slice keeps the `["*"]` default.
    pub fn set_allow_list<S: AsRef<str>>(&mut self, user_agents: &[S]) -> Result<&mut Self, ModelError> {
        self.allow_list = user_agent_set(user_agents)?;
        Ok(self)
    }

    /// Replaces the disallow user agents. An empty slice keeps the `["*"]` default.
    pub fn set_disallow_list<S: AsRef<str>>(&mut self, user_agents: &[S]) -> Result<&mut Self, ModelError> {
        self.disallow_list = user_agent_set(user_agents)?;
        Ok(self)
    }
}

/// Fails when `path` holds a control character (a line break would start a new directive).
pub fn check_robots_path(path: &str) -> Result<(), ModelError> {
    if path.chars().any(char::is_control) {
        return Err(ModelError::InvalidRobotsPath(path.to_string()));
    }
    Ok(())
}

/// Trims and deduplicates user agents, keeping first-seen order.
fn user_agent_set<S: AsRef<str>>(user_agents: &[S]) -> Result<Vec<String>, ModelError> {
    let mut set: Vec<String> = Vec::with_capacity(user_agents.len());
    for agent in user_agents {
        let agent = agent.as_ref().trim();
        if agent.is_empty() || agent.chars().any(char::is_control) {
            return Err(ModelError::InvalidUserAgent(agent.to_string()));
        }
        if !set.iter().any(|a| a == agent) {
            set.push(agent.to_string());
        }
    }
    if set.is_empty() {
        set.push(WILDCARD_USER_AGENT.to_string());
    }
    Ok(set)
}
