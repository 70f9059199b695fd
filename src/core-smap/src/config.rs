//! Configuration options for sitemap.xml and robots.txt generation.

use std::path::{Path, PathBuf};

use data_model_smap::{ChangeFreq, Locale, Priority};
use serde::{Deserialize, Deserializer};

use crate::errors::{Result, SitemapError};

/// The whole operator-facing configuration, usually read from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    pub sitemap: SitemapConfig,
    pub robots: RobotsConfig,
}

impl BundleConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SitemapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| SitemapError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Values used for sitemap fields a route leaves unset.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultValues {
    /// Change frequency for routes without one (default: weekly).
    pub change_freq: ChangeFreq,
    /// Priority for routes without one (default: 0.5).
    pub priority: Priority,
}

impl Default for DefaultValues {
    fn default() -> Self {
        Self {
            change_freq: ChangeFreq::Weekly,
            priority: default_priority(),
        }
    }
}

fn default_priority() -> Priority {
    match Priority::new(data_model_smap::DEFAULT_PRIORITY) {
        Ok(priority) => priority,
        Err(_) => unreachable!("the default priority is within [0.0, 1.0]"),
    }
}

/// Configuration of sitemap.xml generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SitemapConfig {
    pub default_values: DefaultValues,
    /// Directory the sitemap is written to (default: `public`).
    pub sitemap_directory: PathBuf,
    /// File name of the sitemap (default: `sitemap.xml`).
    pub sitemap_filename: String,
    pub translation: TranslationConfig,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            default_values: DefaultValues::default(),
            sitemap_directory: PathBuf::from("public"),
            sitemap_filename: "sitemap.xml".to_string(),
            translation: TranslationConfig::default(),
        }
    }
}

impl SitemapConfig {
    /// Creates a new builder for SitemapConfig.
    pub fn builder() -> SitemapConfigBuilder {
        SitemapConfigBuilder::default()
    }
}

/// Builder for SitemapConfig.
#[derive(Debug, Clone, Default)]
pub struct SitemapConfigBuilder {
    change_freq: Option<ChangeFreq>,
    priority: Option<f64>,
    sitemap_directory: Option<PathBuf>,
    sitemap_filename: Option<String>,
    translation: Option<TranslationConfig>,
}

impl SitemapConfigBuilder {
    /// Sets the default change frequency.
    pub fn change_freq(mut self, change_freq: ChangeFreq) -> Self {
        self.change_freq = Some(change_freq);
        self
    }

    /// Sets the default priority. Validated by [`SitemapConfigBuilder::build`].
    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the output directory.
    pub fn sitemap_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.sitemap_directory = Some(directory.into());
        self
    }

    /// Sets the output file name.
    pub fn sitemap_filename(mut self, filename: impl Into<String>) -> Self {
        self.sitemap_filename = Some(filename.into());
        self
    }

    /// Sets the translation (alternate locale) settings.
    pub fn translation(mut self, translation: TranslationConfig) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Builds the SitemapConfig. Fails if the default priority is outside [0.0, 1.0].
    pub fn build(self) -> Result<SitemapConfig> {
        let defaults = SitemapConfig::default();
        let priority = match self.priority {
            Some(p) => Priority::new(p)?,
            None => defaults.default_values.priority,
        };
        Ok(SitemapConfig {
            default_values: DefaultValues {
                change_freq: self.change_freq.unwrap_or(defaults.default_values.change_freq),
                priority,
            },
            sitemap_directory: self.sitemap_directory.unwrap_or(defaults.sitemap_directory),
            sitemap_filename: self.sitemap_filename.unwrap_or(defaults.sitemap_filename),
            translation: self.translation.unwrap_or(defaults.translation),
        })
    }
}

/// Configuration of robots.txt generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RobotsConfig {
    /// Directory robots.txt is written to (default: `public`).
    pub robots_directory: PathBuf,
    /// File name of robots.txt (default: `robots.txt`).
    pub robots_filename: String,
    /// Full URL of the sitemap, announced with a `Sitemap:` line when set.
    pub sitemap_url: Option<String>,
    pub translation: TranslationConfig,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            robots_directory: PathBuf::from("public"),
            robots_filename: "robots.txt".to_string(),
            sitemap_url: None,
            translation: TranslationConfig::default(),
        }
    }
}

/// Whether routes with a `{_locale}` placeholder are expanded, and into which locales.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationConfig {
    pub enabled: bool,
    /// Locale of the primary URL (default: `en`).
    pub default_locale: Locale,
    /// Alternate locales. Accepts a list or a comma-separated string.
    #[serde(deserialize_with = "locales_from_list_or_csv")]
    pub locales: Vec<Locale>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_locale: default_locale(),
            locales: Vec::new(),
        }
    }
}

fn default_locale() -> Locale {
    match Locale::try_from("en") {
        Ok(locale) => locale,
        Err(_) => unreachable!("\"en\" is a valid locale"),
    }
}

impl TranslationConfig {
    /// Translation enabled with the given default and alternate locales.
    pub fn enabled<S: AsRef<str>>(default_locale: &str, locales: &[S]) -> Result<Self> {
        Ok(Self {
            enabled: true,
            default_locale: Locale::try_from(default_locale)?,
            locales: locales
                .iter()
                .map(|l| Locale::try_from(l.as_ref()))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        })
    }

    /// The default locale followed by every alternate locale, without duplicates.
    pub fn all_locales(&self) -> Vec<&Locale> {
        let mut all = vec![&self.default_locale];
        for locale in &self.locales {
            if !all.contains(&locale) {
                all.push(locale);
            }
        }
        all
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    List(Vec<String>),
    Csv(String),
}

fn locales_from_list_or_csv<'de, D>(deserializer: D) -> std::result::Result<Vec<Locale>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(list) => list,
        ListOrCsv::Csv(csv) => csv.split(',').map(str::to_string).collect(),
    };
    raw.into_iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| Locale::try_from(l).map_err(serde::de::Error::custom))
        .collect()
}
