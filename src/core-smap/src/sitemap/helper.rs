//! Collects the sitemap records of the route table and normalizes them.

use chrono::{DateTime, FixedOffset, Utc};
use data_model_smap::RouteRecord;
use tracing::debug;

use crate::config::{DefaultValues, TranslationConfig};
use crate::errors::{Result, SitemapError};
use crate::routing::{AttributeLookup, LOCALE_PARAMETER, Router};
use crate::sitemap::parser::RouteParser;

/// Finds the routes that belong in the sitemap and completes their records.
pub struct SitemapHelper<'a> {
    router: &'a dyn Router,
    attributes: &'a dyn AttributeLookup,
    defaults: DefaultValues,
    translation: TranslationConfig,
    now: Option<DateTime<FixedOffset>>,
}

impl<'a> SitemapHelper<'a> {
    pub fn new(
        router: &'a dyn Router,
        attributes: &'a dyn AttributeLookup,
        defaults: DefaultValues,
        translation: TranslationConfig,
    ) -> Self {
        Self {
            router,
            attributes,
            defaults,
            translation,
            now: None,
        }
    }

    /// Fixes the instant used for records without `lastmod` (the current time otherwise).
    pub fn with_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    /// Parses every route of the route table, in declaration order, keeping those in the sitemap.
    pub fn find_static_routes(&self) -> Result<Vec<RouteRecord>> {
        let parser = RouteParser::new(self.attributes);
        let mut records = Vec::new();
        for (name, route) in self.router.route_collection().iter() {
            if let Some(record) = parser.parse(name, route)? {
                records.push(record);
            }
        }
        debug!("Found {} static routes for the sitemap", records.len());
        Ok(records)
    }

    /// Resolves URLs and alternates, then fills every unset field with its default.
    /// Fields already set are left as they are.
    pub fn normalize_routes(&self, mut records: Vec<RouteRecord>) -> Result<Vec<RouteRecord>> {
        let now = self.now.unwrap_or_else(|| Utc::now().fixed_offset());
        for record in records.iter_mut() {
            self.generate_urls(record)?;

            if record.last_modified().is_none() {
                record.set_last_modified(now);
            }
            if record.change_frequency().is_none() {
                record.set_change_frequency(self.defaults.change_freq);
            }
            if record.priority().is_none() {
                record.set_priority(f64::from(self.defaults.priority))?;
            }
        }
        Ok(records)
    }

    /// Sets the record's URL. Localized routes get one URL per locale: the default locale's URL is
    /// the primary one, and every locale (the default included) becomes an alternate.
    pub fn generate_urls(&self, record: &mut RouteRecord) -> Result<()> {
        let name = record.route_name().to_string();
        let route = self
            .router
            .route_collection()
            .get(&name)
            .ok_or_else(|| SitemapError::UnknownRoute(name.clone()))?;

        if !route.is_localized() {
            let url = self.router.generate(&name, record.route_parameters())?;
            record.set_url(url);
            return Ok(());
        }

        if !self.translation.enabled {
            return Err(SitemapError::TranslationNotEnabled(name));
        }

        let mut parameters = record.route_parameters().clone();
        let mut primary = None;
        for locale in self.translation.all_locales() {
            parameters.insert(LOCALE_PARAMETER.to_string(), locale.to_string());
            let url = self.router.generate(&name, &parameters)?;
            record.add_alternate(locale.as_ref(), url.as_str());
            primary.get_or_insert(url);
        }
        if let Some(url) = primary {
            record.set_url(url);
        }
        Ok(())
    }
}
