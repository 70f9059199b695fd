use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use tracing::info;

use crate::common::output::{output_path, write_output};
use crate::config::SitemapConfig;
use crate::errors::Result;
use crate::events::{DynamicRoutes, DynamicRoutesProvider};
use crate::routing::{AttributeLookup, NO_HANDLERS, Router};
use crate::sitemap::helper::SitemapHelper;
use crate::sitemap::xml;

/// Builds sitemap.xml: route table records, then provider records, normalized and rendered.
pub struct SitemapCreator<'a> {
    router: &'a dyn Router,
    attributes: &'a dyn AttributeLookup,
    config: SitemapConfig,
    providers: Vec<Box<dyn DynamicRoutesProvider + 'a>>,
    now: Option<DateTime<FixedOffset>>,
}

impl<'a> SitemapCreator<'a> {
    pub fn new(router: &'a dyn Router, config: SitemapConfig) -> Self {
        Self {
            router,
            attributes: &NO_HANDLERS,
            config,
            providers: Vec::new(),
            now: None,
        }
    }

    /// Where the handler attributes of the routes are looked up. None are found by default.
    pub fn with_attributes(mut self, attributes: &'a dyn AttributeLookup) -> Self {
        self.attributes = attributes;
        self
    }

    /// Registers a provider of dynamic routes. Providers run in registration order.
    pub fn with_provider(mut self, provider: impl DynamicRoutesProvider + 'a) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Fixes the instant used for records without `lastmod`.
    pub fn with_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn config(&self) -> &SitemapConfig {
        &self.config
    }

    /// Renders the sitemap. Returns the XML and the number of URLs in it.
    pub fn create(&self) -> Result<(String, usize)> {
        let mut helper = SitemapHelper::new(
            self.router,
            self.attributes,
            self.config.default_values,
            self.config.translation.clone(),
        );
        if let Some(now) = self.now {
            helper = helper.with_now(now);
        }

        let mut records = helper.find_static_routes()?;

        let mut dynamic = DynamicRoutes::new();
        for provider in &self.providers {
            provider.add_dynamic_routes(&mut dynamic)?;
        }
        records.extend(dynamic.into_urls());

        let count = records.len();
        let records = helper.normalize_routes(records)?;
        let xml = xml::create(&records, self.config.translation.enabled)?;
        Ok((xml, count))
    }

    /// Renders the sitemap and writes it to `directory`/`filename` (configured values when `None`),
    /// gzip-compressed when `gzip` is set. Returns the written path and the number of URLs.
    pub fn write_sitemap_xml(
        &self,
        directory: Option<&Path>,
        filename: Option<&str>,
        gzip: bool,
    ) -> Result<(PathBuf, usize)> {
        let directory = directory.unwrap_or(self.config.sitemap_directory.as_path());
        let filename = filename.unwrap_or(self.config.sitemap_filename.as_str());
        let path = output_path(directory, filename, "sitemap.xml")?;

        let (xml, count) = self.create()?;
        let written = write_output(&path, xml.as_bytes(), gzip)?;
        info!("{count} urls written in {}", written.display());
        Ok((written, count))
    }
}
