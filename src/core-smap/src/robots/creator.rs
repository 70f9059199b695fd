use std::path::{Path, PathBuf};

use tracing::info;

use crate::common::output::{output_path, write_atomic};
use crate::config::RobotsConfig;
use crate::errors::Result;
use crate::events::{RobotsRules, RobotsRulesProvider};
use crate::robots::helper::{RobotsHelper, create_robots_text};
use crate::routing::{AttributeLookup, NO_HANDLERS, Router};

/// Builds robots.txt: route table rules, then provider rules, grouped per user agent.
pub struct RobotsCreator<'a> {
    router: &'a dyn Router,
    attributes: &'a dyn AttributeLookup,
    config: RobotsConfig,
    providers: Vec<Box<dyn RobotsRulesProvider + 'a>>,
}

impl<'a> RobotsCreator<'a> {
    pub fn new(router: &'a dyn Router, config: RobotsConfig) -> Self {
        Self {
            router,
            attributes: &NO_HANDLERS,
            config,
            providers: Vec::new(),
        }
    }

    /// Where the handler attributes of the routes are looked up. None are found by default.
    pub fn with_attributes(mut self, attributes: &'a dyn AttributeLookup) -> Self {
        self.attributes = attributes;
        self
    }

    /// Registers a provider of robots.txt rules. Providers run in registration order.
    pub fn with_provider(mut self, provider: impl RobotsRulesProvider + 'a) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn config(&self) -> &RobotsConfig {
        &self.config
    }

    /// Renders robots.txt. Returns the text and the number of user agents in it.
    pub fn create(&self) -> Result<(String, usize)> {
        let helper = RobotsHelper::new(self.router, self.attributes, self.config.translation.clone());
        let mut records = helper.find_static_routes()?;

        let mut rules = RobotsRules::new();
        for provider in &self.providers {
            provider.add_robots_rules(&mut rules)?;
        }
        records.extend(rules.into_rules());

        let directives = helper.create_robots_directives(&records)?;
        Ok(create_robots_text(&directives, self.config.sitemap_url.as_deref()))
    }

    /// Renders robots.txt and writes it to `directory`/`filename` (configured values when `None`).
    /// Returns the written path and the number of user agents.
    pub fn write_robots_txt(&self, directory: Option<&Path>, filename: Option<&str>) -> Result<(PathBuf, usize)> {
        let directory = directory.unwrap_or(self.config.robots_directory.as_path());
        let filename = filename.unwrap_or(self.config.robots_filename.as_str());
        let path = output_path(directory, filename, "robots.txt")?;

        let (text, user_agents) = self.create()?;
        write_atomic(&path, text.as_bytes())?;
        info!("{user_agents} user agents written in {}", path.display());
        Ok((path, user_agents))
    }
}
