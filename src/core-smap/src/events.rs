//! Extension points for the host application: entries that have no static route configuration.
//!
//! Providers are registered on the creators and called once per run, in registration order,
//! after the route table has been collected.

use data_model_smap::{RobotsRecord, RouteRecord};

use crate::errors::Result;

/// Sitemap entries added by providers.
#[derive(Debug, Default)]
pub struct DynamicRoutes {
    urls: Vec<RouteRecord>,
}

impl DynamicRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_url(&mut self, record: RouteRecord) -> &mut Self {
        self.urls.push(record);
        self
    }

    pub fn urls(&self) -> &[RouteRecord] {
        &self.urls
    }

    pub fn into_urls(self) -> Vec<RouteRecord> {
        self.urls
    }
}

/// robots.txt rules added by providers.
#[derive(Debug, Default)]
pub struct RobotsRules {
    rules: Vec<RobotsRecord>,
}

impl RobotsRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `Allow: <path>` for each user agent (`*` when `user_agents` is empty).
    pub fn add_allow_user_agents<S: AsRef<str>>(&mut self, path: &str, user_agents: &[S]) -> Result<&mut Self> {
        self.rules.push(RobotsRecord::allow_rule(path, user_agents)?);
        Ok(self)
    }

    /// Adds `Disallow: <path>` for each user agent (`*` when `user_agents` is empty).
    pub fn add_disallow_user_agents<S: AsRef<str>>(&mut self, path: &str, user_agents: &[S]) -> Result<&mut Self> {
        self.rules.push(RobotsRecord::disallow_rule(path, user_agents)?);
        Ok(self)
    }

    pub fn rules(&self) -> &[RobotsRecord] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<RobotsRecord> {
        self.rules
    }
}

/// Supplies sitemap entries for dynamically generated pages.
pub trait DynamicRoutesProvider {
    fn add_dynamic_routes(&self, routes: &mut DynamicRoutes) -> Result<()>;
}

impl<F> DynamicRoutesProvider for F
where
    F: Fn(&mut DynamicRoutes) -> Result<()>,
{
    fn add_dynamic_routes(&self, routes: &mut DynamicRoutes) -> Result<()> {
        self(routes)
    }
}

/// Supplies robots.txt rules that no route declares.
pub trait RobotsRulesProvider {
    fn add_robots_rules(&self, rules: &mut RobotsRules) -> Result<()>;
}

impl<F> RobotsRulesProvider for F
where
    F: Fn(&mut RobotsRules) -> Result<()>,
{
    fn add_robots_rules(&self, rules: &mut RobotsRules) -> Result<()> {
        self(rules)
    }
}
