//! The application's route table and URL generation.

pub mod handlers;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use data_model_smap::InlineOption;
use serde::Deserialize;
use url::Url;

use crate::errors::{Result, SitemapError};
pub use handlers::{AttributeLookup, HandlerAttributes, HandlerRegistry, NO_HANDLERS};

/// Path placeholder replaced by the locale code when translation is enabled.
pub const LOCALE_PLACEHOLDER: &str = "{_locale}";

/// Route parameter carrying the locale code.
pub const LOCALE_PARAMETER: &str = "_locale";

/// Inline options of a route recognized by the parsers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouteOptions {
    pub sitemap: Option<InlineOption>,
    pub robots_txt: Option<InlineOption>,
}

/// A path pattern bound to a handler.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Route {
    /// Path pattern, e.g. `/blog/{slug}` or `/{_locale}/about`.
    pub path: String,
    /// Handler reference, `"Type::method"`.
    #[serde(default)]
    pub controller: Option<String>,
    #[serde(default)]
    pub options: RouteOptions,
    /// Values used for path placeholders the caller does not supply.
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    pub fn with_sitemap_option(mut self, option: impl Into<InlineOption>) -> Self {
        self.options.sitemap = Some(option.into());
        self
    }

    pub fn with_robots_option(mut self, option: impl Into<InlineOption>) -> Self {
        self.options.robots_txt = Some(option.into());
        self
    }

    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn is_localized(&self) -> bool {
        self.path.contains(LOCALE_PLACEHOLDER)
    }
}

/// A route as listed in a route table file: its name beside the route fields.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRoute {
    pub name: String,
    #[serde(flatten)]
    pub route: Route,
}

/// Named routes in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<NamedRoute>")]
pub struct RouteCollection {
    routes: Vec<(String, Route)>,
}

impl From<Vec<NamedRoute>> for RouteCollection {
    fn from(named: Vec<NamedRoute>) -> Self {
        let mut collection = RouteCollection::new();
        for NamedRoute { name, route } in named {
            collection.add(name, route);
        }
        collection
    }
}

impl RouteCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route. A route with the same name is replaced in place.
    pub fn add(&mut self, name: impl Into<String>, route: Route) -> &mut Self {
        let name = name.into();
        match self.routes.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = route,
            None => self.routes.push((name, route)),
        }
        self
    }

    pub fn with(mut self, name: impl Into<String>, route: Route) -> Self {
        self.add(name, route);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|(n, _)| n == name).map(|(_, route)| route)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Route)> {
        self.routes.iter().map(|(name, route)| (name.as_str(), route))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// The application's router: the route table, and absolute URL generation for its routes.
pub trait Router {
    fn route_collection(&self) -> &RouteCollection;

    /// Absolute URL of route `name` with the given parameters.
    fn generate(&self, name: &str, parameters: &BTreeMap<String, String>) -> Result<String>;
}

/// A [`Router`] over a fixed route collection served under one base URL.
#[derive(Debug, Clone)]
pub struct RouteTable {
    base_url: Url,
    routes: RouteCollection,
    handlers: HandlerRegistry,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteManifest {
    base_url: String,
    #[serde(default)]
    routes: RouteCollection,
    #[serde(default)]
    handlers: HandlerRegistry,
}

impl RouteTable {
    pub fn new(base_url: &str, routes: RouteCollection) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            routes,
            handlers: HandlerRegistry::new(),
        })
    }

    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Reads a route table file: `{"base_url": ..., "routes": [...], "handlers": {...}}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config_error = |message: String| SitemapError::Config {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let manifest: RouteManifest = serde_json::from_str(&content).map_err(|e| config_error(e.to_string()))?;
        Ok(RouteTable::new(&manifest.base_url, manifest.routes)?.with_handlers(manifest.handlers))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }
}

impl Router for RouteTable {
    fn route_collection(&self) -> &RouteCollection {
        &self.routes
    }

    /// Placeholders are substituted from `parameters`, then from the route defaults. Parameters the
    /// path does not use are appended as a query string.
    fn generate(&self, name: &str, parameters: &BTreeMap<String, String>) -> Result<String> {
        let route = self
            .routes
            .get(name)
            .ok_or_else(|| SitemapError::UnknownRoute(name.to_string()))?;

        let mut used = BTreeSet::new();
        let mut path = String::with_capacity(route.path.len());
        let mut rest = route.path.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|c| open + c) else {
                break;
            };
            let placeholder = &rest[open + 1..close];
            let value = parameters
                .get(placeholder)
                .or_else(|| route.defaults.get(placeholder))
                .ok_or_else(|| SitemapError::MissingRouteParameter {
                    route: name.to_string(),
                    parameter: placeholder.to_string(),
                })?;
            path.push_str(&rest[..open]);
            path.push_str(value);
            used.insert(placeholder);
            rest = &rest[close + 1..];
        }
        path.push_str(rest);

        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}/{}", path.trim_start_matches('/')));
        url.set_query(None);
        url.set_fragment(None);

        let mut extra = parameters
            .iter()
            .filter(|(key, _)| !used.contains(key.as_str()))
            .peekable();
        if extra.peek().is_some() {
            url.query_pairs_mut().extend_pairs(extra);
        }
        Ok(url.to_string())
    }
}

impl AttributeLookup for RouteTable {
    fn sitemap_attribute(&self, controller: &str) -> Option<&data_model_smap::SitemapAttribute> {
        self.handlers.sitemap_attribute(controller)
    }

    fn robots_attribute(&self, controller: &str) -> Option<&data_model_smap::RobotsAttribute> {
        self.handlers.robots_attribute(controller)
    }
}
