//! The handler attribute registry: declarative sitemap / robots.txt settings per route handler.

use std::collections::BTreeMap;

use data_model_smap::{RobotsAttribute, SitemapAttribute};
use serde::Deserialize;

/// Looks up the declarative attributes of a route handler (`"Type::method"`).
///
/// Unparsable handler references and unknown handlers yield `None`, never an error.
pub trait AttributeLookup {
    fn sitemap_attribute(&self, controller: &str) -> Option<&SitemapAttribute>;
    fn robots_attribute(&self, controller: &str) -> Option<&RobotsAttribute>;
}

/// Attributes declared on one handler.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerAttributes {
    pub sitemap: Option<SitemapAttribute>,
    pub robots: Option<RobotsAttribute>,
}

impl HandlerAttributes {
    pub fn sitemap(attribute: SitemapAttribute) -> Self {
        Self {
            sitemap: Some(attribute),
            robots: None,
        }
    }

    pub fn robots(attribute: RobotsAttribute) -> Self {
        Self {
            sitemap: None,
            robots: Some(attribute),
        }
    }
}

/// Registration table of handler attributes, keyed by `"Type::method"`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, HandlerAttributes>,
}

/// A registry without any handler.
pub static NO_HANDLERS: HandlerRegistry = HandlerRegistry::new();

impl HandlerRegistry {
    pub const fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registers (or replaces) the attributes of `handler`.
    pub fn register(&mut self, handler: impl Into<String>, attributes: HandlerAttributes) -> &mut Self {
        self.handlers.insert(handler.into(), attributes);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn get(&self, controller: &str) -> Option<&HandlerAttributes> {
        let (type_name, method) = parse_handler(controller)?;
        self.handlers.get(&format!("{type_name}::{method}"))
    }
}

impl AttributeLookup for HandlerRegistry {
    fn sitemap_attribute(&self, controller: &str) -> Option<&SitemapAttribute> {
        self.get(controller)?.sitemap.as_ref()
    }

    fn robots_attribute(&self, controller: &str) -> Option<&RobotsAttribute> {
        self.get(controller)?.robots.as_ref()
    }
}

/// Splits `"Type::method"` into its parts. The type may itself contain `::`.
pub fn parse_handler(controller: &str) -> Option<(&str, &str)> {
    let (type_name, method) = controller.trim().rsplit_once("::")?;
    if type_name.is_empty() || method.is_empty() {
        return None;
    }
    Some((type_name, method))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_handler() {
        assert_eq!(parse_handler("BlogController::show"), Some(("BlogController", "show")));
        assert_eq!(
            parse_handler("app::blog::BlogController::show"),
            Some(("app::blog::BlogController", "show"))
        );
        assert_eq!(parse_handler("BlogController"), None);
        assert_eq!(parse_handler("::show"), None);
        assert_eq!(parse_handler("BlogController::"), None);
    }

    #[test]
    fn test_lookup() {
        let mut registry = HandlerRegistry::new();
        registry.register(
            "BlogController::index",
            HandlerAttributes::sitemap(SitemapAttribute::new(Some(0.8), None, None, true).unwrap()),
        );

        let attribute = registry.sitemap_attribute(" BlogController::index ").unwrap();
        assert_eq!(attribute.priority().map(f64::from), Some(0.8));
        assert!(registry.robots_attribute("BlogController::index").is_none());
        assert!(registry.sitemap_attribute("BlogController::missing").is_none());
        assert!(registry.sitemap_attribute("not a handler").is_none());
        assert!(NO_HANDLERS.sitemap_attribute("BlogController::index").is_none());
    }

    #[test]
    fn test_deserialize() {
        let registry: HandlerRegistry = serde_json::from_value(json!({
            "BlogController::index": {"sitemap": {"changefreq": "daily"}},
            "AdminController::index": {"robots": {"allow": false, "user_agents": ["Googlebot"]}},
        }))
        .unwrap();

        assert_eq!(registry.len(), 2);
        let robots = registry.robots_attribute("AdminController::index").unwrap();
        assert!(!robots.allow());
        assert_eq!(robots.user_agents(), Some(&["Googlebot".to_string()][..]));
    }
}
