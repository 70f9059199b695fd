//! Collects robots.txt rules from the route table, groups them per user agent and renders the text.

use data_model_smap::{RobotsRecord, check_robots_path};
use tracing::debug;

use crate::config::TranslationConfig;
use crate::errors::{Result, SitemapError};
use crate::routing::{AttributeLookup, LOCALE_PLACEHOLDER, Router};
use crate::robots::parser::RobotsRouteParser;

/// The paths allowed and disallowed for one user agent, each in first-insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDirectives {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

impl AgentDirectives {
    fn new(user_agent: &str) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            allow: Vec::new(),
            disallow: Vec::new(),
        }
    }
}

fn push_unique(paths: &mut Vec<String>, path: String) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

/// Finds the routes with robots.txt rules and turns all rules into text.
pub struct RobotsHelper<'a> {
    router: &'a dyn Router,
    attributes: &'a dyn AttributeLookup,
    translation: TranslationConfig,
}

impl<'a> RobotsHelper<'a> {
    pub fn new(router: &'a dyn Router, attributes: &'a dyn AttributeLookup, translation: TranslationConfig) -> Self {
        Self {
            router,
            attributes,
            translation,
        }
    }

    /// Parses every route of the route table, in declaration order, keeping those with rules.
    pub fn find_static_routes(&self) -> Result<Vec<RobotsRecord>> {
        let parser = RobotsRouteParser::new(self.attributes);
        let mut records = Vec::new();
        for (name, route) in self.router.route_collection().iter() {
            if let Some(record) = parser.parse(name, route)? {
                records.push(record);
            }
        }
        debug!("Found {} static routes for robots.txt", records.len());
        Ok(records)
    }

    /// Groups the rules per user agent, in first-seen order. Localized paths are expanded into one
    /// path per locale (default locale first). Paths with control characters are rejected.
    pub fn create_robots_directives(&self, records: &[RobotsRecord]) -> Result<Vec<AgentDirectives>> {
        let mut directives: Vec<AgentDirectives> = Vec::new();
        for record in records {
            check_robots_path(record.path())?;
            let paths = self.expand_path(record)?;
            let mut register = |user_agent: &str, allow: bool| {
                let index = match directives.iter().position(|d| d.user_agent == user_agent) {
                    Some(index) => index,
                    None => {
                        directives.push(AgentDirectives::new(user_agent));
                        directives.len() - 1
                    }
                };
                let target = if allow {
                    &mut directives[index].allow
                } else {
                    &mut directives[index].disallow
                };
                for path in &paths {
                    push_unique(target, path.clone());
                }
            };

            if record.allow() {
                for user_agent in record.allow_list() {
                    register(user_agent, true);
                }
            }
            if record.disallow() {
                for user_agent in record.disallow_list() {
                    register(user_agent, false);
                }
            }
        }
        Ok(directives)
    }

    fn expand_path(&self, record: &RobotsRecord) -> Result<Vec<String>> {
        let path = record.path();
        if !path.contains(LOCALE_PLACEHOLDER) || !(record.allow() || record.disallow()) {
            return Ok(vec![path.to_string()]);
        }
        if !self.translation.enabled {
            return Err(SitemapError::RobotsTranslationNotEnabled(record.name().to_string()));
        }
        Ok(self
            .translation
            .all_locales()
            .into_iter()
            .map(|locale| path.replace(LOCALE_PLACEHOLDER, locale.as_ref()))
            .collect())
    }
}

/// Renders one `User-agent:` block per agent, followed by a `Sitemap:` line when `sitemap_url` is set.
/// Returns the text and the number of user agents.
pub fn create_robots_text(directives: &[AgentDirectives], sitemap_url: Option<&str>) -> (String, usize) {
    let mut text = String::new();
    for agent in directives {
        text.push_str(&format!("User-agent: {}\n", agent.user_agent));
        for path in &agent.allow {
            text.push_str(&format!("Allow: {path}\n"));
        }
        for path in &agent.disallow {
            text.push_str(&format!("Disallow: {path}\n"));
        }
        text.push('\n');
    }
    if let Some(url) = sitemap_url.map(str::trim).filter(|url| !url.is_empty()) {
        text.push_str(&format!("Sitemap: {url}\n"));
    }
    (text, directives.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{NO_HANDLERS, Route, RouteCollection, RouteTable};

    fn table() -> RouteTable {
        RouteTable::new("https://example.com", RouteCollection::new()).unwrap()
    }

    fn rule(path: &str, allow: bool, agents: &[&str]) -> RobotsRecord {
        if allow {
            RobotsRecord::allow_rule(path, agents).unwrap()
        } else {
            RobotsRecord::disallow_rule(path, agents).unwrap()
        }
    }

    #[test]
    fn test_one_block_per_agent() {
        let table = table();
        let helper = RobotsHelper::new(&table, &NO_HANDLERS, TranslationConfig::default());
        let directives = helper
            .create_robots_directives(&[rule("/admin", true, &["google", "bing"])])
            .unwrap();
        let (text, count) = create_robots_text(&directives, None);

        assert_eq!(count, 2);
        assert_eq!(
            text,
            "User-agent: google\nAllow: /admin\n\nUser-agent: bing\nAllow: /admin\n\n"
        );
    }

    #[test]
    fn test_grouping_and_dedup() {
        let table = table();
        let helper = RobotsHelper::new(&table, &NO_HANDLERS, TranslationConfig::default());
        let mut both = RobotsRecord::new("account", "/account");
        both.set_allow(true).set_disallow(true).set_disallow_list(&["badbot"]).unwrap();

        let directives = helper
            .create_robots_directives(&[
                rule("/", true, &[]),
                rule("/admin", false, &[]),
                rule("/admin", false, &["*"]),
                both,
            ])
            .unwrap();

        assert_eq!(
            directives,
            vec![
                AgentDirectives {
                    user_agent: "*".to_string(),
                    allow: vec!["/".to_string(), "/account".to_string()],
                    disallow: vec!["/admin".to_string()],
                },
                AgentDirectives {
                    user_agent: "badbot".to_string(),
                    allow: vec![],
                    disallow: vec!["/account".to_string()],
                },
            ]
        );
        let (text, count) = create_robots_text(&directives, Some("https://example.com/sitemap.xml"));
        assert_eq!(count, 2);
        assert_eq!(
            text,
            "User-agent: *\nAllow: /\nAllow: /account\nDisallow: /admin\n\n\
             User-agent: badbot\nDisallow: /account\n\n\
             Sitemap: https://example.com/sitemap.xml\n"
        );
    }

    #[test]
    fn test_locale_expansion() {
        let table = table();
        let translation = TranslationConfig::enabled("en", &["de", "fr"]).unwrap();
        let helper = RobotsHelper::new(&table, &NO_HANDLERS, translation);

        let directives = helper
            .create_robots_directives(&[rule("/{_locale}/private", false, &[])])
            .unwrap();
        assert_eq!(directives[0].disallow, vec!["/en/private", "/de/private", "/fr/private"]);
    }

    #[test]
    fn test_locale_without_translation() {
        let table = table();
        let helper = RobotsHelper::new(&table, &NO_HANDLERS, TranslationConfig::default());
        let err = helper
            .create_robots_directives(&[rule("/{_locale}/private", false, &[])])
            .unwrap_err();
        assert!(matches!(err, SitemapError::RobotsTranslationNotEnabled(_)));
    }

    #[test]
    fn test_find_static_routes() {
        let routes = RouteCollection::new()
            .with("home", Route::new("/").with_robots_option(r#"{"allow": true}"#))
            .with("about", Route::new("/about"))
            .with("admin", Route::new("/admin").with_robots_option(r#"{"disallow": true}"#));
        let table = RouteTable::new("https://example.com", routes).unwrap();
        let helper = RobotsHelper::new(&table, &NO_HANDLERS, TranslationConfig::default());

        let records = helper.find_static_routes().unwrap();
        let names: Vec<&str> = records.iter().map(RobotsRecord::name).collect();
        assert_eq!(names, vec!["home", "admin"]);
    }

    #[test]
    fn test_path_with_line_break_rejected() {
        let table = table();
        let helper = RobotsHelper::new(&table, &NO_HANDLERS, TranslationConfig::default());
        let mut forged = RobotsRecord::new("forged", "/x\nAllow: /secret");
        forged.set_disallow(true);

        let err = helper.create_robots_directives(&[forged]).unwrap_err();
        assert!(matches!(
            err,
            SitemapError::Model(data_model_smap::ModelError::InvalidRobotsPath(ref path)) if path == "/x\nAllow: /secret"
        ));
    }

    #[test]
    fn test_empty() {
        assert_eq!(create_robots_text(&[], None), (String::new(), 0));
    }
}
