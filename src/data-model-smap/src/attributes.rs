//! Declarative sitemap / robots.txt settings attached to a route handler.
//!
//! They are registered per handler (`"Type::method"`) and give the same information as the
//! inline `sitemap` / `robots_txt` route options, in a typed form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;
use crate::models::{ChangeFreq, Priority, WILDCARD_USER_AGENT};
use crate::options::Coerced;

/// Sitemap settings of a handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSitemapAttribute")]
pub struct SitemapAttribute {
    priority: Option<Priority>,
    change_freq: Option<ChangeFreq>,
    last_mod: Option<String>,
    enabled: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSitemapAttribute {
    #[serde(default)]
    priority: Option<f64>,
    #[serde(default, alias = "changefreq")]
    change_freq: Option<ChangeFreq>,
    #[serde(default, alias = "lastmod")]
    last_mod: Option<String>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl TryFrom<RawSitemapAttribute> for SitemapAttribute {
    type Error = ModelError;

    fn try_from(raw: RawSitemapAttribute) -> Result<Self, Self::Error> {
        SitemapAttribute::new(raw.priority, raw.change_freq, raw.last_mod, raw.enabled)
    }
}

impl Default for SitemapAttribute {
    fn default() -> Self {
        Self {
            priority: None,
            change_freq: None,
            last_mod: None,
            enabled: true,
        }
    }
}

impl SitemapAttribute {
    /// Fails when `priority` lies outside [0.0, 1.0].
    pub fn new(
        priority: Option<f64>,
        change_freq: Option<ChangeFreq>,
        last_mod: Option<String>,
        enabled: bool,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            priority: priority.map(Priority::new).transpose()?,
            change_freq,
            last_mod,
            enabled,
        })
    }

    /// An attribute that removes the handler's routes from the sitemap.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    pub fn change_freq(&self) -> Option<ChangeFreq> {
        self.change_freq
    }

    pub fn last_mod(&self) -> Option<&str> {
        self.last_mod.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Same shape as a coerced inline `sitemap` option.
    pub fn to_coerced(&self) -> Coerced {
        if !self.enabled {
            return Coerced::Disabled;
        }

        let mut config = Map::new();
        if let Some(priority) = self.priority {
            config.insert("priority".to_string(), Value::from(f64::from(priority)));
        }
        if let Some(change_freq) = self.change_freq {
            config.insert("changefreq".to_string(), Value::from(change_freq.as_str()));
        }
        if let Some(last_mod) = &self.last_mod {
            config.insert("lastmod".to_string(), Value::from(last_mod.as_str()));
        }

        if config.is_empty() {
            Coerced::Enabled
        } else {
            Coerced::Detailed(config)
        }
    }
}

/// robots.txt settings of a handler: one `Allow` or `Disallow` rule for its route path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRobotsAttribute")]
pub struct RobotsAttribute {
    allow: bool,
    user_agents: Option<Vec<String>>,
    enabled: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRobotsAttribute {
    #[serde(default = "enabled_by_default")]
    allow: bool,
    #[serde(default, alias = "userAgents")]
    user_agents: Option<Vec<String>>,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

impl TryFrom<RawRobotsAttribute> for RobotsAttribute {
    type Error = ModelError;

    fn try_from(raw: RawRobotsAttribute) -> Result<Self, Self::Error> {
        RobotsAttribute::new(raw.allow, raw.user_agents, raw.enabled)
    }
}

impl Default for RobotsAttribute {
    fn default() -> Self {
        Self {
            allow: true,
            user_agents: None,
            enabled: true,
        }
    }
}

impl RobotsAttribute {
    /// Fails when any user agent is empty or holds a control character.
    pub fn new(allow: bool, user_agents: Option<Vec<String>>, enabled: bool) -> Result<Self, ModelError> {
        if let Some(agents) = &user_agents
            && let Some(bad) = agents
                .iter()
                .find(|agent| agent.trim().is_empty() || agent.trim().chars().any(char::is_control))
        {
            return Err(ModelError::InvalidUserAgent(bad.clone()));
        }
        Ok(Self {
            allow,
            user_agents,
            enabled,
        })
    }

    pub fn allow(&self) -> bool {
        self.allow
    }

    pub fn user_agents(&self) -> Option<&[String]> {
        self.user_agents.as_deref()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Same shape as a coerced inline `robots_txt` option.
    pub fn to_coerced(&self) -> Coerced {
        if !self.enabled {
            return Coerced::Disabled;
        }

        let agents: Vec<Value> = match &self.user_agents {
            Some(agents) => agents.iter().map(|a| Value::from(a.as_str())).collect(),
            None => vec![Value::from(WILDCARD_USER_AGENT)],
        };

        let mut config = Map::new();
        if self.allow {
            config.insert("allow".to_string(), Value::Bool(true));
            config.insert("allowList".to_string(), Value::Array(agents));
        } else {
            config.insert("disallow".to_string(), Value::Bool(true));
            config.insert("disallowList".to_string(), Value::Array(agents));
        }
        Coerced::Detailed(config)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sitemap_attribute_all_fields() {
        let attribute = SitemapAttribute::new(
            Some(0.8),
            Some(ChangeFreq::Daily),
            Some("2024-01-01".to_string()),
            true,
        )
        .unwrap();

        let Coerced::Detailed(config) = attribute.to_coerced() else {
            panic!("expected detailed options");
        };
        assert_eq!(config.get("priority"), Some(&json!(0.8)));
        assert_eq!(config.get("changefreq"), Some(&json!("daily")));
        assert_eq!(config.get("lastmod"), Some(&json!("2024-01-01")));
    }

    #[test]
    fn test_sitemap_attribute_partial_and_empty() {
        let partial = SitemapAttribute::new(None, Some(ChangeFreq::Weekly), None, true).unwrap();
        let Coerced::Detailed(config) = partial.to_coerced() else {
            panic!("expected detailed options");
        };
        assert_eq!(config.len(), 1);

        assert_eq!(SitemapAttribute::default().to_coerced(), Coerced::Enabled);
        assert_eq!(SitemapAttribute::disabled().to_coerced(), Coerced::Disabled);
    }

    #[test]
    fn test_sitemap_attribute_priority_bounds() {
        assert_eq!(
            SitemapAttribute::new(Some(-0.1), None, None, true),
            Err(ModelError::InvalidPriority(-0.1))
        );
        assert_eq!(
            SitemapAttribute::new(Some(1.1), None, None, true),
            Err(ModelError::InvalidPriority(1.1))
        );
        for edge in [0.0, 1.0] {
            let attribute = SitemapAttribute::new(Some(edge), None, None, true).unwrap();
            assert_eq!(attribute.priority().map(f64::from), Some(edge));
        }
    }

    #[test]
    fn test_sitemap_attribute_deserialize() {
        let attribute: SitemapAttribute =
            serde_json::from_value(json!({"priority": 0.8, "changefreq": "daily"})).unwrap();
        assert_eq!(attribute.change_freq(), Some(ChangeFreq::Daily));
        assert!(attribute.enabled());

        let err = serde_json::from_value::<SitemapAttribute>(json!({"priority": 3.0})).unwrap_err();
        assert!(err.to_string().contains("Priority must be between 0.0 and 1.0"));
    }

    #[test]
    fn test_robots_attribute_allow() {
        let attribute = RobotsAttribute::new(true, Some(vec!["Googlebot".into(), "Bingbot".into()]), true).unwrap();
        let Coerced::Detailed(config) = attribute.to_coerced() else {
            panic!("expected detailed options");
        };
        assert_eq!(config.get("allow"), Some(&json!(true)));
        assert_eq!(config.get("allowList"), Some(&json!(["Googlebot", "Bingbot"])));
        assert!(!config.contains_key("disallow"));
    }

    #[test]
    fn test_robots_attribute_disallow_default_agents() {
        let attribute = RobotsAttribute::new(false, None, true).unwrap();
        let Coerced::Detailed(config) = attribute.to_coerced() else {
            panic!("expected detailed options");
        };
        assert_eq!(config.get("disallow"), Some(&json!(true)));
        assert_eq!(config.get("disallowList"), Some(&json!(["*"])));
    }

    #[test]
    fn test_robots_attribute_disabled_and_invalid() {
        let disabled = RobotsAttribute::new(true, None, false).unwrap();
        assert_eq!(disabled.to_coerced(), Coerced::Disabled);

        assert_eq!(
            RobotsAttribute::new(true, Some(vec!["".into()]), true),
            Err(ModelError::InvalidUserAgent(String::new()))
        );
        assert!(RobotsAttribute::new(true, Some(vec!["bot\nDisallow: /".into()]), true).is_err());

        let parsed: RobotsAttribute = serde_json::from_value(json!({"allow": false})).unwrap();
        assert!(!parsed.allow());
        assert_eq!(parsed.user_agents(), None);
    }
}
