//! Reads the robots.txt configuration of one route.

use data_model_smap::{Coerced, RobotsRecord};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{Result, SitemapError};
use crate::routing::{AttributeLookup, Route};

const OPTION: &str = "robots_txt";

/// Which of the two directives a flag/list pair configures.
#[derive(Clone, Copy)]
enum Directive {
    Allow,
    Disallow,
}

impl Directive {
    fn flag(self) -> &'static str {
        match self {
            Directive::Allow => "allow",
            Directive::Disallow => "disallow",
        }
    }

    fn list(self) -> &'static str {
        match self {
            Directive::Allow => "allowList",
            Directive::Disallow => "disallowList",
        }
    }
}

/// Turns a route's inline `robots_txt` option, or its handler's robots attribute, into a record.
pub struct RobotsRouteParser<'a> {
    attributes: &'a dyn AttributeLookup,
}

impl<'a> RobotsRouteParser<'a> {
    pub fn new(attributes: &'a dyn AttributeLookup) -> Self {
        Self { attributes }
    }

    /// `Ok(None)` when the route has no robots.txt configuration or opts out.
    pub fn parse(&self, name: &str, route: &Route) -> Result<Option<RobotsRecord>> {
        let coerced = match &route.options.robots_txt {
            Some(inline) => inline.coerce().map_err(|e| invalid(name, e.to_string()))?,
            None => match route
                .controller
                .as_deref()
                .and_then(|controller| self.attributes.robots_attribute(controller))
            {
                Some(attribute) => attribute.to_coerced(),
                None => return Ok(None),
            },
        };

        let mut record = RobotsRecord::new(name, route.path.as_str());
        match coerced {
            Coerced::Disabled => return Ok(None),
            Coerced::Enabled => {}
            Coerced::Detailed(options) => {
                apply_directive(name, &options, Directive::Allow, &mut record)?;
                apply_directive(name, &options, Directive::Disallow, &mut record)?;
            }
        }
        debug!(
            "Route {name}: allow={} disallow={} path={}",
            record.allow(),
            record.disallow(),
            record.path()
        );
        Ok(Some(record))
    }
}

fn apply_directive(name: &str, options: &Map<String, Value>, directive: Directive, record: &mut RobotsRecord) -> Result<()> {
    let enabled = match options.get(directive.flag()) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(invalid(
                name,
                format!("{} option must be of type \"boolean\", got {other}", directive.flag()),
            ));
        }
    };
    if !enabled {
        return Ok(());
    }

    let agents = user_agent_list(name, directive, options.get(directive.list()))?;
    match directive {
        Directive::Allow => record.set_allow(true).set_allow_list(&agents)?,
        Directive::Disallow => record.set_disallow(true).set_disallow_list(&agents)?,
    };
    Ok(())
}

/// A single string or a list of strings. Missing or empty means the wildcard default.
fn user_agent_list(name: &str, directive: Directive, value: Option<&Value>) -> Result<Vec<String>> {
    let wrong_type = |got: &Value| {
        invalid(
            name,
            format!("{} option must be of type \"array\" or \"string\", got {got}", directive.list()),
        )
    };
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(agent)) if agent.is_empty() => Ok(Vec::new()),
        Some(Value::String(agent)) => Ok(vec![agent.clone()]),
        Some(Value::Array(agents)) => agents
            .iter()
            .map(|agent| agent.as_str().map(str::to_string).ok_or_else(|| wrong_type(agent)))
            .collect(),
        Some(other) => Err(wrong_type(other)),
    }
}

fn invalid(name: &str, message: String) -> SitemapError {
    SitemapError::InvalidOption {
        route: name.to_string(),
        option: OPTION,
        message,
    }
}
