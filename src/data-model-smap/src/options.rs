//! The inline `sitemap` / `robots_txt` route options, and their coercion into a definite answer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::ModelError;

/// Raw value of an inline route option, exactly as it appears in the route definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InlineOption {
    Flag(bool),
    Number(Number),
    Text(String),
    List(Vec<Value>),
    Table(Map<String, Value>),
}

/// What an inline option (or a handler attribute) means once coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    /// The route opts out.
    Disabled,
    /// The route opts in with nothing further specified.
    Enabled,
    /// The route opts in with the given fields.
    Detailed(Map<String, Value>),
}

impl Coerced {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Coerced::Disabled)
    }
}

impl InlineOption {
    /// Name of the shape of this value, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            InlineOption::Flag(_) => "boolean",
            InlineOption::Number(_) => "number",
            InlineOption::Text(_) => "string",
            InlineOption::List(_) => "list",
            InlineOption::Table(_) => "mapping",
        }
    }

    /// Coerce into a definite answer.
    ///
    /// - Strings holding a JSON object are decoded into a mapping; any other string goes through
    ///   [`parse_bool_like`].
    /// - Numbers `1` and `0` are booleans.
    /// - An empty mapping means "disabled", as does `false`.
    /// - Lists, and anything that does not coerce to a boolean, are rejected.
    pub fn coerce(&self) -> Result<Coerced, ModelError> {
        match self {
            InlineOption::Flag(true) => Ok(Coerced::Enabled),
            InlineOption::Flag(false) => Ok(Coerced::Disabled),
            InlineOption::Table(table) => Ok(table_or_disabled(table.clone())),
            InlineOption::List(_) => Err(ModelError::NotBooleanOrMapping(self.kind().to_string())),
            InlineOption::Number(number) => match number.as_f64() {
                Some(n) if n == 1.0 => Ok(Coerced::Enabled),
                Some(n) if n == 0.0 => Ok(Coerced::Disabled),
                _ => Err(ModelError::NotBooleanOrMapping(format!("number {number}"))),
            },
            InlineOption::Text(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(table)) => Ok(table_or_disabled(table)),
                Ok(Value::Array(_)) => Err(ModelError::NotBooleanOrMapping("list".to_string())),
                _ => match parse_bool_like(text) {
                    Some(true) => Ok(Coerced::Enabled),
                    Some(false) => Ok(Coerced::Disabled),
                    None => Err(ModelError::NotBooleanOrMapping(format!("string \"{text}\""))),
                },
            },
        }
    }
}

impl From<bool> for InlineOption {
    fn from(value: bool) -> Self {
        InlineOption::Flag(value)
    }
}

impl From<&str> for InlineOption {
    fn from(value: &str) -> Self {
        InlineOption::Text(value.to_string())
    }
}

impl From<Map<String, Value>> for InlineOption {
    fn from(value: Map<String, Value>) -> Self {
        InlineOption::Table(value)
    }
}

fn table_or_disabled(table: Map<String, Value>) -> Coerced {
    if table.is_empty() {
        Coerced::Disabled
    } else {
        Coerced::Detailed(table)
    }
}

/// Permissive boolean parsing: `1`, `true`, `on`, `yes` are true; `0`, `false`, `off`, `no` and the
/// empty string are false (case-insensitive, surrounding whitespace ignored). Anything else is `None`.
pub fn parse_bool_like(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}
