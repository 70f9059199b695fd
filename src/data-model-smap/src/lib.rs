#[macro_use]
mod macros;

pub mod attributes;
pub mod errors;
pub mod models;
pub mod options;

pub use attributes::{RobotsAttribute, SitemapAttribute};
pub use errors::ModelError;
pub use models::{
    ChangeFreq, DEFAULT_PRIORITY, Locale, Priority, RobotsRecord, RouteRecord, WILDCARD_USER_AGENT, check_robots_path,
};
pub use options::{Coerced, InlineOption};
