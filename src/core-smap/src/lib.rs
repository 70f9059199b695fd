//! # sitemap.xml & robots.txt generation
//!
//! Introspects an application's route table and produces two static files:
//! a sitemap (XML list of canonical URLs with metadata) and a robots.txt
//! (allow/disallow rules per crawler user agent).
//!
//! The pipeline is linear and synchronous:
//!
//! 1. a parser reads each route's `sitemap` / `robots_txt` configuration, either inline route
//!    options or a declarative attribute registered for the route's handler;
//! 2. providers registered by the host application append dynamically generated entries;
//! 3. the normalizer fills unset fields with configured defaults and resolves absolute URLs,
//!    including locale alternates;
//! 4. the serializer renders XML (validated, bounded to 50,000 URLs and 50 MB) or robots text;
//! 5. the writer replaces the output file atomically, optionally gzip-compressed.
//!
//! ## Example
//!
//! ```no_run
//! use core_smap::{config::SitemapConfig, routing::RouteTable, sitemap::SitemapCreator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let routes = RouteTable::from_json_file(std::path::Path::new("routes.json"))?;
//! let creator = SitemapCreator::new(&routes, SitemapConfig::default());
//! let (path, count) = creator.write_sitemap_xml(None, None, true)?;
//! println!("{count} urls written in {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod errors;
pub mod events;
pub mod robots;
pub mod routing;
pub mod sitemap;

pub use common::{lock::RunLock, logging};
pub use config::{BundleConfig, DefaultValues, RobotsConfig, SitemapConfig, TranslationConfig};
pub use errors::{Result, SitemapError};
pub use events::{DynamicRoutes, DynamicRoutesProvider, RobotsRules, RobotsRulesProvider};
pub use robots::RobotsCreator;
pub use routing::{Route, RouteCollection, RouteOptions, RouteTable, Router};
pub use sitemap::SitemapCreator;
