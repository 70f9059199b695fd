//! sitemap.xml generation.

mod creator;
pub mod helper;
pub mod parser;
pub mod url_check;
pub mod xml;

pub use creator::SitemapCreator;
pub use helper::SitemapHelper;
pub use parser::RouteParser;
