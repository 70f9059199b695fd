//! robots.txt generation.

mod creator;
pub mod helper;
pub mod parser;

pub use creator::RobotsCreator;
pub use helper::{AgentDirectives, RobotsHelper, create_robots_text};
pub use parser::RobotsRouteParser;
