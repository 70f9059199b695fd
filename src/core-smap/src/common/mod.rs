pub mod compression;
pub mod lock;
pub mod logging;
pub mod output;
