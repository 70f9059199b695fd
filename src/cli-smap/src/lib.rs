use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use core_smap::{BundleConfig, RobotsCreator, RouteTable, Router, RunLock, SitemapCreator, SitemapError};

/// Caution printed when another run holds the lock.
pub const ALREADY_RUNNING: &str = "The command is already running in another process.";

#[derive(Parser, Debug)]
#[command(name = "smap")]
#[command(about = "Generates sitemap.xml and robots.txt from an application's route table", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON configuration file. Built-in defaults are used when absent.
    #[arg(long, global = true, env = "SMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Route table file: base URL, routes and handler attributes.
    #[arg(long, global = true, env = "SMAP_ROUTES", default_value = "routes.json")]
    pub routes: PathBuf,

    /// Directory holding the run locks (system temp directory by default).
    #[arg(long, global = true, env = "SMAP_LOCK_DIR")]
    pub lock_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the sitemap.xml file
    #[command(alias = "create-xml")]
    Sitemap {
        /// Directory of the sitemap file (default from configuration)
        #[arg(short = 'P', long)]
        path: Option<PathBuf>,
        /// Filename of the sitemap file (default from configuration)
        #[arg(short = 'F', long)]
        file: Option<String>,
        /// Compress the sitemap with gzip
        #[arg(short = 'G', long, overrides_with = "no_gzip")]
        gzip: bool,
        /// Do not compress the sitemap
        #[arg(long, overrides_with = "gzip")]
        no_gzip: bool,
    },

    /// Create the robots.txt file
    #[command(alias = "create-robots")]
    Robots {
        /// Directory of the robots.txt file (default from configuration)
        #[arg(short = 'P', long)]
        path: Option<PathBuf>,
        /// Filename of the robots.txt file (default from configuration)
        #[arg(short = 'F', long)]
        file: Option<String>,
    },
}

impl Commands {
    fn lock_name(&self) -> &'static str {
        match self {
            Commands::Sitemap { .. } => "smap-sitemap",
            Commands::Robots { .. } => "smap-robots",
        }
    }
}

/// Runs one command under its run lock. Returns the summary line.
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    let lock_dir = cli.lock_dir.clone().unwrap_or_else(std::env::temp_dir);
    let _lock = RunLock::acquire(&lock_dir, cli.command.lock_name())?;

    let config = load_config(cli.config.as_deref())?;
    let routes = RouteTable::from_json_file(&cli.routes)?;
    tracing::debug!("Loaded {} routes from {}", routes.route_collection().len(), cli.routes.display());

    match &cli.command {
        Commands::Sitemap {
            path,
            file,
            gzip,
            no_gzip: _,
        } => {
            let creator = SitemapCreator::new(&routes, config.sitemap).with_attributes(routes.handlers());
            let (written, count) = creator
                .write_sitemap_xml(path.as_deref(), file.as_deref(), *gzip)
                .context("Cannot create sitemap.xml")?;
            Ok(format!("{count} urls written in {}", written.display()))
        }
        Commands::Robots { path, file } => {
            let creator = RobotsCreator::new(&routes, config.robots).with_attributes(routes.handlers());
            let (written, user_agents) = creator
                .write_robots_txt(path.as_deref(), file.as_deref())
                .context("Cannot create robots.txt")?;
            Ok(format!("{user_agents} user agents written in {}", written.display()))
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BundleConfig> {
    match path {
        Some(path) => Ok(BundleConfig::from_json_file(path)?),
        None => Ok(BundleConfig::default()),
    }
}

/// True when `error` comes from another run holding the lock.
pub fn is_already_running(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<SitemapError>(),
        Some(SitemapError::AlreadyRunning(_))
    )
}
