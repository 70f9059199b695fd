//! Tests of the `smap` commands against a route table on disk

use std::path::Path;

use clap::Parser;
use cli_smap::{Cli, is_already_running, run};
use core_smap::RunLock;

const ROUTES: &str = r#"{
    "base_url": "https://www.test.com",
    "routes": [
        {"name": "home", "path": "/", "options": {"sitemap": true, "robots_txt": {"allow": true}}},
        {"name": "blog", "path": "/blog", "controller": "BlogController::index"},
        {"name": "admin", "path": "/admin", "options": {"robots_txt": {"disallow": true, "disallowList": ["google", "bing"]}}}
    ],
    "handlers": {
        "BlogController::index": {"sitemap": {"priority": 0.8, "changefreq": "daily"}}
    }
}"#;

/// Writes the route table and a configuration pointing the output to `<dir>/public`.
fn setup(dir: &Path) -> (String, String) {
    let routes = dir.join("routes.json");
    std::fs::write(&routes, ROUTES).unwrap();

    let config = dir.join("smap.json");
    let public = dir.join("public");
    std::fs::write(
        &config,
        format!(
            r#"{{
                "sitemap": {{"sitemap_directory": {public:?}}},
                "robots": {{"robots_directory": {public:?}, "sitemap_url": "https://www.test.com/sitemap.xml"}}
            }}"#,
            public = public.display().to_string()
        ),
    )
    .unwrap();

    (routes.display().to_string(), config.display().to_string())
}

fn cli(dir: &Path, args: &[&str]) -> Cli {
    let (routes, config) = setup(dir);
    let lock_dir = dir.join("locks").display().to_string();
    let mut argv = vec!["smap"];
    argv.extend_from_slice(args);
    argv.extend_from_slice(&["--routes", routes.as_str(), "--config", config.as_str(), "--lock-dir", lock_dir.as_str()]);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_sitemap_command() {
    let dir = tempfile::tempdir().unwrap();

    let summary = run(&cli(dir.path(), &["sitemap"])).unwrap();

    let expected_path = dir.path().join("public").join("sitemap.xml");
    assert_eq!(summary, format!("2 urls written in {}", expected_path.display()));
    let xml = std::fs::read_to_string(expected_path).unwrap();
    assert!(xml.contains("<loc>https://www.test.com/</loc>"));
    assert!(xml.contains("<loc>https://www.test.com/blog</loc>"));
    assert!(xml.contains("<priority>0.8</priority>"));
}

#[test]
fn test_sitemap_command_gzip_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out").display().to_string();

    let summary = run(&cli(dir.path(), &["create-xml", "-P", out.as_str(), "-F", "map.xml", "-G"])).unwrap();

    let expected_path = dir.path().join("out").join("map.xml.gz");
    assert_eq!(summary, format!("2 urls written in {}", expected_path.display()));
    assert!(expected_path.exists());
}

#[test]
fn test_robots_command() {
    let dir = tempfile::tempdir().unwrap();

    let summary = run(&cli(dir.path(), &["robots"])).unwrap();

    let expected_path = dir.path().join("public").join("robots.txt");
    assert_eq!(summary, format!("3 user agents written in {}", expected_path.display()));
    assert_eq!(
        std::fs::read_to_string(expected_path).unwrap(),
        "User-agent: *\nAllow: /\n\n\
         User-agent: google\nDisallow: /admin\n\n\
         User-agent: bing\nDisallow: /admin\n\n\
         Sitemap: https://www.test.com/sitemap.xml\n"
    );
}

#[test]
fn test_command_already_running() {
    let dir = tempfile::tempdir().unwrap();
    let cli = cli(dir.path(), &["robots"]);

    let lock = RunLock::acquire(&dir.path().join("locks"), "smap-robots").unwrap();
    let err = run(&cli).unwrap_err();
    assert!(is_already_running(&err));
    assert!(!dir.path().join("public").join("robots.txt").exists());

    drop(lock);
    assert!(run(&cli).is_ok());
}

#[test]
fn test_missing_route_table() {
    let dir = tempfile::tempdir().unwrap();
    let lock_dir = dir.path().display().to_string();
    let cli = Cli::try_parse_from([
        "smap",
        "sitemap",
        "--routes",
        "/nonexistent/routes.json",
        "--lock-dir",
        lock_dir.as_str(),
    ])
    .unwrap();

    let err = run(&cli).unwrap_err();
    assert!(!is_already_running(&err));
    assert!(err.to_string().contains("/nonexistent/routes.json"));
}
