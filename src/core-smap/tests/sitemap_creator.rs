//! End-to-end tests of sitemap.xml generation
//!
//! Covers the whole pipeline behind SitemapCreator:
//! - route table parsing (inline options and handler attributes)
//! - dynamic routes providers
//! - normalization, locale alternates and XML rendering
//! - writing the file, plain and gzip-compressed

use std::io::Read;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use core_smap::{
    DynamicRoutes, Result, Route, RouteCollection, RouteTable, SitemapConfig, SitemapCreator, SitemapError,
    TranslationConfig,
    routing::{HandlerAttributes, HandlerRegistry},
};
use data_model_smap::{ChangeFreq, RouteRecord, SitemapAttribute};
use flate2::read::GzDecoder;
use quick_xml::{Reader, events::Event};

fn now() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2024, 12, 9, 0, 0, 0).unwrap().fixed_offset()
}

/// Routes of a small blog: some inline options, some handler attributes, one localized page.
fn blog_routes() -> RouteTable {
    let routes = RouteCollection::new()
        .with("home", Route::new("/").with_sitemap_option(true))
        .with(
            "blog",
            Route::new("/blog").with_controller("BlogController::index"),
        )
        .with(
            "blog_show",
            Route::new("/blog/{slug}").with_controller("BlogController::show"),
        )
        .with(
            "admin",
            Route::new("/admin")
                .with_controller("AdminController::index")
                .with_sitemap_option("no"),
        )
        .with(
            "contact",
            Route::new("/contact").with_sitemap_option(r#"{"changefreq": "yearly", "priority": 0.2}"#),
        );

    let mut handlers = HandlerRegistry::new();
    handlers.register(
        "BlogController::index",
        HandlerAttributes::sitemap(SitemapAttribute::new(Some(0.9), Some(ChangeFreq::Daily), None, true).unwrap()),
    );
    handlers.register(
        "AdminController::index",
        HandlerAttributes::sitemap(SitemapAttribute::new(Some(1.0), None, None, true).unwrap()),
    );

    RouteTable::new("https://www.test.com", routes)
        .unwrap()
        .with_handlers(handlers)
}

/// Text of every `<loc>` element, unescaped.
fn locs(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut in_loc = false;
    let mut locs = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"loc" => in_loc = true,
            Event::Text(text) if in_loc => locs.push(text.unescape().unwrap().into_owned()),
            Event::End(e) if e.name().as_ref() == b"loc" => in_loc = false,
            Event::Eof => break,
            _ => {}
        }
    }
    locs
}

#[test]
fn test_create_static_and_dynamic_routes() {
    let table = blog_routes();
    let creator = SitemapCreator::new(&table, SitemapConfig::default())
        .with_attributes(table.handlers())
        .with_now(now())
        .with_provider(|routes: &mut DynamicRoutes| -> Result<()> {
            for slug in ["hello-world", "rust & xml"] {
                routes.add_url(RouteRecord::new("blog_show").with_route_parameter("slug", slug));
            }
            Ok(())
        });

    let (xml, count) = creator.create().unwrap();

    assert_eq!(count, 5);
    assert_eq!(
        locs(&xml),
        vec![
            "https://www.test.com/",
            "https://www.test.com/blog",
            "https://www.test.com/contact",
            "https://www.test.com/blog/hello-world",
            "https://www.test.com/blog/rust%20&%20xml",
        ]
    );
    assert!(xml.contains("<loc>https://www.test.com/blog/rust%20&amp;%20xml</loc>"));
    assert!(xml.contains("<priority>0.9</priority>"));
    assert!(xml.contains("<changefreq>daily</changefreq>"));
    assert!(xml.contains("<priority>0.2</priority>"));
    assert!(xml.contains("<changefreq>yearly</changefreq>"));
    assert_eq!(xml.matches("<lastmod>2024-12-09T00:00:00+00:00</lastmod>").count(), 5);
    assert!(!xml.contains("/admin"));
}

#[test]
fn test_providers_run_in_order_and_can_fail() {
    let table = blog_routes();
    let creator = SitemapCreator::new(&table, SitemapConfig::default())
        .with_now(now())
        .with_provider(|routes: &mut DynamicRoutes| -> Result<()> {
            routes.add_url(RouteRecord::new("blog_show").with_route_parameter("slug", "first"));
            Ok(())
        })
        .with_provider(|routes: &mut DynamicRoutes| -> Result<()> {
            routes.add_url(RouteRecord::new("blog_show").with_route_parameter("slug", "second"));
            Ok(())
        });
    let (xml, _) = creator.create().unwrap();
    let found = locs(&xml);
    assert_eq!(
        &found[found.len() - 2..],
        &["https://www.test.com/blog/first", "https://www.test.com/blog/second"]
    );

    let failing = SitemapCreator::new(&table, SitemapConfig::default()).with_provider(
        |routes: &mut DynamicRoutes| -> Result<()> {
            routes.add_url(RouteRecord::new("blog_show"));
            Ok(())
        },
    );
    assert!(matches!(
        failing.create(),
        Err(SitemapError::MissingRouteParameter { .. })
    ));
}

#[test]
fn test_localized_routes() {
    let routes = RouteCollection::new()
        .with("home", Route::new("/").with_sitemap_option(true))
        .with("about", Route::new("/{_locale}/about").with_sitemap_option(true));
    let table = RouteTable::new("https://www.test.com", routes).unwrap();

    let config = SitemapConfig::builder()
        .translation(TranslationConfig::enabled("en", &["de", "fr"]).unwrap())
        .build()
        .unwrap();
    let (xml, count) = SitemapCreator::new(&table, config).with_now(now()).create().unwrap();

    assert_eq!(count, 2);
    assert!(xml.contains("xmlns:xhtml=\"http://www.w3.org/1999/xhtml\""));
    assert!(xml.contains("<loc>https://www.test.com/en/about</loc>"));
    for locale in ["en", "de", "fr"] {
        assert!(xml.contains(&format!(
            "<xhtml:link rel=\"alternate\" hreflang=\"{locale}\" href=\"https://www.test.com/{locale}/about\"/>"
        )));
    }

    let disabled = SitemapCreator::new(&table, SitemapConfig::default());
    assert!(matches!(
        disabled.create(),
        Err(SitemapError::TranslationNotEnabled(route)) if route == "about"
    ));
}

#[test]
fn test_write_sitemap_xml() {
    let dir = tempfile::tempdir().unwrap();
    let table = blog_routes();
    let config = SitemapConfig::builder()
        .sitemap_directory(dir.path().join("public"))
        .build()
        .unwrap();
    let creator = SitemapCreator::new(&table, config).with_now(now());

    let (path, count) = creator.write_sitemap_xml(None, None, false).unwrap();
    assert_eq!(path, dir.path().join("public").join("sitemap.xml"));
    assert_eq!(count, 2);
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset"));

    let (gz_path, _) = creator.write_sitemap_xml(None, None, true).unwrap();
    assert_eq!(gz_path, dir.path().join("public").join("sitemap.xml.gz"));
    assert!(!path.exists());

    let mut decompressed = String::new();
    GzDecoder::new(std::fs::File::open(&gz_path).unwrap())
        .read_to_string(&mut decompressed)
        .unwrap();
    assert_eq!(decompressed, written);
}

#[test]
fn test_write_sitemap_xml_overrides_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    let table = blog_routes();
    let creator = SitemapCreator::new(&table, SitemapConfig::default()).with_now(now());

    let (path, _) = creator
        .write_sitemap_xml(Some(dir.path()), Some("map.xml"), false)
        .unwrap();
    assert_eq!(path, dir.path().join("map.xml"));

    assert!(matches!(
        creator.write_sitemap_xml(Some(dir.path()), Some(""), false),
        Err(SitemapError::FilenameMissing("sitemap.xml"))
    ));

    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    assert!(matches!(
        creator.write_sitemap_xml(Some(&blocker), None, false),
        Err(SitemapError::CannotWrite { .. })
    ));
}

#[test]
fn test_invalid_base_url_scheme_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let routes = RouteCollection::new().with("home", Route::new("/").with_sitemap_option(true));
    let table = RouteTable::new("ftp://files.test.com", routes).unwrap();
    let creator = SitemapCreator::new(&table, SitemapConfig::default());

    let err = creator
        .write_sitemap_xml(Some(dir.path()), None, false)
        .unwrap_err();
    assert!(matches!(err, SitemapError::InvalidUrl { .. }));
    assert!(!dir.path().join("sitemap.xml").exists());
}
