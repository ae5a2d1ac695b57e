//! End-to-end tests for the crawler
//!
//! These tests use wiremock to serve HTML over real HTTP and drive the full
//! fetch, parse, expand and report cycle.

use crate::support::ScriptedFetcher;
use site_sweep::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use site_sweep::crawler::{CrawlEngine, HttpFetcher, NoopEventHandler, NOT_PARSED};
use site_sweep::service::{CrawlService, ServiceObserver};
use site_sweep::state::PageDetails;
use site_sweep::SweepError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    }
}

/// Creates a test configuration crawling `starting_url` into `output_dir`
fn create_test_config(starting_url: &str, output_dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            starting_url: starting_url.to_string(),
            num_threads: 4,
            progress_interval_millis: 10,
            parse_timeout_millis: 2000,
            crawl_timeout_seconds: 30,
        },
        user_agent: user_agent(),
        output: OutputConfig {
            output_path: output_dir.to_string_lossy().into_owned(),
            result_file: "crawl.txt".to_string(),
        },
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

/// Mounts a small site: home, a page linking back home, a failing page and a JSON file
async fn mount_site(server: &MockServer) {
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><head><title>Home</title>
            <link rel="stylesheet" href="/style.css"></head><body>
            <img src="/logo.png">
            <a href="{base}/page1">Page 1</a>
            <a href="/page1/">Page 1 again</a>
            <a href="/broken">Broken</a>
            <a href="/data.json">Data</a>
            <a href="https://ext.invalid/x">Elsewhere</a>
            </body></html>"#
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(
            r#"<html><head><title>Page 1</title></head><body>
            <a href="/">Home</a></body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let fetcher = HttpFetcher::new(&user_agent(), Some(Duration::from_secs(2))).unwrap();
    let engine = CrawlEngine::new(4, Arc::new(fetcher));
    engine
        .start(&format!("{}/", base), Arc::new(NoopEventHandler))
        .unwrap();
    assert!(engine.wait(Duration::from_secs(10)).await);

    let result = engine.result().unwrap();
    assert_eq!(result.pages.len(), 4);
    assert_eq!(result.processed, 4);
    assert_eq!(result.origin, base);

    let home = result.page(&base).unwrap();
    assert_eq!(home.title.as_deref(), Some("Home"));
    assert_eq!(home.external_links, vec!["https://ext.invalid/x".to_string()]);
    assert_eq!(home.internal_links.len(), 4);
    assert_eq!(
        home.content_links,
        vec![format!("{}/style.css", base), format!("{}/logo.png", base)]
    );

    let page1 = result.page(&format!("{}/page1", base)).unwrap();
    assert_eq!(page1.title.as_deref(), Some("Page 1"));
    assert_eq!(page1.internal_links, vec![format!("{}/", base)]);

    let broken = result.page(&format!("{}/broken", base)).unwrap();
    assert!(broken.load_error.as_deref().unwrap().contains("HTTP 500"));

    let data = result.page(&format!("{}/data.json", base)).unwrap();
    assert!(data
        .load_error
        .as_deref()
        .unwrap()
        .contains("unsupported content type"));

    // Wiremock verifies every page was fetched exactly once when the server drops
}

/// Observer that records service notifications
#[derive(Default)]
struct ServiceRecorder {
    started: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    completed: Mutex<Vec<(usize, bool, PathBuf)>>,
}

impl ServiceObserver for ServiceRecorder {
    fn on_start(&self, starting_url: &str) {
        self.started.lock().unwrap().push(starting_url.to_string());
    }

    fn on_error(&self, errors: &[String]) {
        self.errors.lock().unwrap().extend_from_slice(errors);
    }

    fn on_complete(&self, processed: usize, canceled: bool, report_path: &Path) {
        self.completed
            .lock()
            .unwrap()
            .push((processed, canceled, report_path.to_path_buf()));
    }
}

#[tokio::test]
async fn test_service_writes_and_appends_report() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();
    let output_dir = dir.path().join("reports");

    let config = create_test_config(&format!("{}/", base), &output_dir);
    let recorder = Arc::new(ServiceRecorder::default());

    let summary = CrawlService::new(config.clone())
        .run(recorder.clone())
        .await
        .unwrap();

    assert_eq!(summary.processed, 4);
    assert_eq!(summary.discovered, 4);
    assert!(!summary.canceled);
    assert_eq!(summary.report_path, output_dir.join("crawl.txt"));
    assert_eq!(*recorder.started.lock().unwrap(), vec![format!("{}/", base)]);
    assert_eq!(
        *recorder.completed.lock().unwrap(),
        vec![(4, false, summary.report_path.clone())]
    );

    let text = std::fs::read_to_string(&summary.report_path).unwrap();
    assert!(text.starts_with(&format!("Starting URL: {}/\n", base)));
    assert!(text.contains(&format!("\nPage: {}\n - Title: Home\n", base)));
    assert!(text.contains(" - External Links:\n     https://ext.invalid/x\n"));
    assert!(text.contains(&format!("\nPage: {}/page1\n - Title: Page 1\n", base)));
    assert!(!text.contains("CANCELED"));

    // A second run appends below a separator
    server.reset().await;
    mount_site(&server).await;
    CrawlService::new(config)
        .run(Arc::new(ServiceRecorder::default()))
        .await
        .unwrap();

    let text = std::fs::read_to_string(&summary.report_path).unwrap();
    assert_eq!(text.matches("Starting URL:").count(), 2);
    assert!(text.contains(site_sweep::output::SEPARATOR));
}

#[tokio::test]
async fn test_service_reports_every_config_error() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config("mailto:someone@example.com", dir.path());
    config.output.result_file = String::new();
    let recorder = Arc::new(ServiceRecorder::default());

    let err = CrawlService::new(config)
        .run(recorder.clone())
        .await
        .unwrap_err();

    assert!(matches!(err, SweepError::Config(_)));
    assert_eq!(recorder.errors.lock().unwrap().len(), 2);
    assert!(recorder.started.lock().unwrap().is_empty());
    assert!(recorder.completed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_service_cancels_on_crawl_timeout() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config("http://site.test/", dir.path());
    // Clamped up to the five second minimum
    config.crawler.crawl_timeout_seconds = 1;
    config.crawler.progress_interval_millis = 0;

    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .page(
                "http://site.test",
                PageDetails::titled("Home").with_link("http://site.test/slow"),
            )
            .block("http://site.test/slow"),
    );
    let recorder = Arc::new(ServiceRecorder::default());

    let summary = CrawlService::new(config)
        .with_fetcher(fetcher)
        .run(recorder.clone())
        .await
        .unwrap();

    assert!(summary.canceled);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.discovered, 2);
    assert!(summary.duration >= Duration::from_secs(5));

    let text = std::fs::read_to_string(&summary.report_path).unwrap();
    assert!(text.contains(" minutes - CANCELED !!!\n"));
    assert!(text.contains(&format!(
        "\nPage: http://site.test/slow\n - Load Error: {}\n",
        NOT_PARSED
    )));
}
