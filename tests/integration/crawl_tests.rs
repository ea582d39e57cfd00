//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use link_auditor::config::OutputConfig;
use link_auditor::crawler::Coordinator;
use link_auditor::output::export_reports;
use link_auditor::{crawl, AuditConfig, Outcome};
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given mock server
fn create_test_config(base_url: &str, max_depth: u32) -> AuditConfig {
    AuditConfig::new(format!("{}/", base_url), max_depth)
        .with_user_agent("TestBot/1.0")
        .with_concurrency(4)
        .with_request_timeout(Duration::from_secs(2))
}

/// Mounts an HTML page whose body is one anchor per href
async fn mount_page(server: &MockServer, page_path: &str, status: u16, hrefs: &[&str]) {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(format!("<html><body>{}</body></html>", links))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Flattens a report into plain strings for assertions
fn results_by_url(results: &link_auditor::state::ResultSnapshot) -> HashMap<String, Outcome> {
    results
        .iter()
        .map(|(url, outcome)| (url.as_str().to_string(), *outcome))
        .collect()
}

/// Counts GET requests the server received for `request_path`
async fn requests_to(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(
        &mock_server,
        "/",
        200,
        &[
            "/about.html",
            "/about.html#team",
            "/style.css",
            "https://other.example.org/x",
            "blog/",
        ],
    )
    .await;
    mount_page(&mock_server, "/about.html", 200, &["/", "/contact.php"]).await;
    // "blog/" normalizes to /blog, which is the path actually requested
    mount_page(&mock_server, "/blog", 200, &["/about.html"]).await;
    mount_page(&mock_server, "/contact.php", 200, &[]).await;

    let report = crawl(create_test_config(&base_url, 3)).await.unwrap();
    let results = results_by_url(&report.results);

    assert_eq!(results.len(), 4, "unexpected results: {:?}", results);
    assert_eq!(results[&base_url], Outcome::Status(200));
    assert_eq!(results[&format!("{}/about.html", base_url)], Outcome::Status(200));
    assert_eq!(results[&format!("{}/blog", base_url)], Outcome::Status(200));
    assert_eq!(results[&format!("{}/contact.php", base_url)], Outcome::Status(200));

    // The fragment duplicate collapses into one fetch; assets are never requested
    assert_eq!(requests_to(&mock_server, "/about.html").await, 1);
    assert_eq!(requests_to(&mock_server, "/style.css").await, 0);
    assert!(!report.cancelled);
    assert!(!report.robots_fallback);
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private/").await;
    mount_page(&mock_server, "/", 200, &["/private/secret.html", "/public.html"]).await;
    mount_page(&mock_server, "/private/secret.html", 200, &[]).await;
    mount_page(&mock_server, "/public.html", 200, &[]).await;

    let report = crawl(create_test_config(&base_url, 2)).await.unwrap();
    let results = results_by_url(&report.results);

    assert!(results.contains_key(&format!("{}/public.html", base_url)));
    assert!(!results.contains_key(&format!("{}/private/secret.html", base_url)));
    assert_eq!(requests_to(&mock_server, "/private/secret.html").await, 0);
}

#[tokio::test]
async fn test_robots_for_other_agent_does_not_apply() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: OtherBot\nDisallow: /").await;
    mount_page(&mock_server, "/", 200, &["/page.html"]).await;
    mount_page(&mock_server, "/page.html", 200, &[]).await;

    let report = crawl(create_test_config(&base_url, 1)).await.unwrap();
    assert_eq!(report.results.len(), 2);
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // No robots.txt mock: wiremock answers 404
    mount_page(&mock_server, "/", 200, &["/private/page.html"]).await;
    mount_page(&mock_server, "/private/page.html", 200, &[]).await;

    let report = crawl(create_test_config(&base_url, 1)).await.unwrap();
    let results = results_by_url(&report.results);

    assert!(report.robots_fallback);
    assert_eq!(
        results[&format!("{}/private/page.html", base_url)],
        Outcome::Status(200)
    );
}

#[tokio::test]
async fn test_forbidden_robots_disallows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", 200, &["/page.html"]).await;

    let report = crawl(create_test_config(&base_url, 1)).await.unwrap();

    assert!(report.results.is_empty());
    assert_eq!(requests_to(&mock_server, "/").await, 0);
}

#[tokio::test]
async fn test_redirected_robots_txt_is_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/real-robots.txt"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/real-robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private/"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", 200, &["/private/x.html", "/public.html"]).await;
    mount_page(&mock_server, "/private/x.html", 200, &[]).await;
    mount_page(&mock_server, "/public.html", 200, &[]).await;

    let report = crawl(create_test_config(&base_url, 1)).await.unwrap();
    let results = results_by_url(&report.results);

    assert!(!report.robots_fallback);
    assert!(!results.contains_key(&format!("{}/private/x.html", base_url)));
    assert_eq!(requests_to(&mock_server, "/private/x.html").await, 0);
    assert_eq!(results[&format!("{}/public.html", base_url)], Outcome::Status(200));
}

#[tokio::test]
async fn test_custom_path_suffixes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", 200, &["/report.pdf", "/page.html", "/about"]).await;
    mount_page(&mock_server, "/report.pdf", 200, &[]).await;
    mount_page(&mock_server, "/page.html", 200, &[]).await;
    mount_page(&mock_server, "/about", 200, &[]).await;

    let config = create_test_config(&base_url, 1).with_allowed_path_suffixes(["", ".pdf"]);
    let report = crawl(config).await.unwrap();
    let results = results_by_url(&report.results);

    assert_eq!(results[&format!("{}/report.pdf", base_url)], Outcome::Status(200));
    assert_eq!(results[&format!("{}/about", base_url)], Outcome::Status(200));
    assert!(!results.contains_key(&format!("{}/page.html", base_url)));
    assert_eq!(requests_to(&mock_server, "/page.html").await, 0);
}

#[tokio::test]
async fn test_broken_pages_are_recorded_not_expanded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", 200, &["/missing.html", "/error.html"]).await;
    mount_page(&mock_server, "/missing.html", 404, &["/hidden.html"]).await;
    mount_page(&mock_server, "/error.html", 500, &[]).await;
    mount_page(&mock_server, "/hidden.html", 200, &[]).await;

    let report = crawl(create_test_config(&base_url, 3)).await.unwrap();
    let results = results_by_url(&report.results);

    assert_eq!(results[&format!("{}/missing.html", base_url)], Outcome::Status(404));
    assert_eq!(results[&format!("{}/error.html", base_url)], Outcome::Status(500));
    assert!(!results.contains_key(&format!("{}/hidden.html", base_url)));
    assert_eq!(report.broken().count(), 2);
}

#[tokio::test]
async fn test_redirect_recorded_when_not_following() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", 200, &["/old.html"]).await;
    Mock::given(method("GET"))
        .and(path("/old.html"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new.html", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new.html", 200, &[]).await;

    let report = crawl(create_test_config(&base_url, 2)).await.unwrap();
    let results = results_by_url(&report.results);

    assert_eq!(results[&format!("{}/old.html", base_url)], Outcome::Status(301));
    assert!(!results.contains_key(&format!("{}/new.html", base_url)));
}

#[tokio::test]
async fn test_redirect_followed_when_enabled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", 200, &["/old.html"]).await;
    Mock::given(method("GET"))
        .and(path("/old.html"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new.html", base_url).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new.html", 200, &[]).await;

    let config = create_test_config(&base_url, 1).with_follow_redirects(true);
    let report = crawl(config).await.unwrap();
    let results = results_by_url(&report.results);

    assert_eq!(results[&format!("{}/old.html", base_url)], Outcome::Status(200));
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", 200, &["/level1.html"]).await;
    mount_page(&mock_server, "/level1.html", 200, &["/level2.html"]).await;
    mount_page(&mock_server, "/level2.html", 200, &["/level3.html"]).await;
    mount_page(&mock_server, "/level3.html", 200, &[]).await;

    let report = crawl(create_test_config(&base_url, 1)).await.unwrap();
    let results = results_by_url(&report.results);

    assert_eq!(results.len(), 2);
    assert!(results.contains_key(&format!("{}/level1.html", base_url)));
    assert_eq!(requests_to(&mock_server, "/level2.html").await, 0);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_start_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", 200, &["/a.html", "/b.html"]).await;

    let report = crawl(create_test_config(&base_url, 0)).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(requests_to(&mock_server, "/a.html").await, 0);
}

#[tokio::test]
async fn test_slow_page_times_out_as_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", 200, &["/slow.html", "/fast.html"]).await;
    Mock::given(method("GET"))
        .and(path("/slow.html"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fast.html", 200, &[]).await;

    let config = create_test_config(&base_url, 1).with_request_timeout(Duration::from_millis(500));
    let report = crawl(config).await.unwrap();
    let results = results_by_url(&report.results);

    assert_eq!(results[&format!("{}/slow.html", base_url)], Outcome::Error);
    assert_eq!(results[&format!("{}/fast.html", base_url)], Outcome::Status(200));
}

#[tokio::test]
async fn test_unreachable_start_url() {
    // Nothing listens on port 1
    let base_url = "http://127.0.0.1:1".to_string();

    let report = crawl(create_test_config(&base_url, 2)).await.unwrap();
    let results = results_by_url(&report.results);

    assert_eq!(results.len(), 1);
    assert_eq!(results[&base_url], Outcome::Error);
    assert!(report.robots_fallback);
}

#[tokio::test]
async fn test_invalid_config_fails_before_crawling() {
    let result = crawl(AuditConfig::new("not a url", 1)).await;
    assert!(matches!(result, Err(link_auditor::AuditError::Config(_))));
}

#[tokio::test]
async fn test_crawl_then_export_reports() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_page(&mock_server, "/", 200, &["/gone.html"]).await;

    let coordinator = Coordinator::new(create_test_config(&base_url, 1)).unwrap();
    let report = coordinator.run().await;

    let dir = TempDir::new().unwrap();
    let output = OutputConfig {
        csv_path: dir.path().join("internal_links_report.csv"),
        json_path: dir.path().join("internal_links_report.json"),
    };
    export_reports(&report.results, &output).unwrap();

    let csv = std::fs::read_to_string(&output.csv_path).unwrap();
    assert_eq!(
        csv,
        format!("URL,Status\n{0},200\n{0}/gone.html,404\n", base_url)
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output.json_path).unwrap()).unwrap();
    assert_eq!(json[base_url.as_str()], 200);
    assert_eq!(json[format!("{}/gone.html", base_url).as_str()], 404);
}
