//! Integration tests for the analysis pipeline
//!
//! These tests use wiremock to serve controlled pages and run the full
//! fetch, parse, extract, probe cycle end-to-end.
//!
//! The mock server listens on 127.0.0.1. Links written with `localhost`
//! reach the same server but carry a different host, so they classify as
//! external and get probed.

use page_analyzer::config::{AnalyzerConfig, Config};
use page_analyzer::{AnalysisError, Analyzer, HtmlVersion};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates an analyzer with short timeouts suitable for tests
fn create_test_analyzer() -> Analyzer {
    let config = Config {
        analyzer: AnalyzerConfig {
            page_timeout_secs: 2,
            probe_timeout_secs: 1,
            max_concurrent_probes: 4,
        },
        ..Config::default()
    };
    Analyzer::new(&config).expect("Failed to build analyzer")
}

/// `http://localhost:<port>` for the given mock server
fn external_base(mock_server: &MockServer) -> String {
    format!("http://localhost:{}", mock_server.address().port())
}

async fn mount_page(mock_server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(mock_server)
        .await;
}

/// Returns a URL on `host` whose port has nothing listening on it
fn closed_port_url(host: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local addr").port();
    drop(listener);
    format!("http://{}:{}/", host, port)
}

#[tokio::test]
async fn test_analyze_controlled_page() {
    let mock_server = MockServer::start().await;
    let external = external_base(&mock_server);

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"
            <html>
            <head><title>Test Page</title></head>
            <body>
                <h1>Header 1</h1>
                <h2>Header 2</h2>
                <a href="/internal">Internal Link</a>
                <a href="{}/external">External Link</a>
                <form>
                    <input type="text" name="username" />
                    <input type="password" name="password" />
                </form>
            </body>
            </html>
            "#,
            external
        ),
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/external"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Internal links are never probed
    Mock::given(method("HEAD"))
        .and(path("/internal"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let result = create_test_analyzer()
        .analyze_url(&url)
        .await
        .expect("Analysis failed");

    assert_eq!(result.url, url);
    assert_eq!(result.title, "Test Page");
    assert_eq!(result.html_version, HtmlVersion::Html4);
    assert_eq!(result.headings.get("h1"), Some(&1));
    assert_eq!(result.headings.get("h2"), Some(&1));
    assert_eq!(result.headings.len(), 2);
    assert_eq!(result.internal_links, 1);
    assert_eq!(result.external_links, 1);
    assert_eq!(result.inaccessible_links, 0);
    assert!(result.has_login_form);
}

#[tokio::test]
async fn test_inaccessible_external_links_are_counted() {
    let mock_server = MockServer::start().await;
    let external = external_base(&mock_server);
    let dead = closed_port_url("localhost");

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><body>
                <a href="{0}/ok">ok</a>
                <a href="{0}/missing">missing</a>
                <a href="{0}/error">error</a>
                <a href="{1}">dead</a>
                <a href="javascript:void(0)">js</a>
                <a href="mailto:someone@example.com">mail</a>
                <a href="/about">about</a>
            </body></html>"#,
            external, dead
        ),
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = create_test_analyzer()
        .analyze_url(&mock_server.uri())
        .await
        .expect("Analysis failed");

    assert_eq!(result.internal_links, 1);
    assert_eq!(result.external_links, 4);
    assert_eq!(result.inaccessible_links, 3);
}

#[tokio::test]
async fn test_slow_probe_counts_as_inaccessible_without_failing_analysis() {
    let mock_server = MockServer::start().await;
    let external = external_base(&mock_server);

    mount_page(
        &mock_server,
        "/",
        format!(r#"<html><body><a href="{}/slow">slow</a></body></html>"#, external),
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let result = create_test_analyzer()
        .analyze_url(&mock_server.uri())
        .await
        .expect("Analysis failed");

    assert_eq!(result.external_links, 1);
    assert_eq!(result.inaccessible_links, 1);
}

#[tokio::test]
async fn test_html5_page() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<!DOCTYPE html>
        <html>
        <head><title>  Modern  </title></head>
        <body>
            <header><nav><a href="/home">Home</a></nav></header>
            <main><h1>One</h1><h1>Two</h1><h3>Three</h3></main>
            <footer></footer>
        </body>
        </html>"#
            .to_string(),
    )
    .await;

    let result = create_test_analyzer()
        .analyze_url(&mock_server.uri())
        .await
        .expect("Analysis failed");

    assert_eq!(result.html_version, HtmlVersion::Html5);
    assert_eq!(result.title, "Modern");
    assert_eq!(result.headings.get("h1"), Some(&2));
    assert_eq!(result.headings.get("h3"), Some(&1));
    assert!(result.headings.get("h2").is_none());
    assert_eq!(result.internal_links, 1);
    assert_eq!(result.external_links, 0);
    assert!(!result.has_login_form);
}

#[tokio::test]
async fn test_xhtml_page() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>X</title></head><body><div/></body></html>"#
            .to_string(),
    )
    .await;

    let result = create_test_analyzer()
        .analyze_url(&mock_server.uri())
        .await
        .expect("Analysis failed");

    assert_eq!(result.html_version, HtmlVersion::Xhtml);
}

#[tokio::test]
async fn test_non_200_status_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html><a href='/x'>x</a></html>"))
        .mount(&mock_server)
        .await;

    let result = create_test_analyzer()
        .analyze_url(&format!("{}/missing", mock_server.uri()))
        .await;

    match result {
        Err(AnalysisError::UnsuccessfulStatus {
            status_code,
            description,
        }) => {
            assert_eq!(status_code, 404);
            assert_eq!(
                description,
                "Not Found - The requested resource was not found on the server"
            );
        }
        other => panic!("Expected UnsuccessfulStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_status_gets_generic_description() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&mock_server)
        .await;

    let error = create_test_analyzer()
        .analyze_url(&mock_server.uri())
        .await
        .expect_err("Expected failure");

    assert_eq!(error.code(), "HTTP_STATUS_ERROR");
    assert!(error.to_string().contains("418"));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let error = create_test_analyzer()
        .analyze_url(&closed_port_url("127.0.0.1"))
        .await
        .expect_err("Expected failure");

    assert!(matches!(error, AnalysisError::Network { .. }));
    assert_eq!(error.code(), "URL_FETCH_ERROR");
}

#[tokio::test]
async fn test_page_timeout_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let start = Instant::now();
    let error = create_test_analyzer()
        .analyze_url(&mock_server.uri())
        .await
        .expect_err("Expected timeout");

    match error {
        AnalysisError::Network { source, .. } => assert!(source.is_timeout()),
        other => panic!("Expected Network timeout, got {:?}", other),
    }
    assert!(start.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_missing_scheme_defaults_to_https() {
    let mock_server = MockServer::start().await;
    let address = mock_server.address().to_string();

    // The mock server speaks plain HTTP, so the TLS handshake fails
    let error = create_test_analyzer()
        .analyze_url(&address)
        .await
        .expect_err("Expected TLS failure");

    match error {
        AnalysisError::Network { url, .. } => assert!(url.starts_with("https://")),
        other => panic!("Expected Network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_repeated_analysis_is_identical_except_timestamp() {
    let mock_server = MockServer::start().await;
    let external = external_base(&mock_server);

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html lang="en"><head><title>Stable</title></head><body>
                <h2>a</h2><a href="/x">x</a><a href="{}/y">y</a>
            </body></html>"#,
            external
        ),
    )
    .await;

    Mock::given(method("HEAD"))
        .and(path("/y"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let analyzer = create_test_analyzer();
    let first = analyzer.analyze_url(&mock_server.uri()).await.unwrap();
    let mut second = analyzer.analyze_url(&mock_server.uri()).await.unwrap();

    assert!(second.analysis_time >= first.analysis_time);
    second.analysis_time = first.analysis_time;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_analyses_are_independent() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/a",
        "<html><head><title>A</title></head><body><h1>a</h1></body></html>".to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        "<html><head><title>B</title></head><body><h2>b</h2><h2>b</h2></body></html>"
            .to_string(),
    )
    .await;

    let analyzer = create_test_analyzer();
    let url_a = format!("{}/a", mock_server.uri());
    let url_b = format!("{}/b", mock_server.uri());

    let (a, b) = tokio::join!(analyzer.analyze_url(&url_a), analyzer.analyze_url(&url_b));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.title, "A");
    assert_eq!(a.headings.get("h1"), Some(&1));
    assert_eq!(b.title, "B");
    assert_eq!(b.headings.get("h2"), Some(&2));
}

#[tokio::test]
async fn test_cancelled_analysis_is_abandoned_promptly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let analyzer = create_test_analyzer();
    let start = Instant::now();
    let outcome = tokio::time::timeout(
        Duration::from_millis(200),
        analyzer.analyze_url(&mock_server.uri()),
    )
    .await;

    assert!(outcome.is_err(), "Analysis should have been cancelled");
    assert!(start.elapsed() < Duration::from_secs(1));
}
