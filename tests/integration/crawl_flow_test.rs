// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use siftrs::domain::services::orchestrator::CrawlOrchestrator;
use siftrs::engines::reqwest_fetcher::ReqwestFetcher;
use siftrs::export::{ExportFormat, Exporter};

use super::helpers::{test_settings, KeywordAnalyzer};

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .mount(server)
        .await;

    let home = r#"<html><head><title>Acme Home</title></head><body>
            <p>Welcome to Acme, home of affordable pricing plans.</p>
            <a href="/pricing">Pricing</a>
            <a href="/about">About us</a>
        </body></html>"#;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(home))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pricing"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Pricing</title></head><body>
                <p>Our pricing starts at $5 per month.</p>
            </body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>About</title></head><body>
                <p>Founded in a garage.</p>
            </body></html>"#,
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_crawl_collects_relevant_documents() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let settings = test_settings(10, 2);
    let fetcher = ReqwestFetcher::new(settings.fetcher.clone()).unwrap();
    let analyzer = KeywordAnalyzer {
        keyword: "pricing".to_string(),
    };
    let orchestrator = CrawlOrchestrator::new(fetcher, analyzer, settings);

    let seed = format!("{}/", server.uri());
    let outcome = orchestrator
        .run(&seed, "Find pricing information")
        .await
        .expect("crawl should succeed");

    // Home and pricing mention the keyword, about does not
    assert_eq!(outcome.stats.pages_visited, 3);
    assert_eq!(outcome.stats.fetch_errors, 0);
    assert_eq!(outcome.documents.len(), 2);
    assert!(outcome
        .documents
        .iter()
        .any(|d| d.url.ends_with("/pricing")));
    assert_eq!(outcome.discovered_topics, vec!["pricing"]);

    // The collected documents survive a JSON export round trip
    let json = Exporter::serialize(&outcome.documents, ExportFormat::Json).unwrap();
    let restored: Vec<siftrs::domain::models::document::Document> =
        serde_json::from_str(&json).unwrap();
    assert_eq!(restored.len(), outcome.documents.len());
}

#[tokio::test]
async fn test_robots_disallow_is_counted_not_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>Home</title></head><body>
                <p>pricing overview</p>
                <a href="/private">Secret pricing</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let settings = test_settings(10, 2);
    let fetcher = ReqwestFetcher::new(settings.fetcher.clone()).unwrap();
    let analyzer = KeywordAnalyzer {
        keyword: "pricing".to_string(),
    };
    let orchestrator = CrawlOrchestrator::new(fetcher, analyzer, settings);

    let outcome = orchestrator
        .run(&format!("{}/", server.uri()), "Find pricing information")
        .await
        .expect("crawl should succeed");

    // The disallowed page is attempted, denied, and recorded as an error
    assert_eq!(outcome.stats.pages_visited, 2);
    assert_eq!(outcome.stats.fetch_errors, 1);
    assert_eq!(outcome.documents.len(), 1);
}

#[tokio::test]
async fn test_map_site_reports_structure() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let settings = test_settings(10, 2);
    let fetcher = ReqwestFetcher::new(settings.fetcher.clone()).unwrap();
    let analyzer = KeywordAnalyzer {
        keyword: "pricing".to_string(),
    };
    let orchestrator = CrawlOrchestrator::new(fetcher, analyzer, settings);

    let map = orchestrator
        .map_site(&format!("{}/", server.uri()))
        .await
        .expect("mapping should succeed");

    assert_eq!(map.pages.len(), 3);
    let home = map.pages.iter().find(|p| p.depth == 0).unwrap();
    assert_eq!(home.title, "Acme Home");
    assert_eq!(home.outgoing_links, 2);

    assert_eq!(map.pages_by_depth[0].0, 0);
    assert_eq!(map.pages_by_depth[0].1.len(), 1);
    assert_eq!(map.pages_by_depth[1].0, 1);
    assert_eq!(map.pages_by_depth[1].1.len(), 2);
}
