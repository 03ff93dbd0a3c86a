// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;
use std::time::Duration;

#[test]
fn test_defaults_load_without_config_files() {
    let settings = Settings::new().expect("defaults should load");

    assert_eq!(settings.crawl.max_pages, 15);
    assert_eq!(settings.crawl.max_depth, 3);
    assert!(settings.crawl.use_memory);
    assert!(!settings.crawl.cluster_results);
    assert_eq!(settings.crawl.max_clusters, 5);
    assert!(!settings.crawl.same_domain_only);

    assert!(settings.fetcher.respect_robots);
    assert_eq!(settings.fetcher.rate_limit_ms, 1000);
    assert_eq!(settings.llm.model, "gpt-4");
    assert!(settings.llm.api_key.is_none());
}

#[test]
fn test_duration_helpers() {
    let fetcher = FetcherSettings {
        user_agent: "ua".to_string(),
        respect_robots: true,
        rate_limit_ms: 250,
        fetch_timeout_secs: 30,
    };
    assert_eq!(fetcher.rate_limit(), Duration::from_millis(250));
    assert_eq!(fetcher.fetch_timeout(), Duration::from_secs(30));

    let llm = LlmSettings {
        api_key: None,
        model: "m".to_string(),
        api_base_url: "http://localhost".to_string(),
        analysis_timeout_secs: 60,
    };
    assert_eq!(llm.analysis_timeout(), Duration::from_secs(60));
}
