// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::settings::FetcherSettings;
use crate::domain::models::page::{FetchedPage, PageLink};
use crate::engines::traits::{FetchError, PageFetcher};
use crate::utils::rate_limit::DomainRateLimiter;
use crate::utils::robots::{RobotsChecker, RobotsCheckerTrait};
use crate::utils::url_utils::resolve_url;

// Selectors are static strings, parse failures are programmer errors
static ANCHOR_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static META_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static LD_JSON_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static BODY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// 基于reqwest和scraper的页面抓取引擎
///
/// 抓取前检查robots策略并应用域名级速率限制，
/// 返回的所有链接都已解析为绝对形式。
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetcherSettings,
    robots: RobotsChecker,
    rate_limiter: DomainRateLimiter,
}

impl ReqwestFetcher {
    /// 创建新的抓取引擎实例
    pub fn new(settings: FetcherSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.fetch_timeout())
            .build()
            .map_err(FetchError::RequestFailed)?;
        let rate_limiter = DomainRateLimiter::new(settings.rate_limit());

        Ok(Self {
            client,
            settings,
            robots: RobotsChecker::new(),
            rate_limiter,
        })
    }

    /// 从HTML文档提取页面内容
    fn parse_page(url: &Url, html: &str) -> FetchedPage {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE_SEL)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let meta_description = document
            .select(&META_SEL)
            .next()
            .and_then(|m| m.value().attr("content"))
            .unwrap_or_default()
            .to_string();

        // First parseable ld+json block only
        let structured_data = document
            .select(&LD_JSON_SEL)
            .filter_map(|s| serde_json::from_str::<Value>(&s.text().collect::<String>()).ok())
            .next();

        let mut links = Vec::new();
        for element in document.select(&ANCHOR_SEL) {
            let href = match element.value().attr("href") {
                Some(h) => h,
                None => continue,
            };
            // Ignore fragment identifiers, mailto and javascript links
            if href.starts_with('#') || href.starts_with("mailto:") || href.starts_with("javascript:")
            {
                continue;
            }
            if let Ok(resolved) = resolve_url(url, href) {
                if resolved.scheme() == "http" || resolved.scheme() == "https" {
                    let text = element.text().collect::<String>().trim().to_string();
                    links.push(PageLink {
                        url: resolved.to_string(),
                        text: if text.is_empty() {
                            "(No link text)".to_string()
                        } else {
                            text
                        },
                    });
                }
            }
        }

        let text = document
            .select(&BODY_SEL)
            .next()
            .map(|body| {
                body.text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        FetchedPage {
            url: url.to_string(),
            title,
            text,
            links,
            meta_description,
            structured_data,
        }
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, url_str: &str) -> Result<FetchedPage, FetchError> {
        debug!("Fetching page: {}", url_str);
        let url = Url::parse(url_str).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        // Robots policy check happens before any request for the page
        let mut crawl_delay = None;
        if self.settings.respect_robots {
            let allowed = self
                .robots
                .is_allowed(url_str, &self.settings.user_agent)
                .await
                .map_err(|e| FetchError::Other(e.to_string()))?;
            if !allowed {
                return Err(FetchError::RobotsDenied(url_str.to_string()));
            }
            crawl_delay = self
                .robots
                .get_crawl_delay(url_str, &self.settings.user_agent)
                .await
                .unwrap_or(None);
        }

        self.rate_limiter.acquire(&url, crawl_delay).await;

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Other(format!(
                "HTTP status {} for {}",
                status, url_str
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        if !content_type.contains("text/html") {
            warn!("URL {} returned non-HTML content: {}", url_str, content_type);
        }

        let html = response.text().await?;
        Ok(Self::parse_page(&url, &html))
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
