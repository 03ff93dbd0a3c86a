// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::domain::models::document::{CrawlOutcome, CrawlStats, SiteMap, SitePage};
use crate::domain::models::judgment::PageJudgment;
use crate::domain::services::analyzer::{ContentAnalyzer, LinkContext};
use crate::domain::services::frontier::FrontierManager;
use crate::domain::services::memory::{DiscoveredTopics, KnowledgeMemory};
use crate::domain::services::processor::DocumentProcessor;
use crate::engines::traits::PageFetcher;

/// 单次链接扩展提交给分析器的链接数上限
const MAX_LINKS_PER_EXPANSION: usize = 10;

/// 爬取级错误
///
/// 只有无法开始爬取的条件才会上升为错误；单页的抓取和分析
/// 失败在循环内局部恢复，绝不中止整个爬取。
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 种子URL无法解析
    #[error("Invalid seed URL '{0}': {1}")]
    InvalidSeedUrl(String, url::ParseError),
}

/// 爬取编排器
///
/// 驱动顺序遍历循环：出队、抓取、判断、吸收、组装、扩展。
/// 抓取器和分析器通过特质注入，编排逻辑对具体实现无感知。
pub struct CrawlOrchestrator<F, A> {
    fetcher: F,
    analyzer: A,
    settings: Settings,
    cancelled: Arc<AtomicBool>,
}

impl<F, A> CrawlOrchestrator<F, A>
where
    F: PageFetcher,
    A: ContentAnalyzer,
{
    /// 创建新的编排器实例
    pub fn new(fetcher: F, analyzer: A, settings: Settings) -> Self {
        Self {
            fetcher,
            analyzer,
            settings,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 取消标志的句柄
    ///
    /// 置位后编排器在下一次迭代边界停止，已积累的结果照常返回
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// 执行一次指令引导的爬取
    ///
    /// 从种子URL开始广度优先遍历，直到页面预算耗尽、队列为空
    /// 或被取消。返回按相关性排序的文档、可选的主题聚类、
    /// 发现的主题和统计信息。
    pub async fn run(&self, base_url: &str, instructions: &str) -> Result<CrawlOutcome, CrawlError> {
        let seed = Url::parse(base_url)
            .map_err(|e| CrawlError::InvalidSeedUrl(base_url.to_string(), e))?;

        let crawl_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            %crawl_id,
            base_url,
            max_pages = self.settings.crawl.max_pages,
            max_depth = self.settings.crawl.max_depth,
            "Starting crawl"
        );

        let mut frontier = FrontierManager::new(
            &seed,
            self.settings.crawl.max_pages,
            self.settings.crawl.max_depth,
            self.settings.crawl.same_domain_only,
        );
        let mut memory = KnowledgeMemory::new();
        let mut topics = DiscoveredTopics::new();
        let mut documents = Vec::new();
        let mut stats = CrawlStats::default();

        while !self.cancelled.load(Ordering::Relaxed) {
            let entry = match frontier.next_entry() {
                Some(entry) => entry,
                None => break,
            };
            debug!(url = %entry.url, depth = entry.depth, "Visiting page");

            let page = match self.fetcher.fetch(&entry.url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %entry.url, error = %e, "Fetch failed, skipping page");
                    stats.fetch_errors += 1;
                    continue;
                }
            };

            let context = if self.settings.crawl.use_memory {
                memory.context_for_analysis()
            } else {
                Default::default()
            };
            let judgment = match self.analyzer.judge(&page, instructions, &context).await {
                Ok(judgment) => {
                    memory.absorb(&judgment);
                    judgment
                }
                Err(e) => {
                    warn!(url = %entry.url, error = %e, "Analysis failed, treating page as empty");
                    stats.analysis_errors += 1;
                    PageJudgment::default()
                }
            };

            let mut accepted = DocumentProcessor::accept(&entry.url, &page.title, &judgment);

            // Links are cut at max_depth: pages at the budget are fetched
            // and judged but never expanded
            let remaining = self
                .settings
                .crawl
                .max_pages
                .saturating_sub(frontier.visited_count());
            if entry.depth < frontier.max_depth() && !page.links.is_empty() && remaining > 0 {
                let link_context = LinkContext {
                    visited: frontier.visited_urls(),
                    current_depth: entry.depth,
                    max_depth: frontier.max_depth(),
                    discovered_topics: topics.as_slice().to_vec(),
                    max_links: remaining.min(MAX_LINKS_PER_EXPANSION),
                };
                match self
                    .analyzer
                    .prioritize_links(&page, instructions, &link_context)
                    .await
                {
                    Ok(proposal) => {
                        topics.fold(proposal.new_topics);
                        for link in &proposal.links {
                            frontier.enqueue(link, entry.depth + 1, Some(&entry.url));
                        }
                    }
                    Err(e) => {
                        warn!(url = %entry.url, error = %e, "Link prioritization failed");
                        stats.analysis_errors += 1;
                        // The page stays counted as visited but contributes
                        // neither links nor a document
                        accepted = None;
                    }
                }
            }

            if let Some(document) = accepted {
                stats.pages_with_content += 1;
                documents.push(document);
            }
        }

        let documents = DocumentProcessor::rank(documents);

        let clusters = if self.settings.crawl.cluster_results && !documents.is_empty() {
            let proposals = match self
                .analyzer
                .propose_clusters(&documents, self.settings.crawl.max_clusters)
                .await
            {
                Ok(proposals) => Some(proposals),
                Err(e) => {
                    warn!(error = %e, "Clustering failed, degrading to a single cluster");
                    stats.analysis_errors += 1;
                    None
                }
            };
            Some(DocumentProcessor::assemble_clusters(&documents, proposals))
        } else {
            None
        };

        stats.pages_visited = frontier.visited_count();
        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            %crawl_id,
            pages_visited = stats.pages_visited,
            documents = documents.len(),
            fetch_errors = stats.fetch_errors,
            analysis_errors = stats.analysis_errors,
            "Crawl finished"
        );

        Ok(CrawlOutcome {
            crawl_id,
            base_url: base_url.to_string(),
            instructions: instructions.to_string(),
            documents,
            clusters,
            discovered_topics: topics.into_vec(),
            stats,
        })
    }

    /// 映射站点结构
    ///
    /// 同域范围内的轻量结构遍历：不做内容判断，只记录每页的
    /// 标题、深度、出站链接数和内容大小。所有出站链接都入队，
    /// 由边界管理器负责域名和深度过滤。
    pub async fn map_site(&self, base_url: &str) -> Result<SiteMap, CrawlError> {
        let seed = Url::parse(base_url)
            .map_err(|e| CrawlError::InvalidSeedUrl(base_url.to_string(), e))?;

        info!(base_url, "Starting site mapping");
        let mut frontier = FrontierManager::new(
            &seed,
            self.settings.crawl.max_pages,
            self.settings.crawl.max_depth,
            true,
        );
        let mut pages = Vec::new();

        while !self.cancelled.load(Ordering::Relaxed) {
            let entry = match frontier.next_entry() {
                Some(entry) => entry,
                None => break,
            };

            let page = match self.fetcher.fetch(&entry.url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %entry.url, error = %e, "Fetch failed during site mapping");
                    continue;
                }
            };

            pages.push(SitePage {
                url: entry.url.clone(),
                title: page.title.clone(),
                depth: entry.depth,
                outgoing_links: page.links.len(),
                content_size: page.text.len(),
            });

            for link in &page.links {
                frontier.enqueue(&link.url, entry.depth + 1, Some(&entry.url));
            }
        }

        let mut by_depth: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for page in &pages {
            by_depth.entry(page.depth).or_default().push(page.url.clone());
        }

        Ok(SiteMap {
            base_url: base_url.to_string(),
            pages,
            pages_by_depth: by_depth.into_iter().collect(),
        })
    }
}
