// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;

use siftrs::config::settings::{CrawlSettings, FetcherSettings, LlmSettings, Settings};
use siftrs::domain::models::document::Document;
use siftrs::domain::models::judgment::{PageJudgment, Section};
use siftrs::domain::models::page::FetchedPage;
use siftrs::domain::services::analyzer::{
    AnalysisError, ClusterProposal, ContentAnalyzer, LinkContext, LinkProposal,
};
use siftrs::domain::services::memory::MemoryContext;

/// Keyword-driven analyzer stub: pages whose text contains the keyword
/// are judged relevant, every outgoing link is worth following.
pub struct KeywordAnalyzer {
    pub keyword: String,
}

#[async_trait]
impl ContentAnalyzer for KeywordAnalyzer {
    async fn judge(
        &self,
        page: &FetchedPage,
        _instructions: &str,
        _memory: &MemoryContext,
    ) -> Result<PageJudgment, AnalysisError> {
        if !page.text.to_lowercase().contains(&self.keyword) {
            return Ok(PageJudgment::default());
        }
        Ok(PageJudgment {
            relevance_score: 8,
            sections: vec![Section {
                title: format!("About {}", self.keyword),
                content: page.text.clone(),
            }],
            key_points: vec![format!("{} found on {}", self.keyword, page.url)],
            summary: format!("Page about {}", self.keyword),
            new_concepts: vec![self.keyword.clone()],
            contradictions: vec![],
        })
    }

    async fn prioritize_links(
        &self,
        page: &FetchedPage,
        _instructions: &str,
        context: &LinkContext,
    ) -> Result<LinkProposal, AnalysisError> {
        let mut links: Vec<String> = page.links.iter().map(|l| l.url.clone()).collect();
        links.truncate(context.max_links);
        Ok(LinkProposal {
            links,
            new_topics: vec![self.keyword.clone()],
        })
    }

    async fn propose_clusters(
        &self,
        documents: &[Document],
        _max_clusters: usize,
    ) -> Result<Vec<ClusterProposal>, AnalysisError> {
        Ok(vec![ClusterProposal {
            name: self.keyword.clone(),
            description: format!("Documents about {}", self.keyword),
            document_indices: (0..documents.len()).collect(),
        }])
    }
}

pub fn test_settings(max_pages: usize, max_depth: usize) -> Settings {
    Settings {
        crawl: CrawlSettings {
            max_pages,
            max_depth,
            use_memory: true,
            cluster_results: false,
            max_clusters: 5,
            same_domain_only: false,
        },
        fetcher: FetcherSettings {
            user_agent: "siftrs-integration/0.1".to_string(),
            respect_robots: true,
            rate_limit_ms: 0,
            fetch_timeout_secs: 5,
        },
        llm: LlmSettings {
            api_key: None,
            model: "unused".to_string(),
            api_base_url: "http://localhost".to_string(),
            analysis_timeout_secs: 5,
        },
    }
}
