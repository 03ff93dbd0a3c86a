// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含爬取预算、礼貌策略、记忆、聚类和LLM等所有配置项。
/// 配置在爬取开始时加载一次，爬取期间不可变。
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 爬取配置
    pub crawl: CrawlSettings,
    /// 抓取器配置
    pub fetcher: FetcherSettings,
    /// LLM分析器配置
    pub llm: LlmSettings,
}

/// 爬取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlSettings {
    /// 最大爬取页面数
    pub max_pages: usize,
    /// 最大链接深度（种子页深度为0）
    pub max_depth: usize,
    /// 是否启用跨页记忆
    pub use_memory: bool,
    /// 是否对结果进行主题聚类
    pub cluster_results: bool,
    /// 最大聚类数
    pub max_clusters: usize,
    /// 是否限制在种子域名内（站点映射模式使用）
    pub same_domain_only: bool,
}

/// 抓取器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherSettings {
    /// 请求使用的User-Agent
    pub user_agent: String,
    /// 是否遵守robots.txt
    pub respect_robots: bool,
    /// 同一域名两次请求间的最小间隔（毫秒）
    pub rate_limit_ms: u64,
    /// 单次抓取超时时间（秒）
    pub fetch_timeout_secs: u64,
}

/// LLM分析器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// LLM API密钥
    pub api_key: Option<String>,
    /// 使用的模型名称
    pub model: String,
    /// LLM API基础URL
    pub api_base_url: String,
    /// 单次分析调用超时时间（秒）
    pub analysis_timeout_secs: u64,
}

impl FetcherSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}

impl LlmSettings {
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout_secs)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default crawl budgets
            .set_default("crawl.max_pages", 15)?
            .set_default("crawl.max_depth", 3)?
            .set_default("crawl.use_memory", true)?
            .set_default("crawl.cluster_results", false)?
            .set_default("crawl.max_clusters", 5)?
            .set_default("crawl.same_domain_only", false)?
            // Default fetcher politeness
            .set_default("fetcher.user_agent", "Mozilla/5.0 (compatible; siftrs/0.1)")?
            .set_default("fetcher.respect_robots", true)?
            .set_default("fetcher.rate_limit_ms", 1000)?
            .set_default("fetcher.fetch_timeout_secs", 30)?
            // Default LLM settings
            .set_default("llm.model", "gpt-4")?
            .set_default("llm.api_base_url", "https://api.openai.com/v1")?
            .set_default("llm.analysis_timeout_secs", 60)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SIFTRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
