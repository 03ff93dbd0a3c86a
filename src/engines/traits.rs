// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::page::FetchedPage;

/// 抓取错误类型
///
/// 抓取错误在编排层被局部恢复：记录到对应URL后继续遍历，
/// 永远不会中止整个爬取。
#[derive(Error, Debug)]
pub enum FetchError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 被robots.txt策略拒绝
    #[error("Blocked by robots policy: {0}")]
    RobotsDenied(String),
    /// 无效的URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl FetchError {
    /// 判断错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            FetchError::Timeout => true,
            // Policy and validation failures are permanent for this crawl
            _ => false,
        }
    }
}

/// 页面抓取引擎特质
///
/// 给定URL返回页面文本、标题、出站链接和结构化元数据。
/// 实现负责robots策略检查和域名级速率限制。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取单个页面
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
