// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::document::Document;
use crate::domain::models::judgment::PageJudgment;
use crate::domain::models::page::FetchedPage;
use crate::domain::services::memory::MemoryContext;

/// 分析错误类型
///
/// 判断或链接优先级调用失败、或返回无法使用的数据。
/// 与抓取错误一样在编排层被局部恢复，不会中止爬取。
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// 分析服务调用失败
    #[error("Analyzer request failed: {0}")]
    RequestFailed(String),
    /// 返回数据格式错误
    #[error("Malformed analyzer response: {0}")]
    MalformedResponse(String),
    /// 未配置分析服务
    #[error("Analyzer not configured: {0}")]
    NotConfigured(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
}

/// 链接优先级分析的上下文
///
/// 每次调用都携带全新拷贝的集合，永不依赖共享可变默认值
#[derive(Debug, Clone, Default)]
pub struct LinkContext {
    /// 已访问的URL
    pub visited: Vec<String>,
    /// 当前页面深度
    pub current_depth: usize,
    /// 最大深度
    pub max_depth: usize,
    /// 已发现的主题
    pub discovered_topics: Vec<String>,
    /// 返回链接数上限
    pub max_links: usize,
}

/// 链接优先级分析的结果
#[derive(Debug, Clone, Default)]
pub struct LinkProposal {
    /// 按优先级排序的URL子集
    pub links: Vec<String>,
    /// 预期发现的新主题
    pub new_topics: Vec<String>,
}

/// 聚类提案
///
/// 分析器给出分组决定，文档索引指向原列表中的0起始位置；
/// 组装契约（每个索引至多一次、遗漏索引入兜底聚类）由
/// 文档处理器负责执行。
#[derive(Debug, Clone)]
pub struct ClusterProposal {
    /// 聚类名称
    pub name: String,
    /// 聚类描述
    pub description: String,
    /// 成员文档索引
    pub document_indices: Vec<usize>,
}

/// 内容分析器特质
///
/// 对页面文本进行语义推理的外部协作方的接口：
/// 相关性判断、链接优先级和文档聚类决定。
#[async_trait]
pub trait ContentAnalyzer: Send + Sync {
    /// 对单个页面产生相关性判断，可参考已积累的记忆上下文
    async fn judge(
        &self,
        page: &FetchedPage,
        instructions: &str,
        memory: &MemoryContext,
    ) -> Result<PageJudgment, AnalysisError>;

    /// 从页面出站链接中挑选值得跟进的子集，并预测新主题
    async fn prioritize_links(
        &self,
        page: &FetchedPage,
        instructions: &str,
        context: &LinkContext,
    ) -> Result<LinkProposal, AnalysisError>;

    /// 将文档组织为最多max_clusters个主题聚类
    async fn propose_clusters(
        &self,
        documents: &[Document],
        max_clusters: usize,
    ) -> Result<Vec<ClusterProposal>, AnalysisError>;
}
