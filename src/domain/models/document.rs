// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::judgment::Section;

/// 最终文档
///
/// 由被接受的页面判断（relevance_score > 0）组装而成，
/// 创建后不可变，之后只被排序、聚类和导出读取。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// 来源URL
    pub url: String,
    /// 文档标题
    pub title: String,
    /// 内容片段
    pub sections: Vec<Section>,
    /// 关键要点
    pub key_points: Vec<String>,
    /// 相关性评分（0-10）
    pub relevance_score: u8,
    /// 简要总结
    pub summary: String,
    /// 创建时间戳
    pub timestamp: DateTime<Utc>,
}

/// 主题聚类
///
/// 最终聚类结果中每个文档恰好属于一个聚类
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// 聚类名称
    pub name: String,
    /// 聚类描述
    pub description: String,
    /// 聚类成员（有序）
    pub documents: Vec<Document>,
}

/// 爬取统计信息
///
/// 无论单页错误发生多少次，最终结果都包含这些统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlStats {
    /// 已访问页面数
    pub pages_visited: usize,
    /// 产生内容的页面数
    pub pages_with_content: usize,
    /// 抓取失败次数
    pub fetch_errors: usize,
    /// 分析失败次数
    pub analysis_errors: usize,
    /// 总耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 一次爬取的完整结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    /// 本次爬取的唯一标识
    pub crawl_id: Uuid,
    /// 种子URL
    pub base_url: String,
    /// 用户指令
    pub instructions: String,
    /// 按相关性排序的文档列表
    pub documents: Vec<Document>,
    /// 主题聚类（启用聚类时）
    pub clusters: Option<Vec<Cluster>>,
    /// 爬取过程中发现的主题（去重、保持首见顺序）
    pub discovered_topics: Vec<String>,
    /// 统计信息
    pub stats: CrawlStats,
}

/// 站点地图中的一个页面节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitePage {
    /// 页面URL
    pub url: String,
    /// 页面标题
    pub title: String,
    /// 距种子的链接跳数
    pub depth: usize,
    /// 出站链接数
    pub outgoing_links: usize,
    /// 文本内容大小（字节）
    pub content_size: usize,
}

/// 站点结构地图
///
/// 站点映射模式的输出：同域范围内的轻量结构遍历结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMap {
    /// 种子URL
    pub base_url: String,
    /// 已映射页面
    pub pages: Vec<SitePage>,
    /// 按深度分组的URL
    pub pages_by_depth: Vec<(usize, Vec<String>)>,
}
