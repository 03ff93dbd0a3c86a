// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::{HashSet, VecDeque};

use crate::domain::models::judgment::PageJudgment;

/// 传给分析器的记忆上下文中最多包含的总结条数
const CONTEXT_SUMMARIES: usize = 3;
/// 传给分析器的记忆上下文中最多包含的概念条数
const CONTEXT_CONCEPTS: usize = 20;
/// 总结日志保留的最近条数
const MAX_SUMMARIES: usize = 50;

/// 分析请求中携带的有界记忆视图
///
/// 边界只为控制请求大小，不表示不同的保留策略
#[derive(Debug, Clone, Default)]
pub struct MemoryContext {
    /// 最近的页面总结
    pub recent_summaries: Vec<String>,
    /// 已识别的关键概念
    pub key_concepts: Vec<String>,
}

impl MemoryContext {
    pub fn is_empty(&self) -> bool {
        self.recent_summaries.is_empty() && self.key_concepts.is_empty()
    }
}

/// 知识记忆
///
/// 积累跨页面的总结、概念集合和矛盾日志，为分析器提供上下文
/// 并折叠其输出。除总结日志的"最近N条"窗口外永不收缩。
/// 爬取开始时创建为空，结束时销毁（除非调用方导出）。
#[derive(Debug, Default)]
pub struct KnowledgeMemory {
    /// 页面总结（有序，保留最近N条）
    summaries: VecDeque<String>,
    /// 关键概念集合（单调增长）
    concepts: HashSet<String>,
    /// 概念的首见顺序
    concept_order: Vec<String>,
    /// 矛盾日志（有序）
    contradictions: Vec<String>,
}

impl KnowledgeMemory {
    /// 创建空的知识记忆
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回适合包含在分析请求中的有界视图
    pub fn context_for_analysis(&self) -> MemoryContext {
        let recent_summaries = self
            .summaries
            .iter()
            .rev()
            .take(CONTEXT_SUMMARIES)
            .rev()
            .cloned()
            .collect();

        let key_concepts = self
            .concept_order
            .iter()
            .take(CONTEXT_CONCEPTS)
            .cloned()
            .collect();

        MemoryContext {
            recent_summaries,
            key_concepts,
        }
    }

    /// 吸收一个页面判断
    ///
    /// 每个产生了判断的已抓取页面恰好调用一次，零相关性页面
    /// 也可能携带有用的概念/矛盾信号。空判断不做任何修改；
    /// 分析失败的页面不调用此方法，保证跳过的页面不会污染
    /// 已积累的状态。
    pub fn absorb(&mut self, judgment: &PageJudgment) {
        if judgment.is_empty() {
            return;
        }

        if !judgment.summary.is_empty() {
            self.summaries.push_back(judgment.summary.clone());
            while self.summaries.len() > MAX_SUMMARIES {
                self.summaries.pop_front();
            }
        }

        for concept in &judgment.new_concepts {
            if self.concepts.insert(concept.clone()) {
                self.concept_order.push(concept.clone());
            }
        }

        self.contradictions
            .extend(judgment.contradictions.iter().cloned());
    }

    /// 已积累的总结条数
    pub fn summary_count(&self) -> usize {
        self.summaries.len()
    }

    /// 概念集合是否包含指定概念
    pub fn has_concept(&self, concept: &str) -> bool {
        self.concepts.contains(concept)
    }

    /// 概念总数
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// 矛盾日志
    pub fn contradictions(&self) -> &[String] {
        &self.contradictions
    }
}

/// 发现的主题
///
/// 去重且保持首见顺序的主题序列，单次爬取内只追加
#[derive(Debug, Default)]
pub struct DiscoveredTopics {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl DiscoveredTopics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 折叠一批新主题，重复项被忽略，首见顺序保持不变
    pub fn fold(&mut self, topics: impl IntoIterator<Item = String>) {
        for topic in topics {
            if self.seen.insert(topic.clone()) {
                self.order.push(topic);
            }
        }
    }

    /// 当前主题序列（首见顺序）
    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    /// 转换为主题列表
    pub fn into_vec(self) -> Vec<String> {
        self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
