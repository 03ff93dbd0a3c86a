// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 判断中的一个内容片段
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    /// 片段标题
    pub title: String,
    /// 片段内容
    pub content: String,
}

/// 分析器对单个页面的相关性判断
///
/// 每个被抓取的页面最多产生一个判断，创建后不可变。
/// 结构不完整的分析器输出在边界处被规范化为默认值，
/// 而不是在消费方分散处理。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageJudgment {
    /// 相关性评分（0-10整数）
    pub relevance_score: u8,
    /// 相关内容片段（有序）
    pub sections: Vec<Section>,
    /// 关键要点（有序）
    pub key_points: Vec<String>,
    /// 简要总结
    pub summary: String,
    /// 新发现的概念
    pub new_concepts: Vec<String>,
    /// 与已收集信息的矛盾（有序）
    pub contradictions: Vec<String>,
}

impl PageJudgment {
    /// 从分析器返回的JSON值构造判断，在边界处应用默认规则
    ///
    /// 缺失或类型错误的字段回退为空值，评分被限制在0-10。
    /// 完全无法解析的值产生零相关性的空判断，不会报错。
    pub fn from_value(value: &Value) -> Self {
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return Self::default(),
        };

        let relevance_score = obj
            .get("relevance_score")
            .and_then(Value::as_u64)
            .map(|s| s.min(10) as u8)
            .unwrap_or(0);

        let sections = obj
            .get("relevant_sections")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|s| {
                        let title = s.get("title")?.as_str()?.to_string();
                        let content = s
                            .get("content")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string();
                        Some(Section { title, content })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            relevance_score,
            sections,
            key_points: string_array(obj.get("key_points")),
            summary: obj
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            new_concepts: string_array(obj.get("new_concepts")),
            contradictions: string_array(obj.get("contradictions")),
        }
    }

    /// 判断是否为空（没有任何可吸收的信号）
    pub fn is_empty(&self) -> bool {
        self.relevance_score == 0
            && self.sections.is_empty()
            && self.key_points.is_empty()
            && self.summary.is_empty()
            && self.new_concepts.is_empty()
            && self.contradictions.is_empty()
    }
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
