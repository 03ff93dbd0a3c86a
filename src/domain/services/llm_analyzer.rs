// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::settings::LlmSettings;
use crate::domain::models::document::Document;
use crate::domain::models::judgment::PageJudgment;
use crate::domain::models::page::FetchedPage;
use crate::domain::services::analyzer::{
    AnalysisError, ClusterProposal, ContentAnalyzer, LinkContext, LinkProposal,
};
use crate::domain::services::memory::MemoryContext;

/// 页面文本截断长度，避免超出令牌限制
const MAX_PAGE_TEXT: usize = 6000;
/// 单次优先级分析考虑的最大链接数
const MAX_CANDIDATE_LINKS: usize = 30;

/// 模型回复里偶尔出现的markdown代码栅栏
static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:json)?\s*|\s*```$").unwrap());

/// LLM内容分析器
///
/// 通过OpenAI兼容的chat completions接口实现内容分析器特质。
/// 响应在边界处被严格解析并应用默认规则，消费方永远不需要
/// 处理形状不确定的数据。
///
/// # 配置
///
/// - `api_key` - LLM API密钥
/// - `model` - 使用的模型名称
/// - `api_base_url` - LLM API基础URL
pub struct LlmAnalyzer {
    settings: LlmSettings,
    client: reqwest::Client,
}

impl LlmAnalyzer {
    /// 创建新的LLM分析器实例
    pub fn new(settings: LlmSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    /// 调用chat completions接口并将回复内容解析为JSON
    async fn chat_json(&self, system: &str, prompt: &str) -> Result<Value, AnalysisError> {
        let api_key = self
            .settings
            .api_key
            .as_ref()
            .ok_or_else(|| AnalysisError::NotConfigured("LLM API key not set".to_string()))?;

        let request_body = json!({
            "model": self.settings.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.3
        });

        let url = format!("{}/chat/completions", self.settings.api_base_url);
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .timeout(self.settings.analysis_timeout())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout
                } else {
                    AnalysisError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::RequestFailed(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AnalysisError::MalformedResponse("missing message content".to_string())
            })?;

        // Clean up potential markdown code blocks
        let clean_content = CODE_FENCE.replace_all(content.trim(), "");

        serde_json::from_str::<Value>(&clean_content)
            .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))
    }
}

/// 在字符边界处截断文本
fn truncate_text(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl ContentAnalyzer for LlmAnalyzer {
    async fn judge(
        &self,
        page: &FetchedPage,
        instructions: &str,
        memory: &MemoryContext,
    ) -> Result<PageJudgment, AnalysisError> {
        let truncated_text = truncate_text(&page.text, MAX_PAGE_TEXT);

        let mut memory_context = String::new();
        if !memory.recent_summaries.is_empty() {
            memory_context.push_str("Previous information collected:\n");
            for (i, summary) in memory.recent_summaries.iter().enumerate() {
                memory_context.push_str(&format!("{}. {}\n", i + 1, summary));
            }
        }
        if !memory.key_concepts.is_empty() {
            memory_context.push_str(&format!(
                "Key concepts already identified: {}\n",
                memory.key_concepts.join(", ")
            ));
        }

        let prompt = format!(
            r#"You are an AI web scraping assistant. Your task is to extract relevant information based on these instructions:
"{instructions}"

From the following web page content, extract only the information that is relevant to the instructions.

Title: {title}
URL: {url}
Description: {meta}

{memory_context}
Page Content:
{text}

Extract information in the following JSON format:
{{
  "relevant_sections": [
    {{
      "title": "Section title",
      "content": "Extracted content"
    }}
  ],
  "key_points": ["Key point 1", "Key point 2"],
  "new_concepts": ["New concept 1", "New concept 2"],
  "relevance_score": (0-10 score indicating how relevant this content is to the instructions),
  "summary": "A brief summary of the relevant information",
  "contradictions": ["Any contradiction with previously collected information"]
}}

Focus on extracting NEW information not already covered in the previous summaries.
If the page contains contradictory information compared to what was previously collected, highlight this in the "contradictions" field.
If the page has no relevant content, set relevance_score to 0 and leave the other fields empty.
Your response should be valid JSON without any additional text."#,
            instructions = instructions,
            title = page.title,
            url = page.url,
            meta = page.meta_description,
            memory_context = memory_context,
            text = truncated_text,
        );

        let value = self
            .chat_json(
                "You are a helpful AI web scraping assistant that extracts relevant information from web pages.",
                &prompt,
            )
            .await?;

        // Defaulting rules live here at the boundary, not in consumers
        Ok(PageJudgment::from_value(&value))
    }

    async fn prioritize_links(
        &self,
        page: &FetchedPage,
        instructions: &str,
        context: &LinkContext,
    ) -> Result<LinkProposal, AnalysisError> {
        if page.links.is_empty() {
            return Ok(LinkProposal::default());
        }

        // Limit to a reasonable number of candidates to avoid token limits
        let candidates = &page.links[..page.links.len().min(MAX_CANDIDATE_LINKS)];
        let links_text = candidates
            .iter()
            .enumerate()
            .map(|(i, link)| format!("{}. {} - {}", i + 1, link.text, link.url))
            .collect::<Vec<_>>()
            .join("\n");

        let mut visited_context = format!("You have already visited {} pages.", context.visited.len());
        if !context.visited.is_empty() {
            let recent: Vec<&str> = context
                .visited
                .iter()
                .rev()
                .take(5)
                .map(String::as_str)
                .collect();
            visited_context.push_str(&format!(" Including: {}", recent.join(", ")));
        }

        let topic_context = if context.discovered_topics.is_empty() {
            String::new()
        } else {
            format!(
                "You have already discovered information about: {}",
                context.discovered_topics.join(", ")
            )
        };

        let mut depth_context = format!(
            "Current depth: {}/{}.",
            context.current_depth, context.max_depth
        );
        if context.current_depth + 1 == context.max_depth {
            depth_context.push_str(
                " This is the last level you'll explore, so choose links that directly contain valuable information rather than navigation pages.",
            );
        }

        let prompt = format!(
            r#"You are an AI web scraping assistant. Your task is to identify which links are worth following based on these instructions:
"{instructions}"

Current page: {url}
Current page title: {title}

Context:
{visited_context}
{topic_context}
{depth_context}

Available links:
{links_text}

Analyze these links and identify which ones are most likely to contain information relevant to the instructions.

Also identify any new topics or information categories you expect to discover that aren't covered by already visited pages.

Return your response as a JSON object with two keys:
1. "links": An array of URL strings for the links that should be followed, in order of priority (most relevant first)
2. "new_topics": An array of strings describing new information categories you expect to find

Return no more than {max_links} links.

If none of the links are relevant to the instructions, return an empty links array.
Your response should be valid JSON without any additional text."#,
            instructions = instructions,
            url = page.url,
            title = page.title,
            visited_context = visited_context,
            topic_context = topic_context,
            depth_context = depth_context,
            links_text = links_text,
            max_links = context.max_links,
        );

        let value = self
            .chat_json(
                "You are a helpful AI web scraping assistant that identifies relevant links to follow.",
                &prompt,
            )
            .await?;

        let obj = value.as_object().ok_or_else(|| {
            AnalysisError::MalformedResponse("link proposal is not an object".to_string())
        })?;

        let mut links: Vec<String> = obj
            .get("links")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        links.truncate(context.max_links);

        let new_topics = obj
            .get("new_topics")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(LinkProposal { links, new_topics })
    }

    async fn propose_clusters(
        &self,
        documents: &[Document],
        max_clusters: usize,
    ) -> Result<Vec<ClusterProposal>, AnalysisError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let texts = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let key_points = doc.key_points.join(" ");
                let text = format!("{}. {} {}", doc.title, doc.summary, key_points);
                format!("{}. {}...", i + 1, truncate_text(&text, 300))
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            r#"You are an AI assistant specialized in organizing information.

I have a collection of {count} documents with the following content:

{texts}

Please organize these documents into at most {max_clusters} topical clusters. Each cluster should have a descriptive name.

Return your analysis as a JSON object with the following structure:
{{
  "clusters": [
    {{
      "name": "Cluster Name",
      "description": "Brief description of what this cluster contains",
      "document_indices": [0, 2, 5]
    }}
  ]
}}

Each document should be assigned to exactly one cluster. The document_indices should refer to the 0-indexed position in the original list."#,
            count = documents.len(),
            texts = texts,
            max_clusters = max_clusters,
        );

        let value = self
            .chat_json(
                "You are a helpful assistant that organizes documents into topic clusters.",
                &prompt,
            )
            .await?;

        let clusters = value
            .get("clusters")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AnalysisError::MalformedResponse("missing clusters array".to_string())
            })?;

        let mut proposals = Vec::new();
        for cluster in clusters {
            let name = match cluster.get("name").and_then(Value::as_str) {
                Some(name) => name.to_string(),
                None => {
                    warn!("Skipping cluster proposal without a name");
                    continue;
                }
            };
            let description = cluster
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let document_indices = cluster
                .get("document_indices")
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(|v| v.as_u64().map(|i| i as usize))
                        .collect()
                })
                .unwrap_or_default();

            proposals.push(ClusterProposal {
                name,
                description,
                document_indices,
            });
        }

        Ok(proposals)
    }
}

#[cfg(test)]
mod tests {
    use super::{truncate_text, CODE_FENCE};

    #[test]
    fn test_truncate_text_char_boundary() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello", 3), "hel");
        // Multi-byte characters are not split
        assert_eq!(truncate_text("héllo", 2), "hé");
    }

    #[test]
    fn test_code_fence_cleanup() {
        let fenced = "```json\n{\"relevance_score\": 5}\n```";
        assert_eq!(
            CODE_FENCE.replace_all(fenced, ""),
            "{\"relevance_score\": 5}"
        );
        // Plain JSON passes through untouched
        assert_eq!(CODE_FENCE.replace_all("{\"a\": 1}", ""), "{\"a\": 1}");
    }
}
