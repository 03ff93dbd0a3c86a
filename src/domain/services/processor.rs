// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use tracing::debug;

use crate::domain::models::document::{Cluster, Document};
use crate::domain::models::judgment::PageJudgment;
use crate::domain::services::analyzer::ClusterProposal;

/// 兜底聚类名称，收纳提案遗漏的文档
const UNCATEGORIZED: &str = "Uncategorized";
/// 聚类提案完全失败时的降级聚类名称
const ALL_DOCUMENTS: &str = "All Documents";

/// 文档处理器
///
/// 将被接受的页面判断组装为最终文档，并负责排序、聚类组装
/// 和导出视图的扁平化。所有操作都是纯函数，不持有状态。
pub struct DocumentProcessor;

/// 导出视图：确定性的扁平表格
///
/// 同一批文档总是产生相同的列集合与列顺序
#[derive(Debug, Clone)]
pub struct ExportTable {
    /// 列名（固定列在前，随后是编号的片段列和要点列）
    pub headers: Vec<String>,
    /// 每文档一行，与headers一一对应，缺失值为空字符串
    pub rows: Vec<Vec<String>>,
}

impl DocumentProcessor {
    /// 从页面判断组装文档
    ///
    /// 只有相关性评分大于0的判断才产生文档；评分为0的页面
    /// 的概念和矛盾已由记忆吸收，此处不再保留。
    pub fn accept(url: &str, title: &str, judgment: &PageJudgment) -> Option<Document> {
        if judgment.relevance_score == 0 {
            return None;
        }

        Some(Document {
            url: url.to_string(),
            title: title.to_string(),
            sections: judgment.sections.clone(),
            key_points: judgment.key_points.clone(),
            relevance_score: judgment.relevance_score,
            summary: judgment.summary.clone(),
            timestamp: Utc::now(),
        })
    }

    /// 按相关性评分降序排序
    ///
    /// 稳定排序：评分相同的文档保持发现顺序
    pub fn rank(mut documents: Vec<Document>) -> Vec<Document> {
        documents.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        documents
    }

    /// 根据聚类提案组装最终聚类
    ///
    /// 每个文档索引至多应用一次（重复和越界索引被忽略），
    /// 未被任何提案覆盖的文档进入"Uncategorized"兜底聚类。
    /// 提案缺失（聚类分析失败）时降级为单个"All Documents"
    /// 聚类，文档本身永不丢失。
    pub fn assemble_clusters(
        documents: &[Document],
        proposals: Option<Vec<ClusterProposal>>,
    ) -> Vec<Cluster> {
        let proposals = match proposals {
            Some(p) => p,
            None => {
                debug!("Cluster proposal unavailable, degrading to a single cluster");
                return vec![Cluster {
                    name: ALL_DOCUMENTS.to_string(),
                    description: "All collected documents".to_string(),
                    documents: documents.to_vec(),
                }];
            }
        };

        let mut assigned = vec![false; documents.len()];
        let mut clusters = Vec::new();

        for proposal in proposals {
            let mut members = Vec::new();
            for &index in &proposal.document_indices {
                if index >= documents.len() {
                    debug!("Ignoring out-of-range cluster index: {}", index);
                    continue;
                }
                if assigned[index] {
                    continue;
                }
                assigned[index] = true;
                members.push(documents[index].clone());
            }
            if members.is_empty() {
                continue;
            }
            clusters.push(Cluster {
                name: proposal.name,
                description: proposal.description,
                documents: members,
            });
        }

        let leftovers: Vec<Document> = documents
            .iter()
            .zip(&assigned)
            .filter(|(_, taken)| !**taken)
            .map(|(doc, _)| doc.clone())
            .collect();
        if !leftovers.is_empty() {
            clusters.push(Cluster {
                name: UNCATEGORIZED.to_string(),
                description: "Documents not assigned to any cluster".to_string(),
                documents: leftovers,
            });
        }

        clusters
    }

    /// 将文档批次扁平化为导出表格
    ///
    /// 列集合是整批文档的并集：固定列之后是
    /// `section_N_title`/`section_N_content` 对和 `key_point_N` 列，
    /// N按数字顺序递增。某文档缺少的列填空字符串。
    pub fn export_view(documents: &[Document]) -> ExportTable {
        let max_sections = documents
            .iter()
            .map(|d| d.sections.len())
            .max()
            .unwrap_or(0);
        let max_key_points = documents
            .iter()
            .map(|d| d.key_points.len())
            .max()
            .unwrap_or(0);

        let mut headers = vec![
            "url".to_string(),
            "title".to_string(),
            "relevance_score".to_string(),
            "summary".to_string(),
            "timestamp".to_string(),
        ];
        for n in 1..=max_sections {
            headers.push(format!("section_{}_title", n));
            headers.push(format!("section_{}_content", n));
        }
        for n in 1..=max_key_points {
            headers.push(format!("key_point_{}", n));
        }

        let rows = documents
            .iter()
            .map(|doc| {
                let mut row = vec![
                    doc.url.clone(),
                    doc.title.clone(),
                    doc.relevance_score.to_string(),
                    doc.summary.clone(),
                    doc.timestamp.to_rfc3339(),
                ];
                for n in 0..max_sections {
                    match doc.sections.get(n) {
                        Some(section) => {
                            row.push(section.title.clone());
                            row.push(section.content.clone());
                        }
                        None => {
                            row.push(String::new());
                            row.push(String::new());
                        }
                    }
                }
                for n in 0..max_key_points {
                    row.push(doc.key_points.get(n).cloned().unwrap_or_default());
                }
                row
            })
            .collect();

        ExportTable { headers, rows }
    }
}
