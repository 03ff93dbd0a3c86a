// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 结果导出
//!
//! 将收集的文档序列化为JSON、CSV或Markdown并写入文件。

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::domain::models::document::Document;
use crate::domain::services::processor::DocumentProcessor;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON（pretty-printed）
    Json,
    /// CSV（扁平化的导出视图）
    Csv,
    /// Markdown（目录 + 每文档小节）
    Markdown,
}

/// 导出错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    /// JSON序列化失败
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// CSV写入失败
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
    /// 文件IO失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 文档导出器
pub struct Exporter;

impl Exporter {
    /// 将文档序列化为指定格式的字符串
    pub fn serialize(documents: &[Document], format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Json => Ok(serde_json::to_string_pretty(documents)?),
            ExportFormat::Csv => Self::to_csv(documents),
            ExportFormat::Markdown => Ok(Self::to_markdown(documents)),
        }
    }

    /// 序列化并写入文件
    pub fn save(
        documents: &[Document],
        format: ExportFormat,
        path: &Path,
    ) -> Result<(), ExportError> {
        let content = Self::serialize(documents, format)?;
        std::fs::write(path, content)?;
        info!(path = %path.display(), count = documents.len(), "Exported documents");
        Ok(())
    }

    fn to_csv(documents: &[Document]) -> Result<String, ExportError> {
        let table = DocumentProcessor::export_view(documents);
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))?;
        // csv output over string records is always valid UTF-8
        Ok(String::from_utf8(bytes).unwrap_or_default())
    }

    fn to_markdown(documents: &[Document]) -> String {
        let mut out = String::from("# Crawl Results\n\n");

        out.push_str("## Table of Contents\n\n");
        for (i, doc) in documents.iter().enumerate() {
            out.push_str(&format!("{}. [{}]({})\n", i + 1, doc.title, doc.url));
        }
        out.push('\n');

        for (i, doc) in documents.iter().enumerate() {
            out.push_str(&format!("## {}. {}\n\n", i + 1, doc.title));
            out.push_str(&format!("- **URL**: {}\n", doc.url));
            out.push_str(&format!("- **Relevance**: {}/10\n", doc.relevance_score));
            out.push_str(&format!("- **Collected**: {}\n\n", doc.timestamp.to_rfc3339()));
            if !doc.summary.is_empty() {
                out.push_str(&format!("{}\n\n", doc.summary));
            }
            for section in &doc.sections {
                out.push_str(&format!("### {}\n\n{}\n\n", section.title, section.content));
            }
            if !doc.key_points.is_empty() {
                out.push_str("### Key Points\n\n");
                for point in &doc.key_points {
                    out.push_str(&format!("- {}\n", point));
                }
                out.push('\n');
            }
        }

        out
    }
}
