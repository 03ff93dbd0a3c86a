// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 页面上的出站链接
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLink {
    /// 绝对URL
    pub url: String,
    /// 链接文本
    pub text: String,
}

/// 抓取到的页面内容
///
/// 由抓取引擎产生，所有链接已解析为绝对形式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    /// 页面URL
    pub url: String,
    /// 页面标题
    pub title: String,
    /// 提取的文本内容
    pub text: String,
    /// 出站链接
    pub links: Vec<PageLink>,
    /// meta描述
    pub meta_description: String,
    /// 第一个ld+json结构化数据块（如果存在）
    pub structured_data: Option<Value>,
}

impl FetchedPage {
    /// 创建一个只有URL的空页面，主要用于测试
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            text: String::new(),
            links: Vec::new(),
            meta_description: String::new(),
            structured_data: None,
        }
    }
}
