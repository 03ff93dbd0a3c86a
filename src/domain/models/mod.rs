// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 页面（page）：抓取器返回的单个网页内容
/// - 判断（judgment）：分析器对单个页面的相关性判断
/// - 文档（document）：被接受的判断组装成的最终文档及其聚类
///
/// 这些模型构成了爬取管线的数据基础：页面经过分析产生判断，
/// 判断经过处理器组装为文档，文档最终被排序、聚类和导出。
pub mod document;
pub mod judgment;
pub mod page;

#[cfg(test)]
mod judgment_test;
