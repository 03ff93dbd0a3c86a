// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理爬取任务的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体和服务：边界管理、知识记忆、文档处理和编排
pub mod domain;

/// 引擎模块
///
/// 实现网页抓取引擎及其接口
pub mod engines;

/// 导出模块
///
/// 将文档列表序列化为目标格式（JSON、CSV、Markdown）
pub mod export;

/// 工具模块
///
/// 提供URL处理、robots检查、速率限制等通用工具
pub mod utils;
