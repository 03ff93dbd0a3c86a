// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括URL处理、robots检查、域名限速、重试策略和遥测监控
pub mod rate_limit;
pub mod retry_policy;
pub mod robots;
pub mod telemetry;
pub mod url_utils;
