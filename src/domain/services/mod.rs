// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - 边界管理器（frontier）：遍历队列、访问集合和预算控制
/// - 知识记忆（memory）：跨页面的总结、概念和矛盾积累
/// - 内容分析器（analyzer / llm_analyzer）：页面相关性判断与链接优先级
/// - 文档处理器（processor）：文档组装、排序、聚类和扁平化视图
/// - 编排器（orchestrator）：驱动整个遍历状态机
pub mod analyzer;
pub mod frontier;
pub mod llm_analyzer;
pub mod memory;
pub mod orchestrator;
pub mod processor;

#[cfg(test)]
mod frontier_test;
