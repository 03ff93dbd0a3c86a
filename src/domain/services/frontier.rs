// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::{HashSet, VecDeque};
use tracing::debug;
use url::Url;

use crate::utils::url_utils::{is_same_domain, normalize_url};

/// 边界条目
///
/// 由边界管理器在接受链接时创建，恰好出队一次；
/// 已访问或已入队的URL永远不会再次创建条目。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// 规范化后的URL
    pub url: String,
    /// 距种子的链接跳数（种子为0）
    pub depth: usize,
    /// 发现该链接的页面URL（种子为None）
    pub discovered_from: Option<String>,
}

/// 边界管理器
///
/// 拥有遍历队列、访问集合、每URL深度分配和页面/深度预算，
/// 决定遍历顺序与终止条件。出队即标记已访问，先于任何抓取
/// 副作用，保证同一URL在一次爬取内最多被访问一次。
pub struct FrontierManager {
    /// 待访问队列（FIFO，广度优先）
    queue: VecDeque<FrontierEntry>,
    /// 已访问的规范化URL
    visited: HashSet<String>,
    /// 已入队但尚未出队的规范化URL
    queued: HashSet<String>,
    /// 最大页面预算
    max_pages: usize,
    /// 最大深度预算
    max_depth: usize,
    /// 同域限制（站点映射模式），存储种子URL
    scope: Option<Url>,
}

impl FrontierManager {
    /// 创建新的边界管理器并以种子URL初始化
    ///
    /// 种子深度为0。`same_domain_only` 启用时，后续只接受与
    /// 种子同一可注册域名的链接。
    pub fn new(seed_url: &Url, max_pages: usize, max_depth: usize, same_domain_only: bool) -> Self {
        let mut manager = Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            queued: HashSet::new(),
            max_pages,
            max_depth,
            scope: same_domain_only.then(|| seed_url.clone()),
        };

        let normalized = normalize_url(seed_url);
        manager.queued.insert(normalized.clone());
        manager.queue.push_back(FrontierEntry {
            url: normalized,
            depth: 0,
            discovered_from: None,
        });
        manager
    }

    /// 尝试将候选链接加入队列
    ///
    /// 以下情况拒绝（无副作用）：URL无法解析、已访问、已入队、
    /// 深度超过预算、或（同域模式下）域名不在范围内。
    /// 域名不符是静默丢弃，不是错误。
    ///
    /// # 返回值
    ///
    /// 链接被接受入队时返回true
    pub fn enqueue(&mut self, url: &str, depth: usize, origin: Option<&str>) -> bool {
        if depth > self.max_depth {
            return false;
        }

        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => {
                debug!("Discarding unparseable link: {}", url);
                return false;
            }
        };

        if let Some(scope) = &self.scope {
            if !is_same_domain(scope, &parsed) {
                return false;
            }
        }

        let normalized = normalize_url(&parsed);
        if self.visited.contains(&normalized) || self.queued.contains(&normalized) {
            return false;
        }

        self.queued.insert(normalized.clone());
        self.queue.push_back(FrontierEntry {
            url: normalized,
            depth,
            discovered_from: origin.map(str::to_string),
        });
        true
    }

    /// 出队下一个待访问条目
    ///
    /// FIFO顺序（广度优先）。出队的同时原子地标记为已访问，
    /// 保证在抓取仍在进行时被再次发现的URL不会二次入队。
    /// 页面预算耗尽或队列为空时返回None。
    pub fn next_entry(&mut self) -> Option<FrontierEntry> {
        if self.visited.len() >= self.max_pages {
            return None;
        }

        while let Some(entry) = self.queue.pop_front() {
            self.queued.remove(&entry.url);
            // Depth guard: entries over budget are skipped, not returned
            if entry.depth > self.max_depth {
                continue;
            }
            self.mark_visited(&entry.url);
            return Some(entry);
        }

        None
    }

    /// 标记URL为已访问（幂等）
    ///
    /// 必须在对该URL发起任何网络抓取之前执行
    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    /// 该URL是否已被访问
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// 已访问页面数
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// 已访问URL的快照（传给链接优先级分析）
    pub fn visited_urls(&self) -> Vec<String> {
        self.visited.iter().cloned().collect()
    }

    /// 最大深度预算
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// 遍历是否已终止：预算耗尽或队列为空
    pub fn is_exhausted(&self) -> bool {
        self.visited.len() >= self.max_pages || self.queue.is_empty()
    }
}
