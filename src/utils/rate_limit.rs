// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use url::Url;

use crate::utils::url_utils::registrable_domain;

/// 域名级速率限制器
///
/// 同一可注册域名的两次请求之间强制最小间隔；
/// 不同域名的请求互不影响。
#[derive(Clone)]
pub struct DomainRateLimiter {
    /// 最小请求间隔
    min_interval: Duration,
    /// 各域名最近一次请求时间
    last_request: Arc<Mutex<HashMap<String, Instant>>>,
}

impl DomainRateLimiter {
    /// 创建新的限速器实例
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 在向目标URL发起请求前等待，保证不超过域名速率限制
    ///
    /// `extra_delay` 允许调用方叠加站点自身声明的Crawl-delay，
    /// 取两者中的较大值。
    pub async fn acquire(&self, url: &Url, extra_delay: Option<Duration>) {
        let domain = match registrable_domain(url) {
            Some(d) => d,
            None => return,
        };

        let interval = extra_delay
            .map(|d| d.max(self.min_interval))
            .unwrap_or(self.min_interval);

        // Compute the wait outside the lock, sleep without holding it
        let wait = {
            let last = self.last_request.lock().unwrap();
            last.get(&domain).and_then(|t| {
                let elapsed = t.elapsed();
                (elapsed < interval).then(|| interval - elapsed)
            })
        };

        if let Some(wait) = wait {
            tokio::time::sleep(wait).await;
        }

        let mut last = self.last_request.lock().unwrap();
        last.insert(domain, Instant::now());
    }
}
