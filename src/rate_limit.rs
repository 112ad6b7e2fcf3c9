//! 提交限流
//!
//! 按来源地址的固定窗口计数器：同一地址在窗口内最多允许配额次
//! 提交，超出即拒绝。窗口过期后计数重置。计数器保存在进程内的
//! `DashMap` 中，条目在检查时顺带清理。

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// 限流判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    /// 被拒绝，附带建议的重试等待时间
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// 固定窗口限流器
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    quota: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            quota,
            window,
        }
    }

    /// 检查并计数一次提交
    ///
    /// 允许时立即占用一个配额名额，调用方不需要再回写。
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        // 窗口过期则重新开窗
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        if entry.count >= self.quota {
            let elapsed = now.duration_since(entry.started);
            return RateLimitDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        RateLimitDecision::Allowed
    }

    /// 清除所有已过期窗口
    pub fn prune(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, window| now.duration_since(window.started) < self.window);
    }

    /// 当前跟踪的地址数
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_enforced() {
        let limiter = RateLimiter::new(2, Duration::from_secs(600));
        assert!(limiter.check("1.2.3.4").is_allowed());
        assert!(limiter.check("1.2.3.4").is_allowed());
        // 第三次提交被拒绝
        match limiter.check("1.2.3.4") {
            RateLimitDecision::Limited { retry_after } => {
                assert!(retry_after <= Duration::from_secs(600));
            }
            RateLimitDecision::Allowed => panic!("third submission should be limited"),
        }
    }

    #[test]
    fn test_addresses_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(600));
        assert!(limiter.check("1.2.3.4").is_allowed());
        assert!(limiter.check("5.6.7.8").is_allowed());
        assert!(!limiter.check("1.2.3.4").is_allowed());
    }

    #[test]
    fn test_window_expiry_resets_count() {
        let limiter = RateLimiter::new(1, Duration::from_millis(50));
        assert!(limiter.check("1.2.3.4").is_allowed());
        assert!(!limiter.check("1.2.3.4").is_allowed());

        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.check("1.2.3.4").is_allowed());
    }

    #[test]
    fn test_prune_drops_expired_windows() {
        let limiter = RateLimiter::new(1, Duration::from_millis(30));
        limiter.check("1.2.3.4");
        limiter.check("5.6.7.8");
        assert_eq!(limiter.tracked(), 2);

        std::thread::sleep(Duration::from_millis(40));
        limiter.prune();
        assert_eq!(limiter.tracked(), 0);
    }
}
