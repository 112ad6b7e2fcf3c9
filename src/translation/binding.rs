//! 翻译绑定
//!
//! 把一份"随语言切换而变化"的展示值和它的异步翻译流程绑定起来。
//! 核心保证是"最后一次请求获胜"：语言快速连续切换时，旧请求的
//! 迟到结果不能覆盖新请求的结果。
//!
//! 用法：每次输入（文本或语言）变化时 `begin()` 领取一张票据，
//! 异步翻译完成后用票据 `commit()`。只有仍是最新票据的提交才会
//! 落盘，过期提交被静默丢弃。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// 一次翻译请求的票据（单调递增的代数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// 展示值与其在途翻译的绑定
pub struct TranslationBinding<T> {
    value: RwLock<T>,
    // 最近一次 begin() 发出的代数
    latest: AtomicU64,
    // 最近一次成功 commit() 的代数
    committed: AtomicU64,
}

impl<T: Clone> TranslationBinding<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: RwLock::new(initial),
            latest: AtomicU64::new(0),
            committed: AtomicU64::new(0),
        }
    }

    /// 当前展示值
    pub fn value(&self) -> T {
        self.value
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 是否有尚未完成的翻译请求
    pub fn is_translating(&self) -> bool {
        self.committed.load(Ordering::Acquire) < self.latest.load(Ordering::Acquire)
    }

    /// 领取新票据，使所有在途请求立即过期
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// 用票据提交结果
    ///
    /// 只有票据仍是最新时才写入，返回是否生效。过期提交同时推进
    /// `committed` 水位，避免忙碌状态卡住。
    pub fn commit(&self, ticket: Ticket, value: T) -> bool {
        let fresh = ticket.0 == self.latest.load(Ordering::Acquire);
        if fresh {
            let mut slot = self
                .value
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *slot = value;
        }
        // committed 只前进不后退
        self.committed.fetch_max(ticket.0, Ordering::AcqRel);
        fresh
    }

    /// 放弃一张票据（请求失败时调用，仅推进忙碌水位）
    pub fn abandon(&self, ticket: Ticket) {
        self.committed.fetch_max(ticket.0, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_commit_wins() {
        let binding = TranslationBinding::new("hello".to_string());
        let ticket = binding.begin();
        assert!(binding.is_translating());
        assert!(binding.commit(ticket, "bonjour".to_string()));
        assert_eq!(binding.value(), "bonjour");
        assert!(!binding.is_translating());
    }

    #[test]
    fn test_stale_commit_is_dropped() {
        let binding = TranslationBinding::new("hello".to_string());
        let first = binding.begin();
        let second = binding.begin();

        // 新请求先完成
        assert!(binding.commit(second, "hallo".to_string()));
        // 旧请求的迟到结果不得覆盖
        assert!(!binding.commit(first, "bonjour".to_string()));
        assert_eq!(binding.value(), "hallo");
        assert!(!binding.is_translating());
    }

    #[test]
    fn test_abandon_clears_busy_state() {
        let binding = TranslationBinding::new("hello".to_string());
        let ticket = binding.begin();
        binding.abandon(ticket);
        assert!(!binding.is_translating());
        assert_eq!(binding.value(), "hello");
    }
}
