//! 翻译结果缓存
//!
//! 以 (语言, 源内容哈希) 为键的进程内缓存，避免对同一文案的重复
//! 网络调用。条目一经写入不再更新，只会被整体替换；过期条目在
//! 读取与写入路径上被清除，总体字节预算超限时按"最旧时间戳优先"
//! 淘汰。
//!
//! 缓存键使用 blake3 哈希。这是一个尽力而为的去重键，不是内容
//! 身份的保证：哈希冲突被视为可接受的近似，绝不依赖它做正确性
//! 判断。
//!
//! 本模块的所有失败都降级为"未缓存"，绝不向调用方抛错。

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

use serde_json::Value;

use crate::locale::Locale;

// ============================================================================
// 配置与统计
// ============================================================================

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// 条目有效期
    pub ttl: Duration,
    /// 全部条目的估算字节预算
    pub max_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            // 7 天
            ttl: Duration::from_secs(7 * 24 * 60 * 60),
            // 5 MB
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    /// 因过期被清除的条目数
    pub expired_removed: u64,
    /// 因字节预算被淘汰的条目数
    pub evicted: u64,
    /// 因单条超出预算而放弃的写入数
    pub dropped_writes: u64,
}

impl CacheStats {
    /// 命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// 缓存条目
// ============================================================================

/// 缓存条目
///
/// 不可变：刷新即整体替换。`locale` 冗余存储一份用于防御性校验，
/// 即使键本身已经编码了语言。
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub translated: Value,
    pub created_at: SystemTime,
    pub locale: Locale,
    /// 写入时估算的字节占用（键 + 序列化值）
    estimated_bytes: usize,
}

impl CacheEntry {
    fn new(key_len: usize, translated: Value, locale: Locale) -> Self {
        let value_len = serde_json::to_string(&translated)
            .map(|s| s.len())
            .unwrap_or(0);
        Self {
            translated,
            created_at: SystemTime::now(),
            locale,
            estimated_bytes: key_len + value_len,
        }
    }

    /// 条目是否已过期
    pub fn is_expired(&self, ttl: Duration) -> bool {
        match self.created_at.elapsed() {
            Ok(age) => age > ttl,
            // 时钟回拨时按过期处理
            Err(_) => true,
        }
    }
}

/// 生成缓存键：目标语言 + 源内容的 blake3 哈希
pub fn generate_cache_key(locale: Locale, content: &str) -> String {
    let hash = blake3::hash(content.as_bytes());
    format!("t12n:{}:{}", locale.code(), hash.to_hex())
}

// ============================================================================
// 缓存本体
// ============================================================================

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    total_bytes: usize,
}

/// 翻译缓存
///
/// 进程内所有请求共享一个实例。并发写同一个键是幂等的
/// （同键同最终值），最后写入者胜出即可，不需要更强的互斥。
pub struct TranslationCache {
    inner: RwLock<CacheInner>,
    config: CacheConfig,
    stats: RwLock<CacheStats>,
}

impl TranslationCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: RwLock::new(CacheInner {
                entries: HashMap::new(),
                total_bytes: 0,
            }),
            config,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// 读取缓存
    ///
    /// 仅当存储语言匹配且未过期时命中；过期条目顺手清除。
    pub fn get(&self, locale: Locale, content: &str) -> Option<Value> {
        let key = generate_cache_key(locale, content);
        let mut inner = match self.inner.write() {
            Ok(guard) => guard,
            Err(_) => return None,
        };

        let result = match inner.entries.get(&key) {
            Some(entry) if entry.locale == locale && !entry.is_expired(self.config.ttl) => {
                Some(entry.translated.clone())
            }
            Some(_) => {
                // 过期或语言不符：按缺失处理并移除
                if let Some(removed) = inner.entries.remove(&key) {
                    inner.total_bytes = inner.total_bytes.saturating_sub(removed.estimated_bytes);
                }
                if let Ok(mut stats) = self.stats.write() {
                    stats.expired_removed += 1;
                }
                None
            }
            None => None,
        };

        if let Ok(mut stats) = self.stats.write() {
            match result {
                Some(_) => stats.hits += 1,
                None => stats.misses += 1,
            }
        }
        result
    }

    /// 写入缓存
    ///
    /// 写入前先清扫过期条目；超出字节预算时按最旧时间戳淘汰，
    /// 直到回到预算以内。任何情况下都不会失败：单条永远放不下
    /// 就放弃写入，之后的读取表现为未命中。
    pub fn set(&self, locale: Locale, content: &str, translated: Value) {
        let key = generate_cache_key(locale, content);
        let entry = CacheEntry::new(key.len(), translated, locale);

        let mut inner = match self.inner.write() {
            Ok(guard) => guard,
            Err(_) => return,
        };

        // 清理失效 + 腾出空间，相当于原来"配额失败后清理重试"的路径
        let swept = Self::sweep_expired(&mut inner, self.config.ttl);

        if entry.estimated_bytes > self.config.max_bytes {
            tracing::warn!(
                "翻译缓存条目过大 ({} 字节)，放弃写入",
                entry.estimated_bytes
            );
            if let Ok(mut stats) = self.stats.write() {
                stats.expired_removed += swept;
                stats.dropped_writes += 1;
            }
            return;
        }

        // 替换同键旧条目时先扣除其占用
        if let Some(old) = inner.entries.remove(&key) {
            inner.total_bytes = inner.total_bytes.saturating_sub(old.estimated_bytes);
        }
        inner.total_bytes += entry.estimated_bytes;
        inner.entries.insert(key.clone(), entry);

        // 超预算：最旧时间戳优先淘汰（新写入的条目时间戳最新，最后才会被碰到）
        let mut evicted = 0u64;
        while inner.total_bytes > self.config.max_bytes {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(oldest_key) => {
                    if let Some(removed) = inner.entries.remove(&oldest_key) {
                        inner.total_bytes =
                            inner.total_bytes.saturating_sub(removed.estimated_bytes);
                        evicted += 1;
                    }
                }
                None => break,
            }
        }

        if let Ok(mut stats) = self.stats.write() {
            stats.sets += 1;
            stats.expired_removed += swept;
            stats.evicted += evicted;
        }
    }

    /// 清扫所有过期条目，返回清除数量
    pub fn cleanup_expired(&self) -> usize {
        let mut inner = match self.inner.write() {
            Ok(guard) => guard,
            Err(_) => return 0,
        };
        let removed = Self::sweep_expired(&mut inner, self.config.ttl);
        if let Ok(mut stats) = self.stats.write() {
            stats.expired_removed += removed;
        }
        removed as usize
    }

    fn sweep_expired(inner: &mut CacheInner, ttl: Duration) -> u64 {
        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();
        let count = expired.len() as u64;
        for key in expired {
            if let Some(removed) = inner.entries.remove(&key) {
                inner.total_bytes = inner.total_bytes.saturating_sub(removed.estimated_bytes);
            }
        }
        count
    }

    /// 清空缓存
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.entries.clear();
            inner.total_bytes = 0;
        }
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 当前估算字节占用
    pub fn size_bytes(&self) -> usize {
        self.inner.read().map(|i| i.total_bytes).unwrap_or(0)
    }

    /// 统计快照
    pub fn stats(&self) -> CacheStats {
        self.stats.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn reset_stats(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.reset();
        }
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::String(s.to_string())
    }

    #[test]
    fn test_key_embeds_locale() {
        let a = generate_cache_key(Locale::Fr, "hello");
        let b = generate_cache_key(Locale::De, "hello");
        assert_ne!(a, b);
        // 同输入必然同键
        assert_eq!(a, generate_cache_key(Locale::Fr, "hello"));
    }

    #[test]
    fn test_set_then_get() {
        let cache = TranslationCache::default();
        assert!(cache.get(Locale::Fr, "hello").is_none());

        cache.set(Locale::Fr, "hello", text("bonjour"));
        assert_eq!(cache.get(Locale::Fr, "hello"), Some(text("bonjour")));
        // 其他语言不命中
        assert!(cache.get(Locale::De, "hello").is_none());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = TranslationCache::new(CacheConfig {
            ttl: Duration::from_millis(10),
            ..Default::default()
        });
        cache.set(Locale::Hi, "hello", text("नमस्ते"));
        assert!(cache.get(Locale::Hi, "hello").is_some());

        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get(Locale::Hi, "hello").is_none());
        assert!(cache.stats().expired_removed >= 1);
    }

    #[test]
    fn test_oldest_first_eviction() {
        let cache = TranslationCache::new(CacheConfig {
            ttl: Duration::from_secs(3600),
            max_bytes: 400,
        });

        cache.set(Locale::Fr, "first", text(&"a".repeat(100)));
        std::thread::sleep(Duration::from_millis(5));
        cache.set(Locale::Fr, "second", text(&"b".repeat(100)));
        std::thread::sleep(Duration::from_millis(5));
        // 第三条触发淘汰，最旧的 first 先走
        cache.set(Locale::Fr, "third", text(&"c".repeat(100)));

        assert!(cache.get(Locale::Fr, "first").is_none());
        assert!(cache.get(Locale::Fr, "third").is_some());
        assert!(cache.size_bytes() <= 400);
        assert!(cache.stats().evicted >= 1);
    }

    #[test]
    fn test_oversized_write_is_dropped_silently() {
        let cache = TranslationCache::new(CacheConfig {
            ttl: Duration::from_secs(3600),
            max_bytes: 64,
        });
        // 明显放不下，set 不报错，之后一直表现为未命中
        cache.set(Locale::Fr, "big", text(&"x".repeat(10_000)));
        assert!(cache.get(Locale::Fr, "big").is_none());
        assert_eq!(cache.stats().dropped_writes, 1);
    }

    #[test]
    fn test_replace_updates_byte_accounting() {
        let cache = TranslationCache::default();
        cache.set(Locale::Fr, "k", text(&"a".repeat(1000)));
        let before = cache.size_bytes();
        cache.set(Locale::Fr, "k", text("short"));
        assert!(cache.size_bytes() < before);
        assert_eq!(cache.len(), 1);
    }
}
