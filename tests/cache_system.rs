//! 译文缓存集成测试
//!
//! 覆盖 TTL 过期、字节预算驱逐和统计计数。

use std::time::Duration;

use serde_json::json;

use atelier::locale::Locale;
use atelier::translation::{CacheConfig, TranslationCache};

/// 基本存取与语言隔离
#[tokio::test]
async fn test_basic_cache_operations() {
    let cache = TranslationCache::new(CacheConfig::default());

    assert!(cache.get(Locale::Fr, "Hello").is_none());

    cache.set(Locale::Fr, "Hello", json!("Bonjour"));
    assert_eq!(cache.get(Locale::Fr, "Hello"), Some(json!("Bonjour")));

    // 相同内容、不同语言互不可见
    assert!(cache.get(Locale::De, "Hello").is_none());
    cache.set(Locale::De, "Hello", json!("Hallo"));
    assert_eq!(cache.get(Locale::De, "Hello"), Some(json!("Hallo")));
    assert_eq!(cache.len(), 2);

    println!("✅ Basic cache operations test passed");
}

/// TTL 过期后条目不可见且被移除
#[tokio::test]
async fn test_ttl_expiry() {
    let cache = TranslationCache::new(CacheConfig {
        ttl: Duration::from_millis(40),
        ..CacheConfig::default()
    });

    cache.set(Locale::Fr, "Hello", json!("Bonjour"));
    assert!(cache.get(Locale::Fr, "Hello").is_some());

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(cache.get(Locale::Fr, "Hello").is_none());
    assert_eq!(cache.len(), 0, "expired entry must be removed on access");

    println!("✅ TTL expiry test passed");
}

/// 超出字节预算时按最旧条目驱逐
#[tokio::test]
async fn test_byte_budget_eviction() {
    let cache = TranslationCache::new(CacheConfig {
        ttl: Duration::from_secs(3600),
        max_bytes: 400,
    });

    // 每条大约 120 字节，放入第四条时最旧的应当被驱逐
    for (i, text) in ["alpha", "bravo", "charlie", "delta"].iter().enumerate() {
        cache.set(Locale::Fr, text, json!("x".repeat(80)));
        if i < 3 {
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    assert!(cache.size_bytes() <= 400);
    assert!(
        cache.get(Locale::Fr, "alpha").is_none(),
        "oldest entry should be evicted first"
    );
    assert!(cache.get(Locale::Fr, "delta").is_some());
    assert!(cache.stats().evicted >= 1);

    println!("✅ Byte budget eviction test passed");
}

/// 统计计数随操作推进
#[tokio::test]
async fn test_cache_statistics() {
    let cache = TranslationCache::new(CacheConfig::default());

    cache.get(Locale::Fr, "miss");
    cache.set(Locale::Fr, "Hello", json!("Bonjour"));
    cache.get(Locale::Fr, "Hello");
    cache.get(Locale::Fr, "Hello");

    let stats = cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.sets, 1);
    assert_eq!(stats.hits, 2);
    assert!(stats.hit_rate() > 0.6);

    cache.reset_stats();
    assert_eq!(cache.stats().hits, 0);

    println!("✅ Cache statistics test passed");
}

/// 清空缓存归零
#[tokio::test]
async fn test_clear() {
    let cache = TranslationCache::new(CacheConfig::default());
    cache.set(Locale::Fr, "Hello", json!("Bonjour"));
    cache.set(Locale::Hi, "Hello", json!("नमस्ते"));

    cache.clear();
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.size_bytes(), 0);

    println!("✅ Cache clear test passed");
}
