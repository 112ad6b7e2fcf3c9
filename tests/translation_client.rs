//! 翻译客户端集成测试
//!
//! 通过进程内的替身端点验证缓存优先、快速路径与失败回退行为。

use serde_json::json;

use atelier::locale::Locale;
use atelier::translation::TranslationClient;

mod common;

use common::StubVendor;

/// 目标语言等于源语言时不得产生任何上游调用
#[tokio::test]
async fn test_source_locale_short_circuits() {
    let vendor = StubVendor::start().await;
    let client = TranslationClient::new(vendor.translation_config());

    let result = client.translate_text(Locale::En, "Hello world").await;
    assert_eq!(result, "Hello world");
    assert_eq!(vendor.call_count(), 0);
    assert_eq!(client.cache().len(), 0);

    println!("✅ Source-locale short circuit test passed");
}

/// 空白文本不翻译也不进缓存
#[tokio::test]
async fn test_blank_text_short_circuits() {
    let vendor = StubVendor::start().await;
    let client = TranslationClient::new(vendor.translation_config());

    assert_eq!(client.translate_text(Locale::Fr, "   ").await, "   ");
    assert_eq!(client.translate_text(Locale::Fr, "").await, "");
    assert_eq!(vendor.call_count(), 0);
    assert_eq!(client.cache().len(), 0);

    println!("✅ Blank text short circuit test passed");
}

/// 相同内容翻译两次只调用一次上游
#[tokio::test]
async fn test_repeated_translation_hits_cache() {
    let vendor = StubVendor::start().await;
    let client = TranslationClient::new(vendor.translation_config());

    let first = client.translate_text(Locale::Fr, "Hello world").await;
    assert_eq!(first, "[fr] Hello world");
    assert_eq!(vendor.call_count(), 1);

    let second = client.translate_text(Locale::Fr, "Hello world").await;
    assert_eq!(second, first);
    assert_eq!(vendor.call_count(), 1, "second call must be served from cache");

    // 换一种目标语言则需要新的上游调用
    let german = client.translate_text(Locale::De, "Hello world").await;
    assert_eq!(german, "[de] Hello world");
    assert_eq!(vendor.call_count(), 2);

    println!("✅ Cache-first translation test passed");
}

/// 对象翻译逐值处理并整体缓存
#[tokio::test]
async fn test_object_translation() {
    let vendor = StubVendor::start().await;
    let client = TranslationClient::new(vendor.translation_config());

    let source = json!({ "title": "Home", "cta": "Apply now" });
    let translated = client.translate_object(Locale::Hi, &source).await;
    assert_eq!(translated["title"], "[hi] Home");
    assert_eq!(translated["cta"], "[hi] Apply now");
    assert_eq!(vendor.call_count(), 1);

    // 空对象原样返回，不触达上游
    let empty = client.translate_object(Locale::Hi, &json!({})).await;
    assert_eq!(empty, json!({}));
    assert_eq!(vendor.call_count(), 1);

    println!("✅ Object translation test passed");
}

/// 上游失败时回退原文，恢复后重新可用
#[tokio::test]
async fn test_failure_falls_back_to_original() {
    let vendor = StubVendor::start().await;
    let client = TranslationClient::new(vendor.translation_config());

    vendor.set_failing(true);
    let degraded = client.translate_text(Locale::Fr, "Hello world").await;
    assert_eq!(degraded, "Hello world", "failure must echo the original");
    // 失败结果不得进缓存
    assert_eq!(client.cache().len(), 0);

    vendor.set_failing(false);
    let recovered = client.translate_text(Locale::Fr, "Hello world").await;
    assert_eq!(recovered, "[fr] Hello world");

    println!("✅ Failure fallback test passed");
}

/// 未配置 API 密钥时原样回显且不访问网络
#[tokio::test]
async fn test_missing_api_key_echoes() {
    let vendor = StubVendor::start().await;
    let mut config = vendor.translation_config();
    config.api_key = None;
    let client = TranslationClient::new(config);

    let result = client.translate_text(Locale::Fr, "Hello world").await;
    assert_eq!(result, "Hello world");
    assert_eq!(vendor.call_count(), 0);

    println!("✅ Missing API key test passed");
}

/// HTML 片段翻译保持字符串形态
#[tokio::test]
async fn test_html_translation() {
    let vendor = StubVendor::start().await;
    let client = TranslationClient::new(vendor.translation_config());

    let html = "<h1>Our approach</h1>";
    let translated = client.translate_html(Locale::De, html).await;
    assert_eq!(translated, "[de] <h1>Our approach</h1>");
    assert_eq!(vendor.call_count(), 1);

    println!("✅ HTML translation test passed");
}
