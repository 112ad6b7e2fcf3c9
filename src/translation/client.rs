//! 翻译客户端
//!
//! 面向站点其余部分的翻译入口：文本、结构化对象、HTML 片段。
//! 统一的行为契约是"缓存优先，失败回退原文"：
//!
//! 1. 目标语言等于源语言，或输入为空 → 原样返回，不产生任何
//!    网络与缓存流量；
//! 2. 缓存命中 → 直接返回；
//! 3. 未命中 → 调用外部翻译端点，成功结果写入缓存后返回；
//! 4. 任何失败 → 记录日志并返回原文，绝不向用户冒泡错误或空白。
//!
//! `request` 是唯一会返回错误的入口，供 HTTP 代理端点把上游故障
//! 映射为非 2xx 响应使用。

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::locale::Locale;
use crate::translation::cache::TranslationCache;
use crate::translation::config::TranslationConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译载荷类型
///
/// `Html` 明确告知上游保留标签而不是转义；返回值依旧只是数据，
/// 调用方绝不应当执行它。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationKind {
    Text,
    Object,
    Html,
}

impl TranslationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationKind::Text => "text",
            TranslationKind::Object => "object",
            TranslationKind::Html => "html",
        }
    }

    /// 请求体里承载内容的字段名
    fn payload_field(&self) -> &'static str {
        match self {
            TranslationKind::Text => "text",
            TranslationKind::Object => "object",
            TranslationKind::Html => "html",
        }
    }
}

/// 上游端点的响应形态
#[derive(Debug, Deserialize)]
struct VendorResponse {
    translated: Option<Value>,
    error: Option<String>,
}

/// 客户端统计（原子计数，随取随读）
#[derive(Debug, Default)]
pub struct ClientStats {
    pub requests_sent: AtomicU64,
    pub cache_hits: AtomicU64,
    pub fallbacks: AtomicU64,
}

/// 翻译客户端
pub struct TranslationClient {
    http: reqwest::Client,
    config: TranslationConfig,
    cache: Arc<TranslationCache>,
    in_flight: AtomicUsize,
    stats: ClientStats,
}

impl TranslationClient {
    pub fn new(config: TranslationConfig) -> Self {
        let cache = Arc::new(TranslationCache::new(config.cache.clone()));
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            config,
            cache,
            in_flight: AtomicUsize::new(0),
            stats: ClientStats::default(),
        }
    }

    /// 共享同一缓存实例的构造方式（测试和代理端点使用）
    pub fn with_cache(config: TranslationConfig, cache: Arc<TranslationCache>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            config,
            cache,
            in_flight: AtomicUsize::new(0),
            stats: ClientStats::default(),
        }
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }

    /// 是否有未完成的翻译请求（仅供界面显示忙碌状态，不参与正确性）
    pub fn is_translating(&self) -> bool {
        self.in_flight.load(Ordering::Relaxed) > 0
    }

    /// 翻译纯文本
    pub async fn translate_text(&self, target: Locale, text: &str) -> String {
        if target == self.config.source_locale || text.trim().is_empty() {
            return text.to_string();
        }
        let translated = self
            .translate_cached(
                TranslationKind::Text,
                target,
                text,
                Value::String(text.to_string()),
            )
            .await;
        match translated {
            Value::String(s) => s,
            // 上游返回了非字符串：按失败回退原文
            _ => text.to_string(),
        }
    }

    /// 翻译 HTML 片段（上游保留标签）
    pub async fn translate_html(&self, target: Locale, html: &str) -> String {
        if target == self.config.source_locale || html.trim().is_empty() {
            return html.to_string();
        }
        let translated = self
            .translate_cached(
                TranslationKind::Html,
                target,
                html,
                Value::String(html.to_string()),
            )
            .await;
        match translated {
            Value::String(s) => s,
            _ => html.to_string(),
        }
    }

    /// 翻译结构化对象
    ///
    /// 缓存键来自对象的完整确定性序列化（serde_json 的对象键有序），
    /// 而不仅仅是某个字段。空对象/空数组直接原样返回，不写缓存。
    pub async fn translate_object(&self, target: Locale, value: &Value) -> Value {
        if target == self.config.source_locale {
            return value.clone();
        }
        let empty = match value {
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        };
        if empty {
            return value.clone();
        }

        let cache_key = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                tracing::warn!("对象序列化失败，跳过翻译: {}", e);
                return value.clone();
            }
        };
        self.translate_cached(TranslationKind::Object, target, &cache_key, value.clone())
            .await
    }

    /// 缓存优先、失败回退原文的公共路径
    async fn translate_cached(
        &self,
        kind: TranslationKind,
        target: Locale,
        cache_key: &str,
        original: Value,
    ) -> Value {
        // 未配置密钥时直接回显，回显结果不进缓存
        if !self.config.vendor_enabled() {
            tracing::warn!("未配置翻译 API 密钥，内容原样返回");
            return original;
        }

        if let Some(cached) = self.cache.get(target, cache_key) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return cached;
        }

        match self
            .request(kind, &original, self.config.source_locale, target)
            .await
        {
            Ok(translated) => {
                self.cache.set(target, cache_key, translated.clone());
                translated
            }
            Err(e) => {
                tracing::warn!("翻译失败，回退原文: {}", e);
                self.stats.fallbacks.fetch_add(1, Ordering::Relaxed);
                original
            }
        }
    }

    /// 直接请求上游端点（无缓存、错误外传）
    ///
    /// 目标语言等于源语言时不发网络请求，直接回显内容。
    pub async fn request(
        &self,
        kind: TranslationKind,
        content: &Value,
        source: Locale,
        target: Locale,
    ) -> TranslationResult<Value> {
        if target == source {
            return Ok(content.clone());
        }
        if !self.config.vendor_enabled() {
            tracing::warn!("未配置翻译 API 密钥，内容原样返回");
            return Ok(content.clone());
        }

        let payload = json!({
            kind.payload_field(): content,
            "sourceLocale": source.code(),
            "targetLocale": target.code(),
            "type": kind.as_str(),
        });

        self.in_flight.fetch_add(1, Ordering::Relaxed);
        self.stats.requests_sent.fetch_add(1, Ordering::Relaxed);
        let result = self.send(&payload).await;
        self.in_flight.fetch_sub(1, Ordering::Relaxed);

        let response = result?;
        // 上游未给出译文时按回显处理
        Ok(response.translated.unwrap_or_else(|| content.clone()))
    }

    async fn send(&self, payload: &Value) -> TranslationResult<VendorResponse> {
        let mut request = self.http.post(&self.config.api_url).json(payload);
        if let Some(key) = self.config.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: VendorResponse = response.json().await.unwrap_or(VendorResponse {
                translated: None,
                error: None,
            });
            return Err(TranslationError::Upstream {
                status: status.as_u16(),
                message: body
                    .error
                    .unwrap_or_else(|| "translation endpoint failed".to_string()),
            });
        }
        Ok(response.json().await?)
    }
}
