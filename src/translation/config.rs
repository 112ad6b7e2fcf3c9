//! 翻译配置
//!
//! 默认值 < `site.toml` 的 `[translation]` 段 < 环境变量，逐层覆盖。

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::env;
use crate::locale::{Locale, DEFAULT_LOCALE};
use crate::translation::cache::CacheConfig;
use crate::translation::error::{TranslationError, TranslationResult};

/// 配置文件名
pub const CONFIG_FILE: &str = "site.toml";

/// 翻译服务配置
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// 翻译 API 端点
    pub api_url: String,
    /// 翻译 API 密钥；缺失时翻译降级为原文直通
    pub api_key: Option<String>,
    /// 源语言（站点文案语言）
    pub source_locale: Locale,
    /// 单次请求超时
    pub request_timeout: Duration,
    /// 缓存配置
    pub cache: CacheConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_url: "https://engine.lingo.dev/api/translate".to_string(),
            api_key: None,
            source_locale: DEFAULT_LOCALE,
            request_timeout: Duration::from_secs(30),
            cache: CacheConfig::default(),
        }
    }
}

/// `site.toml` 中 `[translation]` 段的原始形态
#[derive(Debug, Default, Deserialize)]
struct FileSection {
    api_url: Option<String>,
    api_key: Option<String>,
    request_timeout_secs: Option<u64>,
    cache_ttl_secs: Option<u64>,
    cache_max_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FileRoot {
    #[serde(default)]
    translation: FileSection,
}

impl TranslationConfig {
    /// 加载完整配置：默认值、配置文件、环境变量依次覆盖
    pub fn load() -> TranslationResult<Self> {
        let mut config = Self::default();

        if Path::new(CONFIG_FILE).exists() {
            config.apply_file(CONFIG_FILE)?;
        }
        config.apply_env();
        Ok(config)
    }

    fn apply_file(&mut self, path: &str) -> TranslationResult<()> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::Config(format!("读取 {} 失败: {}", path, e)))?;
        let parsed: FileRoot = toml::from_str(&raw)
            .map_err(|e| TranslationError::Config(format!("解析 {} 失败: {}", path, e)))?;

        let section = parsed.translation;
        if let Some(api_url) = section.api_url {
            self.api_url = api_url;
        }
        if section.api_key.is_some() {
            self.api_key = section.api_key;
        }
        if let Some(secs) = section.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = section.cache_ttl_secs {
            self.cache.ttl = Duration::from_secs(secs);
        }
        if let Some(bytes) = section.cache_max_bytes {
            self.cache.max_bytes = bytes;
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        use crate::env::EnvVar;

        if let Ok(api_url) = env::translation::ApiUrl::get() {
            if !api_url.is_empty() {
                self.api_url = api_url;
            }
        }
        if let Ok(api_key) = env::translation::ApiKey::get() {
            if !api_key.is_empty() {
                self.api_key = Some(api_key);
            }
        }
        if let Ok(ttl) = env::translation::CacheTtl::get() {
            self.cache.ttl = ttl;
        }
        if let Ok(max_bytes) = env::translation::CacheMaxBytes::get() {
            self.cache.max_bytes = max_bytes;
        }
    }

    /// 翻译是否真正启用（有密钥才会访问上游）
    pub fn vendor_enabled(&self) -> bool {
        self.api_key.as_deref().map_or(false, |k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranslationConfig::default();
        assert_eq!(config.source_locale, Locale::En);
        assert!(!config.vendor_enabled());
        assert_eq!(config.cache.max_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_file_section_overrides() {
        let mut config = TranslationConfig::default();
        let dir = std::env::temp_dir().join("atelier-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("site.toml");
        std::fs::write(
            &path,
            "[translation]\napi_url = \"http://localhost:1188/translate\"\ncache_ttl_secs = 60\n",
        )
        .unwrap();

        config.apply_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.api_url, "http://localhost:1188/translate");
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
    }
}
