//! 语言区域管理
//!
//! 提供站点支持的语言集合、访客初始语言的解析规则，
//! 以及带持久化的当前语言状态（LocaleStore）。

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 偏好持久化的固定有效期（一年）
pub const PREFERENCE_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// 偏好存储使用的键名
pub const PREFERENCE_KEY: &str = "preferred_locale";

/// 站点支持的语言
///
/// `En` 为默认语言，同时也是所有静态文案的源语言。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Hi,
    Fr,
    De,
}

/// 默认语言（同时为翻译源语言）
pub const DEFAULT_LOCALE: Locale = Locale::En;

/// 支持的语言全集
pub const SUPPORTED_LOCALES: [Locale; 4] = [Locale::En, Locale::Hi, Locale::Fr, Locale::De];

impl Locale {
    /// 语言代码（小写，两字母）
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
            Locale::Fr => "fr",
            Locale::De => "de",
        }
    }

    /// 人类可读名称
    pub fn name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Hi => "Hindi",
            Locale::Fr => "French",
            Locale::De => "German",
        }
    }

    /// 是否为默认（源）语言
    pub fn is_default(&self) -> bool {
        *self == DEFAULT_LOCALE
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 无效语言代码错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLocale(pub String);

impl fmt::Display for UnsupportedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported locale code '{}'", self.0)
    }
}

impl std::error::Error for UnsupportedLocale {}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "hi" => Ok(Locale::Hi),
            "fr" => Ok(Locale::Fr),
            "de" => Ok(Locale::De),
            other => Err(UnsupportedLocale(other.to_string())),
        }
    }
}

/// 根据浏览器报告的语言标签匹配支持的语言
///
/// 只做前缀匹配（"fr-CA" 命中 `Fr`），全部未命中时返回 None。
pub fn match_browser_language(tags: &[String]) -> Option<Locale> {
    for tag in tags {
        let tag = tag.trim().to_ascii_lowercase();
        for locale in SUPPORTED_LOCALES {
            if tag.starts_with(locale.code()) {
                return Some(locale);
            }
        }
    }
    None
}

/// 初始语言解析规则
///
/// 优先级：主存储中的显式偏好 → 次级（cookie 等价）存储 →
/// 浏览器语言前缀匹配 → 默认语言。相同输入必然得到相同结果。
pub fn resolve_initial_locale(
    primary: Option<&str>,
    secondary: Option<&str>,
    browser_langs: &[String],
) -> Locale {
    if let Some(stored) = primary {
        if let Ok(locale) = stored.parse::<Locale>() {
            return locale;
        }
    }
    if let Some(stored) = secondary {
        if let Ok(locale) = stored.parse::<Locale>() {
            return locale;
        }
    }
    match_browser_language(browser_langs).unwrap_or(DEFAULT_LOCALE)
}

/// 偏好存储抽象
///
/// Web 层用 cookie 实现等价语义；测试与进程内状态使用 [`MemoryStorage`]。
/// `persist` 不允许向调用方抛错：存储失败只能降级为"未持久化"。
pub trait PreferenceStorage: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn persist(&self, key: &str, value: &str, ttl: Duration);
    fn remove(&self, key: &str);
}

/// 进程内偏好存储
#[derive(Default)]
pub struct MemoryStorage {
    values: std::sync::RwLock<std::collections::HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn persist(&self, key: &str, value: &str, _ttl: Duration) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

/// 当前语言的唯一事实来源
///
/// 显式注入两级存储（而不是环境全局状态），便于测试与复用。
/// 语言切换后不需要任何缓存失效：缓存键本身携带语言。
pub struct LocaleStore {
    current: std::sync::RwLock<Locale>,
    primary: Box<dyn PreferenceStorage>,
    secondary: Box<dyn PreferenceStorage>,
}

impl LocaleStore {
    /// 创建并按解析规则确定初始语言
    pub fn new(
        primary: Box<dyn PreferenceStorage>,
        secondary: Box<dyn PreferenceStorage>,
        browser_langs: &[String],
    ) -> Self {
        let initial = resolve_initial_locale(
            primary.load(PREFERENCE_KEY).as_deref(),
            secondary.load(PREFERENCE_KEY).as_deref(),
            browser_langs,
        );
        Self {
            current: std::sync::RwLock::new(initial),
            primary,
            secondary,
        }
    }

    /// 当前语言
    pub fn locale(&self) -> Locale {
        self.current.read().map(|l| *l).unwrap_or(DEFAULT_LOCALE)
    }

    /// 切换语言并同步持久化到两级存储
    pub fn set_locale(&self, locale: Locale) {
        if let Ok(mut current) = self.current.write() {
            *current = locale;
        }
        self.primary
            .persist(PREFERENCE_KEY, locale.code(), PREFERENCE_TTL);
        self.secondary
            .persist(PREFERENCE_KEY, locale.code(), PREFERENCE_TTL);
    }

    /// 字符串入口：不支持的代码静默忽略
    pub fn set_locale_code(&self, code: &str) -> bool {
        match code.parse::<Locale>() {
            Ok(locale) => {
                self.set_locale(locale);
                true
            }
            Err(_) => {
                tracing::debug!("忽略不支持的语言代码: {}", code);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("fr".parse::<Locale>().unwrap(), Locale::Fr);
        assert_eq!(" DE ".parse::<Locale>().unwrap(), Locale::De);
        assert!("zh".parse::<Locale>().is_err());
        assert_eq!(Locale::Hi.to_string(), "hi");
    }

    #[test]
    fn test_browser_prefix_match() {
        let tags = vec!["fr-CA".to_string(), "en-US".to_string()];
        assert_eq!(match_browser_language(&tags), Some(Locale::Fr));
        assert_eq!(match_browser_language(&["ja".to_string()]), None);
    }

    #[test]
    fn test_resolution_order() {
        let langs = vec!["de".to_string()];
        // 主存储优先
        assert_eq!(
            resolve_initial_locale(Some("hi"), Some("fr"), &langs),
            Locale::Hi
        );
        // 主存储无效时回退次级存储
        assert_eq!(
            resolve_initial_locale(Some("zz"), Some("fr"), &langs),
            Locale::Fr
        );
        // 两级存储均缺失时按浏览器语言
        assert_eq!(resolve_initial_locale(None, None, &langs), Locale::De);
        // 全部缺失回到默认语言
        assert_eq!(resolve_initial_locale(None, None, &[]), DEFAULT_LOCALE);
    }
}
