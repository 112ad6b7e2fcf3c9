//! Atelier —— 工作室官网与申请后台
//!
//! 多语言营销站点加后台服务：按需机器翻译（带 TTL 与字节预算的
//! 进程内缓存）、申请提交（校验、简历落盘、限流）以及管理端的
//! 申请列表、变更订阅与会话认证。

pub mod auth;
pub mod env;
pub mod locale;
pub mod rate_limit;
pub mod translation;
pub mod validation;
pub mod web;

pub use locale::{Locale, LocaleStore, DEFAULT_LOCALE, SUPPORTED_LOCALES};
pub use translation::{TranslationCache, TranslationClient, TranslationConfig};
