//! 站点翻译系统
//!
//! 分层结构：
//!
//! - `config`  —— 配置加载（默认值 → site.toml → 环境变量）
//! - `error`   —— 统一错误类型
//! - `cache`   —— 带 TTL 与字节预算的内存译文缓存
//! - `client`  —— 缓存优先、失败回退原文的翻译客户端
//! - `binding` —— "最后一次请求获胜"的展示值绑定

pub mod binding;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;

pub use binding::{Ticket, TranslationBinding};
pub use cache::{generate_cache_key, CacheConfig, CacheStats, TranslationCache};
pub use client::{TranslationClient, TranslationKind};
pub use config::TranslationConfig;
pub use error::{TranslationError, TranslationResult};
