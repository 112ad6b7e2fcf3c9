//! 翻译模块统一错误处理

use thiserror::Error;

/// 翻译错误类型
///
/// 注意：面向页面的翻译入口永远不会把这些错误抛给用户，
/// 它们只在代理端点和日志中出现。
#[derive(Error, Debug)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 网络错误
    #[error("网络错误: {0}")]
    Network(String),

    /// 翻译服务返回了错误响应
    #[error("翻译服务错误 (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },

    /// 输入无效
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),
}

impl TranslationError {
    /// 网络类故障可重试，其余不可
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TranslationError::Network(_) | TranslationError::Upstream { .. }
        )
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        TranslationError::Network(error.to_string())
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::Serialization(error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;
