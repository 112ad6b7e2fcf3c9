//! Web 模块的数据类型定义

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::SessionManager;
use crate::rate_limit::RateLimiter;
use crate::translation::TranslationClient;
use crate::web::applications::ApplicationService;
use crate::web::config::WebConfig;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub config: WebConfig,
    pub translator: Arc<TranslationClient>,
    pub applications: Arc<ApplicationService>,
    pub limiter: Arc<RateLimiter>,
    pub sessions: Arc<SessionManager>,
}

/// 翻译代理请求
///
/// `text` / `object` / `html` 三者必须恰好出现其一。
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    /// 待翻译文本
    pub text: Option<serde_json::Value>,
    /// 待翻译 JSON 对象/数组
    pub object: Option<serde_json::Value>,
    /// 待翻译 HTML 片段
    pub html: Option<serde_json::Value>,
    pub source_locale: Option<String>,
    pub target_locale: String,
    /// text / object / html，缺省按载荷字段与形态推断
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// 翻译代理响应
#[derive(Serialize)]
pub struct TranslateResponse {
    pub translated: serde_json::Value,
}

/// 语言设置请求
#[derive(Deserialize)]
pub struct LocaleRequest {
    pub locale: String,
}

/// 语言设置响应
#[derive(Serialize)]
pub struct LocaleResponse {
    pub locale: String,
    pub name: String,
}

/// 管理员登录请求
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// 管理员登录响应
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in_secs: u64,
}

/// 申请提交成功响应
#[derive(Serialize)]
pub struct SubmitResponse {
    pub id: String,
}

/// 字段校验失败响应
#[derive(Serialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<String>,
}

/// 通用错误响应
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
