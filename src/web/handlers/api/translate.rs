//! 翻译代理API处理器
//!
//! 供浏览器侧调用的翻译入口：缓存优先，未命中转发上游端点。
//! 与页面渲染路径不同，这里的上游失败会映射为非 2xx 响应，由
//! 调用方决定如何回退。

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Json as ExtractJson, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::Value;

use crate::locale::Locale;
use crate::translation::{TranslationError, TranslationKind};
use crate::web::types::{AppState, ErrorResponse, TranslateRequest, TranslateResponse};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

/// 选取载荷字段并解析类型
///
/// `text` / `object` / `html` 取第一个出现的字段；显式 `type`
/// 优先于字段名，三者全缺返回 400。
fn resolve_payload(request: &TranslateRequest) -> Result<(TranslationKind, &Value), ApiError> {
    let (field_kind, content) = if let Some(value) = &request.text {
        (TranslationKind::Text, value)
    } else if let Some(value) = &request.object {
        (TranslationKind::Object, value)
    } else if let Some(value) = &request.html {
        (TranslationKind::Html, value)
    } else {
        return Err(bad_request(
            "One of text, object or html is required".to_string(),
        ));
    };

    let kind = match request.kind.as_deref() {
        Some("text") => TranslationKind::Text,
        Some("object") => TranslationKind::Object,
        Some("html") => TranslationKind::Html,
        Some(other) => return Err(bad_request(format!("Unknown translation type: {}", other))),
        // text 字段里传了对象/数组时按对象处理
        None => match (field_kind, content) {
            (TranslationKind::Text, Value::Object(_) | Value::Array(_)) => TranslationKind::Object,
            (kind, _) => kind,
        },
    };

    Ok((kind, content))
}

/// 翻译错误到HTTP状态的映射
fn map_error(e: TranslationError) -> ApiError {
    let status = match &e {
        TranslationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TranslationError::Network(_) => StatusCode::BAD_GATEWAY,
        TranslationError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        TranslationError::Config(_) | TranslationError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

pub async fn translate(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let (kind, content) = resolve_payload(&request)?;

    let target = Locale::from_str(&request.target_locale)
        .map_err(|e| bad_request(e.to_string()))?;
    let source = match request.source_locale.as_deref() {
        Some(code) => Locale::from_str(code).map_err(|e| bad_request(e.to_string()))?,
        None => state.translator.config().source_locale,
    };

    // 目标为站点源语言（英文）或等于请求声明的源语言时原样回显，
    // 不触达缓存与上游
    if target.is_default() || target == source {
        return Ok(Json(TranslateResponse {
            translated: content.clone(),
        }));
    }

    let cache_key = match content {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other)
            .map_err(|e| bad_request(format!("Payload is not serializable: {}", e)))?,
    };

    if let Some(cached) = state.translator.cache().get(target, &cache_key) {
        return Ok(Json(TranslateResponse { translated: cached }));
    }

    let translated = state
        .translator
        .request(kind, content, source, target)
        .await
        .map_err(map_error)?;

    state
        .translator
        .cache()
        .set(target, &cache_key, translated.clone());

    Ok(Json(TranslateResponse { translated }))
}
