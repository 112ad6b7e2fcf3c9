//! 访客语言解析
//!
//! 服务器不保存语言状态：每个请求独立解析，cookie 中的显式偏好
//! 优先，其次按 Accept-Language 前缀匹配。语言切换通过一年有效期
//! 的 Set-Cookie 持久化在访客浏览器里。

use axum::http::{header, HeaderMap};

use crate::locale::{resolve_initial_locale, Locale, PREFERENCE_KEY, PREFERENCE_TTL};

/// 从 Cookie 头提取语言偏好
fn preference_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        if name.trim() == PREFERENCE_KEY {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

/// 从 Accept-Language 头提取语言标签（忽略权重）
fn accept_language_tags(headers: &HeaderMap) -> Vec<String> {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .filter_map(|part| {
                    let tag = part.split(';').next().unwrap_or("").trim();
                    if tag.is_empty() {
                        None
                    } else {
                        Some(tag.to_string())
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// 解析本次请求的访客语言
pub fn visitor_locale(headers: &HeaderMap) -> Locale {
    resolve_initial_locale(
        preference_cookie(headers).as_deref(),
        None,
        &accept_language_tags(headers),
    )
}

/// 语言偏好的 Set-Cookie 值（一年有效期）
pub fn preference_cookie_value(locale: Locale) -> String {
    format!(
        "{}={}; Max-Age={}; Path=/; SameSite=Lax",
        PREFERENCE_KEY,
        locale.code(),
        PREFERENCE_TTL.as_secs()
    )
}
