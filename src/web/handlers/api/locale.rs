//! 语言切换API处理器
//!
//! 语言偏好属于单个访客：查询按请求头解析，切换通过 Set-Cookie
//! 写回浏览器，进程内不保存任何共享语言状态。

use axum::extract::Json as ExtractJson;
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::Json;

use crate::locale::Locale;
use crate::web::types::{ErrorResponse, LocaleRequest, LocaleResponse};
use crate::web::visitor;

type SetCookie = [(HeaderName, String); 1];

/// 查询当前访客的语言
pub async fn current_locale(headers: HeaderMap) -> Json<LocaleResponse> {
    let locale = visitor::visitor_locale(&headers);
    Json(LocaleResponse {
        locale: locale.code().to_string(),
        name: locale.name().to_string(),
    })
}

/// 切换语言
///
/// 成功时通过一年期 Set-Cookie 持久化偏好；不支持的语言代码
/// 返回 400，不写任何 cookie。
pub async fn set_locale(
    ExtractJson(request): ExtractJson<LocaleRequest>,
) -> Result<(SetCookie, Json<LocaleResponse>), (StatusCode, Json<ErrorResponse>)> {
    let locale: Locale = request.locale.parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Unsupported locale: {}", request.locale),
            }),
        )
    })?;

    tracing::info!("语言切换为 {}", locale.code());
    Ok((
        [(header::SET_COOKIE, visitor::preference_cookie_value(locale))],
        Json(LocaleResponse {
            locale: locale.code().to_string(),
            name: locale.name().to_string(),
        }),
    ))
}
