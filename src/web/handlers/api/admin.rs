//! 管理后台API处理器
//!
//! 登录签发会话令牌；其余端点要求 `Authorization: Bearer` 携带
//! 有效令牌。变更订阅端点额外接受 `?token=` 查询参数，因为
//! EventSource 无法设置请求头。

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Json as ExtractJson, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;

use crate::auth::AuthError;
use crate::web::applications::service::summarize;
use crate::web::applications::types::{ApplicationEvent, ApplicationListRequest};
use crate::web::types::{AppState, ErrorResponse, LoginRequest, LoginResponse};

type ApiError = (StatusCode, Json<ErrorResponse>);

/// 变更订阅推送的SSE事件名
const CHANGE_EVENT: &str = "changed";

fn unauthorized(e: AuthError) -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse { error: e.to_string() }),
    )
}

fn internal(message: String) -> ApiError {
    tracing::error!("{}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
}

/// 从请求头提取并验证会话令牌
fn require_session(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized(AuthError::MalformedToken))?;
    state.sessions.verify_token(token).map_err(unauthorized)
}

/// 管理员登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    state
        .sessions
        .verify_credentials(&request.email, &request.password)
        .map_err(|e| {
            tracing::warn!("管理员登录失败: {}", request.email.trim());
            unauthorized(e)
        })?;

    tracing::info!("管理员登录成功");
    Ok(Json(LoginResponse {
        token: state.sessions.issue_token(),
        expires_in_secs: state.config.auth.session_ttl.as_secs(),
    }))
}

/// 分页列出申请
pub async fn list_applications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(request): Query<ApplicationListRequest>,
) -> Result<Response, ApiError> {
    require_session(&state, &headers)?;

    let page = request.page.unwrap_or(1);
    let response = state
        .applications
        .list(page, request.role.as_deref())
        .await
        .map_err(internal)?;

    Ok(Json(response).into_response())
}

/// 单条申请详情
pub async fn application_details(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    require_session(&state, &headers)?;

    let record = state
        .applications
        .get(&id)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })))?;

    match record.and_then(summarize) {
        Some(summary) => Ok(Json(summary).into_response()),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Application {} not found", id),
            }),
        )),
    }
}

#[derive(Deserialize)]
pub struct ResumeQuery {
    pub download: Option<String>,
}

/// 简历响应的 Content-Disposition
///
/// 默认内联预览；`?download=1` 改为附件下载。
fn resume_disposition(download: bool, stored_name: &str) -> String {
    let mode = if download { "attachment" } else { "inline" };
    format!("{}; filename=\"{}\"", mode, stored_name.replace('"', ""))
}

/// 查看或下载简历文件
pub async fn download_resume(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ResumeQuery>,
) -> Result<Response, ApiError> {
    require_session(&state, &headers)?;

    let record = state
        .applications
        .get(&id)
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e })))?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Application {} not found", id),
                }),
            )
        })?;

    let path = state
        .applications
        .resolve_resume(&record.resume_file_path)
        .map_err(internal)?;
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!("读取简历文件失败 {}: {}", path.display(), e);
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Resume file not found".to_string(),
            }),
        )
    })?;

    let wants_download = matches!(query.download.as_deref(), Some("1") | Some("true"));
    let disposition = resume_disposition(wants_download, &record.resume_file_path);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub token: Option<String>,
}

/// 申请变更订阅（SSE）
///
/// 每当申请集合发生插入、更新或删除，推送一条 `changed` 事件，
/// 管理界面据此刷新列表。
pub async fn application_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    match query.token.as_deref() {
        Some(token) => state.sessions.verify_token(token).map_err(unauthorized)?,
        None => require_session(&state, &headers)?,
    }

    let change_stream = state.applications.watch().await.map_err(internal)?;

    let stream = change_stream.filter_map(|item| async move {
        let event = match item {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("变更流读取失败: {}", e);
                return None;
            }
        };

        let payload = ApplicationEvent {
            operation: format!("{:?}", event.operation_type).to_lowercase(),
            id: event
                .document_key
                .as_ref()
                .and_then(|key| key.get_object_id("_id").ok())
                .map(|oid| oid.to_hex()),
        };

        match Event::default().event(CHANGE_EVENT).json_data(&payload) {
            Ok(sse_event) => Some(Ok(sse_event)),
            Err(e) => {
                tracing::warn!("序列化变更事件失败: {}", e);
                None
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
