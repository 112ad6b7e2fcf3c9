//! 申请提交API处理器
//!
//! 处理顺序是固定的：限流最先（在读取任何表单内容之前），然后
//! 是简历文件检查，最后才是字段校验。被限流的请求不会产生任何
//! 磁盘或数据库写入。

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use bson::DateTime;

use crate::rate_limit::RateLimitDecision;
use crate::validation::{sanitize_string, validate_application, validate_resume, ApplicationInput};
use crate::web::applications::ApplicationRecord;
use crate::web::types::{AppState, ErrorResponse, SubmitResponse, ValidationErrorResponse};

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_json(status: StatusCode, error: ErrorResponse) -> ApiError {
    (status, Json(serde_json::json!({ "error": error.error })))
}

fn validation_json(errors: Vec<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(
            serde_json::to_value(ValidationErrorResponse { errors })
                .unwrap_or_else(|_| serde_json::json!({ "errors": [] })),
        ),
    )
}

/// 提交者来源地址：取 X-Forwarded-For 的第一跳
fn client_address(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 已解析的简历文件
struct ResumeUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

pub async fn submit_application(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<SubmitResponse>, ApiError> {
    // 限流最先执行
    let address = client_address(&headers);
    if let RateLimitDecision::Limited { retry_after } = state.limiter.check(&address) {
        tracing::warn!("提交被限流: {}", address);
        return Err(error_json(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorResponse {
                error: format!(
                    "Too many submissions. Try again in {} seconds.",
                    retry_after.as_secs().max(1)
                ),
            },
        ));
    }

    // 读取表单
    let mut input = ApplicationInput::default();
    let mut resume: Option<ResumeUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error_json(
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                error: format!("Malformed form data: {}", e),
            },
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    error_json(
                        StatusCode::BAD_REQUEST,
                        ErrorResponse {
                            error: format!("Failed to read resume upload: {}", e),
                        },
                    )
                })?;
                resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {
                let value = field.text().await.unwrap_or_default();
                match name.as_str() {
                    "preferredRole" => input.preferred_role = value,
                    "name" => input.name = value,
                    "email" => input.email = value,
                    "githubProfile" => input.github_profile = value,
                    "linkedinTwitterProfile" => input.linkedin_twitter_profile = value,
                    "currentSchool" => input.current_school = value,
                    "pitch" => input.pitch = value,
                    // 未知字段忽略
                    _ => {}
                }
            }
        }
    }

    // 简历检查先于字段校验
    let resume = match resume {
        Some(upload) => upload,
        None => return Err(validation_json(vec!["Resume file is required".to_string()])),
    };
    let resume_errors = validate_resume(&resume.file_name, &resume.content_type, resume.bytes.len());
    if !resume_errors.is_empty() {
        return Err(validation_json(resume_errors));
    }

    let field_errors = validate_application(&input);
    if !field_errors.is_empty() {
        return Err(validation_json(field_errors));
    }

    // 落盘与落库
    let name = sanitize_string(&input.name);
    let resume_file_path = state
        .applications
        .save_resume(&name, &resume.bytes)
        .await
        .map_err(|e| {
            tracing::error!("{}", e);
            error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Failed to store resume".to_string(),
                },
            )
        })?;

    let optional = |value: &str| {
        let cleaned = sanitize_string(value);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    };

    let record = ApplicationRecord {
        id: None,
        preferred_role: sanitize_string(&input.preferred_role),
        name,
        email: sanitize_string(&input.email),
        github_profile: sanitize_string(&input.github_profile),
        linkedin_twitter_profile: optional(&input.linkedin_twitter_profile),
        resume_file_path,
        current_school: optional(&input.current_school),
        pitch: sanitize_string(&input.pitch),
        created_at: DateTime::now(),
    };

    let id = state.applications.insert(record).await.map_err(|e| {
        tracing::error!("{}", e);
        error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse {
                error: "Failed to save application".to_string(),
            },
        )
    })?;

    tracing::info!("收到新申请: {}", id.to_hex());
    Ok(Json(SubmitResponse { id: id.to_hex() }))
}
