//! Web 路由定义

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::web::handlers::{api, pages};
use crate::web::types::AppState;

/// 创建路由结构
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // 站点页面
        .route("/", get(pages::index))
        .route("/approach", get(pages::approach))
        .route("/collaboration", get(pages::collaboration))
        .route("/contact", get(pages::contact))
        .route("/blog", get(pages::blog))
        // 语言与翻译
        .route(
            "/api/locale",
            get(api::locale::current_locale).post(api::locale::set_locale),
        )
        .route("/api/translate", post(api::translate::translate))
        // 申请提交
        .route("/api/submit-application", post(api::intake::submit_application))
        // 管理后台
        .route("/api/admin/login", post(api::admin::login))
        .route("/api/admin/applications", get(api::admin::list_applications))
        .route(
            "/api/admin/applications/events",
            get(api::admin::application_events),
        )
        .route(
            "/api/admin/applications/:id",
            get(api::admin::application_details),
        )
        .route(
            "/api/admin/applications/:id/resume",
            get(api::admin::download_resume),
        )
        // 请求体上限：10 MB 的简历加上 multipart 编码与其余字段的余量
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024))
}
